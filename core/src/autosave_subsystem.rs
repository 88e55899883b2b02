use crate::{
    event::GameEvent,
    rng::SubsystemRng,
    state::EconomyState,
    subsystem::{TickContext, TickSubsystem},
    types::Seconds,
};

/// Requests a save every `interval` seconds of unpaused play. The
/// session performs the write once the frame's other work is done.
pub struct AutosaveSubsystem {
    interval: Seconds,
    elapsed:  Seconds,
}

impl AutosaveSubsystem {
    pub fn new(interval: Seconds) -> Self {
        Self { interval, elapsed: 0.0 }
    }
}

impl TickSubsystem for AutosaveSubsystem {
    fn name(&self) -> &'static str { "autosave" }

    fn update(
        &mut self,
        ctx:        TickContext,
        _state:     &mut EconomyState,
        _events_in: &[GameEvent],
        _rng:       &mut SubsystemRng,
    ) -> Vec<GameEvent> {
        self.elapsed += ctx.dt;
        if self.elapsed < self.interval {
            return vec![];
        }
        self.elapsed = 0.0;
        vec![GameEvent::AutosaveDue { frame: ctx.frame }]
    }
}
