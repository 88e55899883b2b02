use crate::{
    event::GameEvent,
    rng::SubsystemRng,
    state::EconomyState,
    subsystem::{TickContext, TickSubsystem},
};

/// Counts down the combo window; the streak breaks when it runs out.
#[derive(Default)]
pub struct ComboSubsystem;

impl TickSubsystem for ComboSubsystem {
    fn name(&self) -> &'static str { "combo" }

    fn update(
        &mut self,
        ctx:        TickContext,
        state:      &mut EconomyState,
        _events_in: &[GameEvent],
        _rng:       &mut SubsystemRng,
    ) -> Vec<GameEvent> {
        if state.combo_count == 0 {
            return vec![];
        }
        state.combo_timer -= ctx.dt;
        if state.combo_timer > 0.0 {
            return vec![];
        }

        let count = state.combo_count;
        state.combo_count = 0;
        state.combo_timer = 0.0;
        log::debug!("frame={} combo broken at {count}", ctx.frame);
        vec![GameEvent::ComboBroken { count }]
    }
}
