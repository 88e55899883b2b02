use crate::{
    event::GameEvent,
    rng::SubsystemRng,
    state::EconomyState,
    subsystem::{TickContext, TickSubsystem},
};

/// Expires timed power-ups. Each removal is reported, in activation order.
#[derive(Default)]
pub struct PowerupSubsystem;

impl TickSubsystem for PowerupSubsystem {
    fn name(&self) -> &'static str { "powerup" }

    fn update(
        &mut self,
        ctx:        TickContext,
        state:      &mut EconomyState,
        _events_in: &[GameEvent],
        _rng:       &mut SubsystemRng,
    ) -> Vec<GameEvent> {
        let mut out = Vec::new();
        state.active_powerups.retain_mut(|p| {
            p.remaining -= ctx.dt;
            if p.remaining > 0.0 {
                true
            } else {
                out.push(GameEvent::PowerupExpired { kind: p.kind });
                false
            }
        });
        out
    }
}
