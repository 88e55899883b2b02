use crate::{
    event::GameEvent,
    rng::SubsystemRng,
    state::EconomyState,
    subsystem::{TickContext, TickSubsystem},
};

/// Lifetime statistics: peak balance and total play time.
#[derive(Default)]
pub struct StatsSubsystem;

impl TickSubsystem for StatsSubsystem {
    fn name(&self) -> &'static str { "stats" }

    fn update(
        &mut self,
        ctx:        TickContext,
        state:      &mut EconomyState,
        _events_in: &[GameEvent],
        _rng:       &mut SubsystemRng,
    ) -> Vec<GameEvent> {
        state.highest_money = state.highest_money.max(state.money);
        state.play_time_seconds += ctx.dt;
        vec![]
    }
}
