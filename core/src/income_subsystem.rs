//! AFK income accrual.
//!
//! Execution: every frame, first in registration order.

use crate::{
    event::GameEvent,
    rng::SubsystemRng,
    skill_tree::{self, SkillId},
    state::{EconomyState, PowerupKind},
    subsystem::{TickContext, TickSubsystem},
    types::Money,
};

/// Money earned passively per second at the current multipliers.
pub fn income_per_second(state: &EconomyState) -> Money {
    state.auto_income
        * state.prestige_multiplier
        * state.weather_multiplier
        * state.powerup_multiplier(PowerupKind::IncomeRush)
        * (1.0 + skill_tree::bonus(state, SkillId::GreenThumb))
}

#[derive(Default)]
pub struct IncomeSubsystem;

impl TickSubsystem for IncomeSubsystem {
    fn name(&self) -> &'static str { "income" }

    fn update(
        &mut self,
        ctx:        TickContext,
        state:      &mut EconomyState,
        _events_in: &[GameEvent],
        _rng:       &mut SubsystemRng,
    ) -> Vec<GameEvent> {
        let earned = income_per_second(state) * ctx.dt;
        if earned > 0.0 {
            state.money += earned;
        }
        vec![]
    }
}
