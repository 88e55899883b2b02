//! Lucky wheel mini-game. One spin per cooldown; prizes are drawn from
//! the weighted segment table.

use crate::{
    config::{GameConfig, WheelPrize},
    economy_rules,
    event::{DenyReason, GameEvent},
    rng::SubsystemRng,
    state::EconomyState,
    subsystem::{TickContext, TickSubsystem},
};

pub fn spin_wheel(
    state:  &mut EconomyState,
    config: &GameConfig,
    rng:    &mut SubsystemRng,
) -> Vec<GameEvent> {
    if state.wheel_cooldown > 0.0 {
        return vec![GameEvent::PurchaseDenied {
            reason: DenyReason::WheelOnCooldown { remaining: state.wheel_cooldown },
        }];
    }

    let weights: Vec<u32> = config.wheel.segments.iter().map(|s| s.weight).collect();
    let Some(segment) = config.wheel.segments.get(rng.weighted_index(&weights)) else {
        return vec![];
    };
    state.wheel_cooldown = config.wheel.cooldown;

    let mut out = Vec::new();
    let value = match &segment.prize {
        WheelPrize::Money { income_seconds, minimum } => {
            let amount =
                (state.auto_income * income_seconds * state.prestige_multiplier).max(*minimum);
            state.money += amount;
            amount
        }
        WheelPrize::Powerup { kind } => {
            let activated = economy_rules::activate_powerup(state, config, *kind);
            let multiplier = config.powerups.spec(*kind).map(|p| p.multiplier).unwrap_or(1.0);
            out.extend(activated);
            multiplier
        }
        WheelPrize::Seeds { amount } => {
            state.grass_seeds = state.grass_seeds.saturating_add(*amount);
            *amount as f64
        }
        WheelPrize::SkillPoints { amount } => {
            state.skill_points = state.skill_points.saturating_add(*amount);
            f64::from(*amount)
        }
    };

    log::debug!("wheel spun: {:?} value={value}", segment.prize);
    out.insert(0, GameEvent::WheelSpun { prize: segment.prize.clone(), value });
    out
}

/// Counts the wheel cooldown down to zero.
#[derive(Default)]
pub struct WheelSubsystem;

impl TickSubsystem for WheelSubsystem {
    fn name(&self) -> &'static str { "wheel" }

    fn update(
        &mut self,
        ctx:        TickContext,
        state:      &mut EconomyState,
        _events_in: &[GameEvent],
        _rng:       &mut SubsystemRng,
    ) -> Vec<GameEvent> {
        if state.wheel_cooldown > 0.0 {
            state.wheel_cooldown = (state.wheel_cooldown - ctx.dt).max(0.0);
        }
        vec![]
    }
}
