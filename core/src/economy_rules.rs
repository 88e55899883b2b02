//! Core economy rules: click yield, upgrades, skins and power-ups.
//!
//! RULE: Every money deduction goes through `spend`, which refuses to take
//! the balance below zero. Refusals come back as `PurchaseDenied` events.

use crate::{
    config::GameConfig,
    event::{DenyReason, GameEvent, UpgradeKind},
    rng::SubsystemRng,
    skill_tree::{self, SkillId},
    state::{ActivePowerup, EconomyState, PowerupKind},
    types::{Money, Point},
};

/// Deduct `amount` if affordable.
pub(crate) fn spend(state: &mut EconomyState, amount: Money) -> Result<(), DenyReason> {
    if amount < 0.0 || state.money < amount {
        return Err(DenyReason::InsufficientFunds {
            needed:    amount,
            available: state.money,
        });
    }
    state.money = (state.money - amount).max(0.0);
    Ok(())
}

/// Money per click of the given tier before any multiplier.
pub fn click_base_value(config: &GameConfig, grass_index: usize) -> f64 {
    config
        .grass_catalogue
        .get(grass_index)
        .map(|t| t.click_base)
        .unwrap_or(config.grass_catalogue[0].click_base)
}

/// Step multiplier for a combo streak. Non-decreasing in `combo_count`.
pub fn combo_multiplier(config: &GameConfig, combo_count: u32) -> f64 {
    config
        .combo
        .steps
        .iter()
        .find(|s| combo_count < s.below)
        .map(|s| s.multiplier)
        .unwrap_or(config.combo.top_multiplier)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickYield {
    pub amount:   Money,
    pub critical: bool,
}

/// What one click is worth right now. `crit_roll` is a uniform draw in
/// [0, 1); the click is critical when it falls under the crit chance.
pub fn click_yield(state: &EconomyState, config: &GameConfig, crit_roll: f64) -> ClickYield {
    let mut amount = click_base_value(config, state.current_grass_index)
        * state.multiplier
        * state.weather_multiplier;
    amount *= combo_multiplier(config, state.combo_count);
    amount *= state.powerup_multiplier(PowerupKind::ClickFrenzy);
    amount *= 1.0 + skill_tree::bonus(state, SkillId::ClickPower);

    let critical = crit_roll < state.critical_hit_chance;
    if critical {
        amount *= state.critical_hit_multiplier;
    }

    amount *= state.prestige_multiplier;
    amount *= state.seasonal_multiplier;
    ClickYield { amount: amount.max(0.0), critical }
}

/// Seconds a combo survives without another click.
pub fn combo_window(state: &EconomyState, config: &GameConfig) -> f64 {
    config.combo.timeout + skill_tree::bonus(state, SkillId::ComboKeeper)
}

/// Register one click on the grass sprite.
pub fn click_grass(
    state:  &mut EconomyState,
    config: &GameConfig,
    at:     Point,
    rng:    &mut SubsystemRng,
) -> Vec<GameEvent> {
    let ClickYield { amount, critical } = click_yield(state, config, rng.next_f64());

    state.money += amount;
    state.total_clicks += 1;
    state.combo_count = state.combo_count.saturating_add(1);
    state.combo_timer = combo_window(state, config);
    state.best_combo = state.best_combo.max(state.combo_count);
    if critical {
        state.total_crits += 1;
    }

    vec![GameEvent::GrassClicked {
        at,
        amount,
        critical,
        combo: state.combo_count,
        color: state.grass_tier(config).particle_color,
    }]
}

/// Buy one AFK income upgrade.
pub fn buy_afk_upgrade(state: &mut EconomyState, config: &GameConfig) -> Vec<GameEvent> {
    let cost = state.afk_upgrade_cost;
    if let Err(reason) = spend(state, cost) {
        return vec![GameEvent::PurchaseDenied { reason }];
    }

    let e = &config.economy;
    let tier = state.current_grass_index;
    if tier == 0 {
        state.auto_income += e.afk_income_step * state.multiplier;
        state.afk_upgrade_cost *= e.afk_growth_first_tier;
    } else {
        state.auto_income += e.afk_income_step * state.multiplier * tier as f64 * e.tier_income_factor;
        state.afk_upgrade_cost *= e.afk_growth_upper_tiers;
    }

    log::debug!(
        "afk upgrade: cost={cost:.0} income={:.2} next={:.0}",
        state.auto_income,
        state.afk_upgrade_cost
    );
    vec![GameEvent::UpgradePurchased {
        upgrade:   UpgradeKind::AfkIncome,
        cost,
        next_cost: state.afk_upgrade_cost,
    }]
}

/// Buy one click multiplier upgrade.
pub fn buy_multiplier_upgrade(state: &mut EconomyState, config: &GameConfig) -> Vec<GameEvent> {
    let cost = state.multiplier_upgrade_cost;
    if let Err(reason) = spend(state, cost) {
        return vec![GameEvent::PurchaseDenied { reason }];
    }

    state.multiplier += config.economy.multiplier_step;
    state.multiplier_upgrade_cost *= config.economy.multiplier_growth;

    log::debug!(
        "multiplier upgrade: cost={cost:.0} multiplier={} next={:.0}",
        state.multiplier,
        state.multiplier_upgrade_cost
    );
    vec![GameEvent::UpgradePurchased {
        upgrade:   UpgradeKind::ClickMultiplier,
        cost,
        next_cost: state.multiplier_upgrade_cost,
    }]
}

/// Select an owned skin, or buy the next rung of the ladder.
pub fn select_skin(state: &mut EconomyState, config: &GameConfig, index: usize) -> Vec<GameEvent> {
    let Some(tier) = config.grass_catalogue.get(index) else {
        return vec![GameEvent::PurchaseDenied {
            reason: DenyReason::SkinOutOfRange { index },
        }];
    };

    if state.has_skin(index) {
        state.current_grass_index = index;
        return vec![GameEvent::SkinSelected { index }];
    }

    let next = state.highest_grass_index + 1;
    if index != next {
        return vec![GameEvent::PurchaseDenied {
            reason: DenyReason::SkinNotNextTier { index, next },
        }];
    }

    if let Err(reason) = spend(state, tier.cost) {
        return vec![GameEvent::PurchaseDenied { reason }];
    }
    state.highest_grass_index = index;
    state.current_grass_index = index;

    log::info!("bought skin {index} ({}) for {:.0}", tier.name, tier.cost);
    vec![GameEvent::SkinPurchased { index, cost: tier.cost }]
}

/// Start a timed power-up. Stacks with any already running.
pub fn activate_powerup(
    state:  &mut EconomyState,
    config: &GameConfig,
    kind:   PowerupKind,
) -> Option<GameEvent> {
    let spec = config.powerups.spec(kind)?;
    state.active_powerups.push(ActivePowerup {
        kind,
        multiplier: spec.multiplier,
        remaining:  spec.duration,
    });
    Some(GameEvent::PowerupActivated {
        kind,
        multiplier: spec.multiplier,
        duration:   spec.duration,
    })
}
