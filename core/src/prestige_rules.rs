//! Prestige and wipe: the two ways a run ends.
//!
//! Prestige converts the current run into grass seeds, skill points and a
//! permanent multiplier. Only run-scoped fields reset; prestige level,
//! seeds, skill points, skills, achievements, upgrade costs, statistics and
//! settings carry over.
//!
//! Wipe discards everything except settings.

use crate::{
    achievements,
    config::GameConfig,
    event::{DenyReason, GameEvent},
    skill_tree::{self, SkillId},
    state::EconomyState,
};

pub fn can_prestige(state: &EconomyState, config: &GameConfig) -> bool {
    state.money >= config.prestige.threshold
}

/// Seeds a prestige would award right now:
/// `floor((sqrt(money / 100k) + sqrt(clicks / 1000)) * (1 + seed bonus))`,
/// never less than the configured minimum.
pub fn prestige_seeds(state: &EconomyState, config: &GameConfig) -> u64 {
    let p = &config.prestige;
    let money_part = (state.money.max(0.0) / p.money_divisor).sqrt();
    let clicks_part = (state.total_clicks as f64 / p.clicks_divisor).sqrt();
    let bonus = 1.0 + skill_tree::bonus(state, SkillId::SeedHoarder);
    let seeds = ((money_part + clicks_part) * bonus).floor();
    if seeds.is_finite() {
        (seeds as u64).max(p.min_seeds)
    } else {
        p.min_seeds
    }
}

pub fn prestige_multiplier_for(level: u32, config: &GameConfig) -> f64 {
    1.0 + config.prestige.bonus_per_level * f64::from(level)
}

pub fn perform_prestige(state: &mut EconomyState, config: &GameConfig) -> Vec<GameEvent> {
    if !can_prestige(state, config) {
        return vec![GameEvent::PurchaseDenied {
            reason: DenyReason::PrestigeNotReady { needed: config.prestige.threshold },
        }];
    }

    let seeds = prestige_seeds(state, config);
    let points = u32::try_from(seeds).unwrap_or(u32::MAX);

    state.prestige_level += 1;
    state.prestige_multiplier = prestige_multiplier_for(state.prestige_level, config);
    state.grass_seeds = state.grass_seeds.saturating_add(seeds);
    state.skill_points = state.skill_points.saturating_add(points);

    // Run-scoped reset.
    state.money = 0.0;
    state.multiplier = 1.0;
    state.auto_income = 0.0;
    state.total_clicks = 0;
    state.current_grass_index = 0;
    state.highest_grass_index = 0;
    state.combo_count = 0;
    state.combo_timer = 0.0;

    log::info!(
        "prestige -> level {} (+{seeds} seeds, multiplier {:.1})",
        state.prestige_level,
        state.prestige_multiplier
    );
    vec![GameEvent::PrestigePerformed {
        level:        state.prestige_level,
        seeds,
        skill_points: points,
    }]
}

/// Reset the state to a brand-new game, keeping only the player's settings.
/// Every achievement definition is recreated, including generated ones.
pub fn wipe(state: &mut EconomyState, config: &GameConfig) {
    let settings = state.settings.clone();
    let seasonal = state.seasonal_multiplier;
    *state = EconomyState::new(config);
    state.settings = settings;
    state.seasonal_multiplier = seasonal;
    achievements::ensure_defined(state, &achievements::catalogue(config));
    log::info!("save wiped, state reset to defaults");
}
