//! The on-disk save document.
//!
//! RULE: This is the only persisted shape of the game. Every key is
//! optional when reading; an absent key takes the documented default from
//! `SaveDocument::default()`. Unknown keys are ignored, unknown skill ids
//! are dropped and an unknown weather index reads as Normal, so one bad
//! value never costs the player the rest of the save.

use crate::{
    achievements,
    config::GameConfig,
    prestige_rules,
    skill_tree::{self, SkillId, SkillNode},
    state::{ActivePowerup, AchievementProgress, BossState, EconomyState, Settings, Weather},
    types::{Money, Seconds},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SaveDocument {
    pub money:                   Money,
    pub multiplier:              f64,
    pub auto_income:             f64,
    pub total_clicks:            u64,
    pub afk_upgrade_cost:        Money,
    pub multiplier_upgrade_cost: Money,
    pub highest_money:           Money,
    pub current_grass_index:     usize,
    pub weather_index:           u8,
    pub achievements:            BTreeMap<String, AchievementProgress>,
    pub prestige_level:          u32,
    pub grass_seeds:             u64,
    /// Keyed by skill id string so unknown ids can be skipped on load.
    pub skills:                  BTreeMap<String, SkillNode>,
    pub skill_points:            u32,
    pub settings:                Settings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_play_time:          Option<DateTime<Utc>>,

    // ── Extended progress ──────────────────────────
    pub total_crits:         u64,
    pub best_combo:          u32,
    pub highest_grass_index: usize,
    pub boss_level:          u32,
    pub boss_defeated_count: u32,
    pub login_streak:        u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_date:     Option<NaiveDate>,
    pub play_time_seconds:   Seconds,
    pub wheel_cooldown:      Seconds,
    pub active_powerups:     Vec<ActivePowerup>,
}

fn skills_by_key(tree: &BTreeMap<SkillId, SkillNode>) -> BTreeMap<String, SkillNode> {
    tree.iter().map(|(id, node)| (id.key().to_string(), node.clone())).collect()
}

impl Default for SaveDocument {
    fn default() -> Self {
        Self {
            money:                   0.0,
            multiplier:              1.0,
            auto_income:             0.0,
            total_clicks:            0,
            afk_upgrade_cost:        150.0,
            multiplier_upgrade_cost: 150.0,
            highest_money:           0.0,
            current_grass_index:     0,
            weather_index:           0,
            achievements:            BTreeMap::new(),
            prestige_level:          0,
            grass_seeds:             0,
            skills:                  skills_by_key(&skill_tree::default_tree()),
            skill_points:            0,
            settings:                Settings::default(),
            last_play_time:          None,

            total_crits:         0,
            best_combo:          0,
            highest_grass_index: 0,
            boss_level:          1,
            boss_defeated_count: 0,
            login_streak:        0,
            last_login_date:     None,
            play_time_seconds:   0.0,
            wheel_cooldown:      0.0,
            active_powerups:     Vec::new(),
        }
    }
}

impl SaveDocument {
    /// Snapshot the persistable part of `state`.
    pub fn capture(state: &EconomyState) -> Self {
        Self {
            money:                   state.money,
            multiplier:              state.multiplier,
            auto_income:             state.auto_income,
            total_clicks:            state.total_clicks,
            afk_upgrade_cost:        state.afk_upgrade_cost,
            multiplier_upgrade_cost: state.multiplier_upgrade_cost,
            highest_money:           state.highest_money,
            current_grass_index:     state.current_grass_index,
            weather_index:           state.weather.index(),
            achievements:            state.achievements.clone(),
            prestige_level:          state.prestige_level,
            grass_seeds:             state.grass_seeds,
            skills:                  skills_by_key(&state.skills),
            skill_points:            state.skill_points,
            settings:                state.settings.clone(),
            last_play_time:          state.last_play_time,

            total_crits:         state.total_crits,
            best_combo:          state.best_combo,
            highest_grass_index: state.highest_grass_index,
            boss_level:          state.boss.level,
            boss_defeated_count: state.boss.defeated_count,
            login_streak:        state.login_streak,
            last_login_date:     state.last_login_date,
            play_time_seconds:   state.play_time_seconds,
            wheel_cooldown:      state.wheel_cooldown,
            active_powerups:     state.active_powerups.clone(),
        }
    }

    /// Rebuild a full economy state. Derived fields (weather and prestige
    /// multipliers, critical stats) are recomputed rather than trusted.
    pub fn restore(self, config: &GameConfig) -> EconomyState {
        let mut state = EconomyState::new(config);
        let last_tier = config.grass_catalogue.len().saturating_sub(1);

        state.money = finite_or(self.money, 0.0).max(0.0);
        state.multiplier = finite_or(self.multiplier, 1.0);
        state.auto_income = finite_or(self.auto_income, 0.0).max(0.0);
        state.total_clicks = self.total_clicks;
        state.afk_upgrade_cost = finite_or(self.afk_upgrade_cost, config.economy.afk_base_cost);
        state.multiplier_upgrade_cost =
            finite_or(self.multiplier_upgrade_cost, config.economy.multiplier_base_cost);
        state.highest_money = finite_or(self.highest_money, 0.0);

        state.highest_grass_index = self
            .highest_grass_index
            .max(self.current_grass_index)
            .min(last_tier);
        state.current_grass_index = self.current_grass_index.min(state.highest_grass_index);

        state.weather = Weather::from_index(self.weather_index);
        state.weather_multiplier = config.weather.multiplier_for(state.weather);

        state.achievements = self.achievements;
        state.prestige_level = self.prestige_level;
        state.prestige_multiplier = prestige_rules::prestige_multiplier_for(self.prestige_level, config);
        state.grass_seeds = self.grass_seeds;
        state.skill_points = self.skill_points;
        for (key, node) in self.skills {
            match key.parse::<SkillId>() {
                Ok(id) => {
                    if let Some(slot) = state.skills.get_mut(&id) {
                        slot.level = node.level.min(slot.max_level);
                    }
                }
                Err(e) => log::warn!("dropping saved skill: {e}"),
            }
        }
        skill_tree::recompute_derived(&mut state, config);

        state.settings = self.settings;
        state.last_play_time = self.last_play_time;

        state.total_crits = self.total_crits;
        state.best_combo = self.best_combo;
        state.boss = BossState {
            level:          self.boss_level.max(1),
            defeated_count: self.boss_defeated_count,
            ..BossState::new(config.boss.spawn_interval)
        };
        state.login_streak = self.login_streak;
        state.last_login_date = self.last_login_date;
        state.play_time_seconds = finite_or(self.play_time_seconds, 0.0).max(0.0);
        state.wheel_cooldown = finite_or(self.wheel_cooldown, 0.0).clamp(0.0, config.wheel.cooldown);
        state.active_powerups = self
            .active_powerups
            .into_iter()
            .filter(|p| p.remaining > 0.0)
            .collect();

        achievements::ensure_defined(&mut state, &achievements::catalogue(config));
        state
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}
