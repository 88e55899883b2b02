//! The economy state: the single root aggregate of a game session.
//!
//! RULE: This module holds data only. All mutation goes through the rule
//! modules (economy_rules, prestige_rules, skill_tree, achievements, offline)
//! or the tick subsystems, so invariants live in one place:
//!   - money never goes negative
//!   - upgrade costs only grow (reset by wipe alone)
//!   - current_grass_index <= highest_grass_index < catalogue length

use crate::{
    achievements,
    config::{GameConfig, GrassTier},
    skill_tree::{self, SkillId, SkillNode},
    types::{Money, Point, Seconds, SpecialId},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Normal,
    Sunny,
    Rainy,
    Stormy,
}

impl Weather {
    pub const ALL: [Weather; 4] = [Self::Normal, Self::Sunny, Self::Rainy, Self::Stormy];

    pub fn index(&self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Sunny  => 1,
            Self::Rainy  => 2,
            Self::Stormy => 3,
        }
    }

    /// Unknown indices fall back to Normal.
    pub fn from_index(index: u8) -> Self {
        Self::ALL.get(usize::from(index)).copied().unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Sunny  => "Sunny",
            Self::Rainy  => "Rainy",
            Self::Stormy => "Stormy",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BossKind {
    #[default]
    Weed,
    Mole,
    Lawnmower,
}

impl BossKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Weed      => "Giant Weed",
            Self::Mole      => "Angry Mole",
            Self::Lawnmower => "Rogue Lawnmower",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BossState {
    pub active:         bool,
    pub kind:           BossKind,
    pub hp:             f64,
    pub max_hp:         f64,
    /// Seconds left to defeat the active boss.
    pub timer:          Seconds,
    /// Seconds until the next boss appears (counts only while none is active).
    pub spawn_timer:    Seconds,
    pub level:          u32,
    pub defeated_count: u32,
}

impl BossState {
    pub fn new(spawn_interval: Seconds) -> Self {
        Self {
            active:         false,
            kind:           BossKind::default(),
            hp:             0.0,
            max_hp:         0.0,
            timer:          0.0,
            spawn_timer:    spawn_interval,
            level:          1,
            defeated_count: 0,
        }
    }

    /// Remaining hp as a fraction of max. A zero max counts as defeated.
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp <= 0.0 {
            0.0
        } else {
            (self.hp / self.max_hp).clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PowerupKind {
    /// Multiplies click yield.
    ClickFrenzy,
    /// Multiplies AFK income.
    IncomeRush,
}

impl PowerupKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ClickFrenzy => "Click Frenzy",
            Self::IncomeRush  => "Income Rush",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivePowerup {
    pub kind:       PowerupKind,
    pub multiplier: f64,
    pub remaining:  Seconds,
}

/// A floating "water can" that pays out when clicked before it fades.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpecialCollectible {
    pub id:       SpecialId,
    pub position: Point,
    pub radius:   f64,
    pub value:    Money,
    pub life:     Seconds,
    pub max_life: Seconds,
}

impl SpecialCollectible {
    /// Fraction of life left. A zero max life counts as expired.
    pub fn life_fraction(&self) -> f64 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AchievementProgress {
    pub unlocked: bool,
    /// Progress toward the threshold in [0, 1].
    pub progress: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub screen_shake_enabled: bool,
    pub show_fps:             bool,
    pub particle_density:     f64,
    pub master_volume:        f64,
    pub sound_enabled:        bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake_enabled: true,
            show_fps:             false,
            particle_density:     1.0,
            master_volume:        0.5,
            sound_enabled:        true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EconomyState {
    // ── Currency & upgrades ────────────────────────
    pub money:                   Money,
    pub multiplier:              f64,
    pub auto_income:             f64,
    pub total_clicks:            u64,
    pub highest_money:           Money,
    pub afk_upgrade_cost:        Money,
    pub multiplier_upgrade_cost: Money,

    // ── Grass ladder ───────────────────────────────
    pub current_grass_index: usize,
    pub highest_grass_index: usize,

    // ── Weather ────────────────────────────────────
    pub weather:            Weather,
    pub weather_multiplier: f64,
    pub weather_timer:      Seconds,

    // ── Combo & critical ───────────────────────────
    pub combo_count:             u32,
    pub combo_timer:             Seconds,
    pub best_combo:              u32,
    pub critical_hit_chance:     f64,
    pub critical_hit_multiplier: f64,
    pub total_crits:             u64,

    // ── Prestige & skills ──────────────────────────
    pub prestige_level:      u32,
    pub prestige_multiplier: f64,
    pub grass_seeds:         u64,
    pub skill_points:        u32,
    pub skills:              BTreeMap<SkillId, SkillNode>,
    pub achievements:        BTreeMap<String, AchievementProgress>,

    // ── Timed content ──────────────────────────────
    pub boss:            BossState,
    pub active_powerups: Vec<ActivePowerup>,
    pub specials:        Vec<SpecialCollectible>,
    pub next_special_id: SpecialId,
    pub wheel_cooldown:  Seconds,

    // ── Session ────────────────────────────────────
    pub login_streak:        u32,
    pub last_login_date:     Option<NaiveDate>,
    pub play_time_seconds:   Seconds,
    pub seasonal_multiplier: f64,
    pub last_play_time:      Option<DateTime<Utc>>,
    pub settings:            Settings,
}

impl EconomyState {
    /// A brand-new game: every field at its documented default, the full
    /// skill tree at level 0 and every achievement defined but locked.
    pub fn new(config: &GameConfig) -> Self {
        let mut state = Self {
            money:                   0.0,
            multiplier:              1.0,
            auto_income:             0.0,
            total_clicks:            0,
            highest_money:           0.0,
            afk_upgrade_cost:        config.economy.afk_base_cost,
            multiplier_upgrade_cost: config.economy.multiplier_base_cost,

            current_grass_index: 0,
            highest_grass_index: 0,

            weather:            Weather::Normal,
            weather_multiplier: config.weather.multiplier_for(Weather::Normal),
            weather_timer:      0.0,

            combo_count:             0,
            combo_timer:             0.0,
            best_combo:              0,
            critical_hit_chance:     config.critical.base_chance,
            critical_hit_multiplier: config.critical.base_multiplier,
            total_crits:             0,

            prestige_level:      0,
            prestige_multiplier: 1.0,
            grass_seeds:         0,
            skill_points:        0,
            skills:              skill_tree::default_tree(),
            achievements:        BTreeMap::new(),

            boss:            BossState::new(config.boss.spawn_interval),
            active_powerups: Vec::new(),
            specials:        Vec::new(),
            next_special_id: 1,
            wheel_cooldown:  0.0,

            login_streak:        0,
            last_login_date:     None,
            play_time_seconds:   0.0,
            seasonal_multiplier: 1.0,
            last_play_time:      None,
            settings:            Settings::default(),
        };
        achievements::ensure_defined(&mut state, &achievements::catalogue(config));
        state
    }

    /// The currently selected grass tier. Falls back to the first tier if
    /// the index is somehow out of range.
    pub fn grass_tier<'a>(&self, config: &'a GameConfig) -> &'a GrassTier {
        config
            .grass_catalogue
            .get(self.current_grass_index)
            .unwrap_or(&config.grass_catalogue[0])
    }

    pub fn has_skin(&self, index: usize) -> bool {
        index <= self.highest_grass_index
    }

    /// Product of every active power-up of `kind`.
    pub fn powerup_multiplier(&self, kind: PowerupKind) -> f64 {
        self.active_powerups
            .iter()
            .filter(|p| p.kind == kind)
            .map(|p| p.multiplier)
            .product()
    }
}
