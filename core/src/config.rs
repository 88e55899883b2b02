//! Balance configuration.
//!
//! Every tunable number in the economy lives here. `GameConfig::default()`
//! is the shipped balance; `GameConfig::load` reads a JSON override file in
//! which every section (and every field inside a section) is optional.

use crate::{
    state::{BossKind, PowerupKind, Weather},
    types::{Money, Rgb, Seconds},
};
use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ── Upgrades ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub afk_base_cost:          Money,
    pub multiplier_base_cost:   Money,
    /// Income added per AFK purchase, before the multiplier/tier scaling.
    pub afk_income_step:        f64,
    /// AFK cost growth while still on the first grass tier.
    pub afk_growth_first_tier:  f64,
    /// AFK cost growth from the second tier on.
    pub afk_growth_upper_tiers: f64,
    pub tier_income_factor:     f64,
    pub multiplier_step:        f64,
    pub multiplier_growth:      f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            afk_base_cost:          150.0,
            multiplier_base_cost:   150.0,
            afk_income_step:        0.5,
            afk_growth_first_tier:  1.82,
            afk_growth_upper_tiers: 1.2,
            tier_income_factor:     1.5,
            multiplier_step:        0.5,
            multiplier_growth:      1.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrassTier {
    pub name:           String,
    pub cost:           Money,
    pub click_base:     f64,
    pub particle_color: Rgb,
}

fn default_grass_catalogue() -> Vec<GrassTier> {
    let tier = |name: &str, cost: Money, click_base: f64, color: Rgb| GrassTier {
        name: name.into(),
        cost,
        click_base,
        particle_color: color,
    };
    vec![
        tier("Normal Grass",    0.0,       1.1, Rgb(255, 240, 160)),
        tier("Golden Grass",    10_000.0,  1.5, Rgb(255, 215, 80)),
        tier("Frozen Grass",    50_000.0,  3.0, Rgb(170, 220, 255)),
        tier("Diamond Grass",   200_000.0, 4.5, Rgb(120, 230, 255)),
        tier("Mystic Grass",    300_000.0, 6.0, Rgb(180, 110, 255)),
        tier("Blackhole Grass", 500_000.0, 7.5, Rgb(90, 90, 110)),
    ]
}

// ── Weather ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherEntry {
    pub weather:    Weather,
    pub multiplier: f64,
    pub weight:     u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Seconds between weather rolls.
    pub period: Seconds,
    pub table:  Vec<WeatherEntry>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        let entry = |weather, multiplier, weight| WeatherEntry { weather, multiplier, weight };
        Self {
            period: 50.0,
            table: vec![
                entry(Weather::Normal, 1.0, 3),
                entry(Weather::Sunny,  1.3, 3),
                entry(Weather::Rainy,  1.5, 2),
                entry(Weather::Stormy, 1.9, 1),
            ],
        }
    }
}

impl WeatherConfig {
    pub fn multiplier_for(&self, weather: Weather) -> f64 {
        self.table
            .iter()
            .find(|e| e.weather == weather)
            .map(|e| e.multiplier)
            .unwrap_or(1.0)
    }
}

// ── Combo & critical ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComboStep {
    /// The step applies while `combo_count < below`.
    pub below:      u32,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    /// Seconds allowed between clicks before the combo breaks.
    pub timeout:        Seconds,
    pub steps:          Vec<ComboStep>,
    pub top_multiplier: f64,
}

impl Default for ComboConfig {
    fn default() -> Self {
        let step = |below, multiplier| ComboStep { below, multiplier };
        Self {
            timeout: 2.0,
            steps: vec![step(10, 1.0), step(25, 1.05), step(50, 1.10), step(100, 1.15)],
            top_multiplier: 1.20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalConfig {
    pub base_chance:     f64,
    pub base_multiplier: f64,
}

impl Default for CriticalConfig {
    fn default() -> Self {
        Self { base_chance: 0.05, base_multiplier: 2.0 }
    }
}

// ── Prestige ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrestigeConfig {
    pub threshold:       Money,
    pub bonus_per_level: f64,
    pub money_divisor:   f64,
    pub clicks_divisor:  f64,
    pub min_seeds:       u64,
}

impl Default for PrestigeConfig {
    fn default() -> Self {
        Self {
            threshold:       100_000.0,
            bonus_per_level: 0.1,
            money_divisor:   100_000.0,
            clicks_divisor:  1_000.0,
            min_seeds:       1,
        }
    }
}

// ── Boss ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BossKindEntry {
    pub kind:              BossKind,
    pub hp_multiplier:     f64,
    pub reward_multiplier: f64,
    pub weight:            u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub spawn_interval:         Seconds,
    pub time_limit:             Seconds,
    pub base_hp:                f64,
    pub hp_growth:              f64,
    pub reward_base:            Money,
    pub skill_points_per_defeat: u32,
    pub kinds:                  Vec<BossKindEntry>,
}

impl Default for BossConfig {
    fn default() -> Self {
        let kind = |kind, hp_multiplier, reward_multiplier, weight| BossKindEntry {
            kind, hp_multiplier, reward_multiplier, weight,
        };
        Self {
            spawn_interval:          180.0,
            time_limit:              30.0,
            base_hp:                 500.0,
            hp_growth:               1.5,
            reward_base:             1_000.0,
            skill_points_per_defeat: 1,
            kinds: vec![
                kind(BossKind::Weed,      1.0, 1.0, 5),
                kind(BossKind::Mole,      2.0, 2.5, 3),
                kind(BossKind::Lawnmower, 4.0, 6.0, 1),
            ],
        }
    }
}

impl BossConfig {
    pub fn entry(&self, kind: BossKind) -> Option<&BossKindEntry> {
        self.kinds.iter().find(|k| k.kind == kind)
    }
}

// ── Power-ups & collectibles ───────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PowerupSpec {
    pub kind:       PowerupKind,
    pub multiplier: f64,
    pub duration:   Seconds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupConfig {
    pub catalogue: Vec<PowerupSpec>,
}

impl Default for PowerupConfig {
    fn default() -> Self {
        Self {
            catalogue: vec![
                PowerupSpec { kind: PowerupKind::ClickFrenzy, multiplier: 2.0, duration: 30.0 },
                PowerupSpec { kind: PowerupKind::IncomeRush,  multiplier: 3.0, duration: 45.0 },
            ],
        }
    }
}

impl PowerupConfig {
    pub fn spec(&self, kind: PowerupKind) -> Option<&PowerupSpec> {
        self.catalogue.iter().find(|p| p.kind == kind)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialConfig {
    pub spawn_chance_per_second: f64,
    pub life_min:                Seconds,
    pub life_max:                Seconds,
    pub value_min:               u64,
    pub value_max:               u64,
    pub click_radius:            f64,
    /// Spawn area as (min_x, min_y, max_x, max_y).
    pub area:                    (f64, f64, f64, f64),
    /// Chance that collecting also grants a random power-up.
    pub powerup_chance:          f64,
}

impl Default for SpecialConfig {
    fn default() -> Self {
        Self {
            spawn_chance_per_second: 0.10,
            life_min:                10.0,
            life_max:                20.0,
            value_min:               800,
            value_max:               3_500,
            click_radius:            18.0,
            area:                    (120.0, 120.0, 680.0, 380.0),
            powerup_chance:          0.15,
        }
    }
}

// ── Wheel mini-game ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "prize", rename_all = "snake_case")]
pub enum WheelPrize {
    /// `income_seconds` worth of AFK income, never less than `minimum`.
    Money { income_seconds: Seconds, minimum: Money },
    Powerup { kind: PowerupKind },
    Seeds { amount: u64 },
    SkillPoints { amount: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WheelSegment {
    pub prize:  WheelPrize,
    pub weight: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    pub cooldown: Seconds,
    pub segments: Vec<WheelSegment>,
}

impl Default for WheelConfig {
    fn default() -> Self {
        let seg = |prize, weight| WheelSegment { prize, weight };
        Self {
            cooldown: 300.0,
            segments: vec![
                seg(WheelPrize::Money { income_seconds: 60.0, minimum: 500.0 }, 5),
                seg(WheelPrize::Powerup { kind: PowerupKind::ClickFrenzy }, 3),
                seg(WheelPrize::Powerup { kind: PowerupKind::IncomeRush }, 3),
                seg(WheelPrize::Seeds { amount: 1 }, 1),
                seg(WheelPrize::SkillPoints { amount: 1 }, 1),
            ],
        }
    }
}

// ── Session-level ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineConfig {
    pub max_seconds: Seconds,
    pub efficiency:  f64,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self { max_seconds: 8.0 * 3600.0, efficiency: 0.5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    pub reward_per_day: Money,
    pub max_streak_days: u32,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self { reward_per_day: 500.0, max_streak_days: 7 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    pub interval: Seconds,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self { interval: 30.0 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn for_date(date: NaiveDate) -> Self {
        match date.month() {
            3..=5  => Self::Spring,
            6..=8  => Self::Summer,
            9..=11 => Self::Autumn,
            _      => Self::Winter,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonConfig {
    pub spring: f64,
    pub summer: f64,
    pub autumn: f64,
    pub winter: f64,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self { spring: 1.10, summer: 1.0, autumn: 1.0, winter: 1.0 }
    }
}

impl SeasonConfig {
    pub fn multiplier(&self, season: Season) -> f64 {
        match season {
            Season::Spring => self.spring,
            Season::Summer => self.summer,
            Season::Autumn => self.autumn,
            Season::Winter => self.winter,
        }
    }
}

// ── Root ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub economy:         EconomyConfig,
    pub grass_catalogue: Vec<GrassTier>,
    pub weather:         WeatherConfig,
    pub combo:           ComboConfig,
    pub critical:        CriticalConfig,
    pub prestige:        PrestigeConfig,
    pub boss:            BossConfig,
    pub powerups:        PowerupConfig,
    pub specials:        SpecialConfig,
    pub wheel:           WheelConfig,
    pub offline:         OfflineConfig,
    pub login:           LoginConfig,
    pub autosave:        AutosaveConfig,
    pub seasons:         SeasonConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            economy:         EconomyConfig::default(),
            grass_catalogue: default_grass_catalogue(),
            weather:         WeatherConfig::default(),
            combo:           ComboConfig::default(),
            critical:        CriticalConfig::default(),
            prestige:        PrestigeConfig::default(),
            boss:            BossConfig::default(),
            powerups:        PowerupConfig::default(),
            specials:        SpecialConfig::default(),
            wheel:           WheelConfig::default(),
            offline:         OfflineConfig::default(),
            login:           LoginConfig::default(),
            autosave:        AutosaveConfig::default(),
            seasons:         SeasonConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load a balance override file. Sections missing from the file keep
    /// their built-in values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Cannot parse {}", path.display()))?;
        config.validate()?;
        log::info!("Loaded balance config from {}", path.display());
        Ok(config)
    }

    /// Reject balances that would break the economy's invariants.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.grass_catalogue.is_empty() {
            bail!("grass_catalogue must contain at least one tier");
        }
        if self.grass_catalogue[0].cost != 0.0 {
            bail!("the first grass tier must be free");
        }
        let e = &self.economy;
        for (name, growth) in [
            ("afk_growth_first_tier", e.afk_growth_first_tier),
            ("afk_growth_upper_tiers", e.afk_growth_upper_tiers),
            ("multiplier_growth", e.multiplier_growth),
        ] {
            if growth <= 1.0 {
                bail!("{name} must be greater than 1.0, got {growth}");
            }
        }
        if self.weather.period <= 0.0 || self.autosave.interval <= 0.0 {
            bail!("weather period and autosave interval must be positive");
        }
        if self.boss.hp_growth < 1.0 || self.boss.base_hp <= 0.0 {
            bail!("boss hp must be positive and non-shrinking");
        }
        Ok(())
    }
}
