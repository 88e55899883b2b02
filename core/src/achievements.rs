//! Achievements: a programmatically generated catalogue and an idempotent
//! unlock.
//!
//! Definitions are never persisted. The catalogue is rebuilt from the
//! balance config at session start and after a wipe, and `ensure_defined`
//! recreates a locked entry for every definition the state is missing, so
//! generated ids survive a wipe exactly like the hand-written ones.

use crate::{
    config::GameConfig,
    event::GameEvent,
    state::{AchievementProgress, EconomyState},
    types::Money,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    HighestMoney,
    TotalClicks,
    BestCombo,
    CriticalHits,
    BossesDefeated,
    PrestigeLevel,
    PlayTimeSeconds,
    GrassTier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AchievementDef {
    pub id:        String,
    pub name:      String,
    pub metric:    Metric,
    pub threshold: f64,
    pub reward:    Money,
}

fn def(id: String, name: String, metric: Metric, threshold: f64, reward: Money) -> AchievementDef {
    AchievementDef { id, name, metric, threshold, reward }
}

/// Every achievement for the given balance.
pub fn catalogue(config: &GameConfig) -> Vec<AchievementDef> {
    let mut defs = Vec::new();

    for (label, amount) in [("1K", 1e3), ("10K", 1e4), ("100K", 1e5), ("1M", 1e6), ("10M", 1e7)] {
        defs.push(def(
            format!("money_{}", label.to_lowercase()),
            format!("Saved ${label}"),
            Metric::HighestMoney,
            amount,
            amount * 0.05,
        ));
    }
    for clicks in [100u64, 1_000, 10_000] {
        defs.push(def(
            format!("clicks_{clicks}"),
            format!("{clicks} Touches"),
            Metric::TotalClicks,
            clicks as f64,
            clicks as f64 * 2.0,
        ));
    }
    for combo in [25u32, 100] {
        defs.push(def(
            format!("combo_{combo}"),
            format!("Combo x{combo}"),
            Metric::BestCombo,
            f64::from(combo),
            f64::from(combo) * 40.0,
        ));
    }
    for crits in [10u64, 100] {
        defs.push(def(
            format!("crit_{crits}"),
            format!("{crits} Critical Hits"),
            Metric::CriticalHits,
            crits as f64,
            crits as f64 * 50.0,
        ));
    }
    for bosses in [1u32, 10] {
        defs.push(def(
            format!("boss_{bosses}"),
            format!("Defeated {bosses} Boss{}", if bosses == 1 { "" } else { "es" }),
            Metric::BossesDefeated,
            f64::from(bosses),
            f64::from(bosses) * 2_000.0,
        ));
    }
    for level in [1u32, 5] {
        defs.push(def(
            format!("prestige_{level}"),
            format!("Prestige {level}"),
            Metric::PrestigeLevel,
            f64::from(level),
            0.0,
        ));
    }
    for hours in [1u32, 10] {
        defs.push(def(
            format!("playtime_{hours}h"),
            format!("Touched Grass for {hours}h"),
            Metric::PlayTimeSeconds,
            f64::from(hours) * 3600.0,
            f64::from(hours) * 1_000.0,
        ));
    }
    for (index, tier) in config.grass_catalogue.iter().enumerate().skip(1) {
        defs.push(def(
            format!("skin_{index}"),
            format!("Owner of {}", tier.name),
            Metric::GrassTier,
            index as f64,
            tier.cost * 0.1,
        ));
    }

    defs
}

/// Add a locked entry for every definition the state does not know yet.
pub fn ensure_defined(state: &mut EconomyState, defs: &[AchievementDef]) {
    for d in defs {
        state.achievements.entry(d.id.clone()).or_default();
    }
}

pub fn metric_value(state: &EconomyState, metric: Metric) -> f64 {
    match metric {
        Metric::HighestMoney    => state.highest_money.max(state.money),
        Metric::TotalClicks     => state.total_clicks as f64,
        Metric::BestCombo       => f64::from(state.best_combo),
        Metric::CriticalHits    => state.total_crits as f64,
        Metric::BossesDefeated  => f64::from(state.boss.defeated_count),
        Metric::PrestigeLevel   => f64::from(state.prestige_level),
        Metric::PlayTimeSeconds => state.play_time_seconds,
        Metric::GrassTier       => state.highest_grass_index as f64,
    }
}

/// Mark `id` unlocked. Returns the reward to credit and the display event,
/// or `None` when the achievement is unknown or already unlocked. Safe to
/// call any number of times.
pub fn unlock(
    state: &mut EconomyState,
    defs:  &[AchievementDef],
    id:    &str,
) -> Option<(Money, GameEvent)> {
    let d = defs.iter().find(|d| d.id == id)?;
    let entry = state.achievements.entry(d.id.clone()).or_default();
    if entry.unlocked {
        return None;
    }
    *entry = AchievementProgress { unlocked: true, progress: 1.0 };
    Some((
        d.reward,
        GameEvent::AchievementUnlocked {
            id:     d.id.clone(),
            name:   d.name.clone(),
            reward: d.reward,
        },
    ))
}

/// Evaluate every threshold, refresh progress and unlock whatever is met.
/// Rewards are credited to `money` here.
pub fn check_all(state: &mut EconomyState, defs: &[AchievementDef]) -> Vec<GameEvent> {
    let mut out = Vec::new();
    for d in defs {
        let value = metric_value(state, d.metric);
        let progress = if d.threshold > 0.0 {
            (value / d.threshold).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let entry = state.achievements.entry(d.id.clone()).or_default();
        if entry.unlocked {
            continue;
        }
        entry.progress = progress;
        if value >= d.threshold {
            if let Some((reward, event)) = unlock(state, defs, &d.id) {
                state.money += reward;
                out.push(event);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_ids_are_unique() {
        let defs = catalogue(&GameConfig::default());
        let mut ids: Vec<&str> = defs.iter().map(|d| d.id.as_str()).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        assert_eq!(before, ids.len());
    }

    #[test]
    fn skin_achievements_follow_the_catalogue() {
        let config = GameConfig::default();
        let defs = catalogue(&config);
        let skins = defs.iter().filter(|d| d.metric == Metric::GrassTier).count();
        assert_eq!(skins, config.grass_catalogue.len() - 1);
    }
}
