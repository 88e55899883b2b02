//! Display snapshot: everything the shell needs to draw one frame.
//!
//! A snapshot is a pure read of the economy state plus the UI state. It
//! is rebuilt every frame and never fed back into the game.

use crate::{
    config::GameConfig,
    economy_rules,
    income_subsystem,
    input::ModalState,
    prestige_rules,
    skill_tree::{self, SkillId},
    state::EconomyState,
    types::{Money, Point, Rgb, Seconds, SpecialId},
};
use serde::{Deserialize, Serialize};

/// Seconds a notification stays on screen.
pub const NOTIFICATION_SECONDS: Seconds = 2.0;
/// The "Game Saved!" notice is shorter.
pub const SAVE_NOTICE_SECONDS: Seconds = 0.9;

/// `$` followed by the whole-dollar amount.
pub fn format_money(amount: Money) -> String {
    let whole = if amount.is_finite() { amount.floor().max(0.0) } else { 0.0 };
    format!("${whole:.0}")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub text:      String,
    pub color:     Rgb,
    pub remaining: Seconds,
}

/// Presentation state owned by the session, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UiState {
    pub modal:        ModalState,
    pub notification: Option<Notification>,
}

impl UiState {
    pub fn notify(&mut self, text: String, color: Rgb, duration: Seconds) {
        self.notification = Some(Notification { text, color, remaining: duration });
    }

    pub fn tick(&mut self, dt: Seconds) {
        if let Some(n) = &mut self.notification {
            n.remaining -= dt;
            if n.remaining <= 0.0 {
                self.notification = None;
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BossView {
    pub label:       String,
    pub level:       u32,
    pub hp:          f64,
    pub max_hp:      f64,
    pub hp_fraction: f64,
    pub time_left:   Seconds,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PowerupView {
    pub label:      String,
    pub multiplier: f64,
    pub remaining:  Seconds,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpecialView {
    pub id:            SpecialId,
    pub position:      Point,
    pub radius:        f64,
    pub value:         Money,
    pub life_fraction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkinView {
    pub index:       usize,
    pub name:        String,
    pub cost:        Money,
    pub owned:       bool,
    pub selected:    bool,
    /// Next rung of the ladder and affordable.
    pub purchasable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillView {
    pub skill:     SkillId,
    pub label:     String,
    pub level:     u32,
    pub max_level: u32,
    pub cost:      u32,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsView {
    pub highest_money:        Money,
    pub total_clicks:         u64,
    pub best_combo:           u32,
    pub total_crits:          u64,
    pub bosses_defeated:      u32,
    pub prestige_level:       u32,
    pub grass_seeds:          u64,
    pub skill_points:         u32,
    pub play_time_seconds:    Seconds,
    pub login_streak:         u32,
    pub achievements_unlocked: usize,
    pub achievements_total:   usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplaySnapshot {
    pub money:             Money,
    pub money_display:     String,
    pub income_per_second: f64,
    pub income_display:    String,
    pub multiplier:        f64,
    pub click_value:       Money,
    pub total_clicks:      u64,

    pub weather_label:      String,
    pub weather_multiplier: f64,
    /// Shown once a combo reaches two clicks.
    pub combo_label:        Option<String>,
    pub grass_name:         String,
    pub grass_index:        usize,

    pub afk_button_label:        String,
    pub multiplier_button_label: String,
    pub afk_affordable:          bool,
    pub multiplier_affordable:   bool,
    pub prestige_available:      bool,
    pub prestige_seeds_preview:  u64,
    pub wheel_ready:             bool,
    pub wheel_cooldown:          Seconds,
    pub sound_enabled:           bool,

    pub boss:         Option<BossView>,
    pub powerups:     Vec<PowerupView>,
    pub specials:     Vec<SpecialView>,
    pub shop:         Vec<SkinView>,
    pub skills:       Vec<SkillView>,
    pub stats:        StatsView,
    pub notification: Option<Notification>,
    pub modal:        ModalState,
}

pub fn snapshot(state: &EconomyState, ui: &UiState, config: &GameConfig) -> DisplaySnapshot {
    let income = income_subsystem::income_per_second(state);
    let boss = state.boss.active.then(|| BossView {
        label:       state.boss.kind.label().to_string(),
        level:       state.boss.level,
        hp:          state.boss.hp,
        max_hp:      state.boss.max_hp,
        hp_fraction: state.boss.hp_fraction(),
        time_left:   state.boss.timer.max(0.0),
    });

    let shop = config
        .grass_catalogue
        .iter()
        .enumerate()
        .map(|(index, tier)| SkinView {
            index,
            name:        tier.name.clone(),
            cost:        tier.cost,
            owned:       state.has_skin(index),
            selected:    index == state.current_grass_index,
            purchasable: index == state.highest_grass_index + 1 && state.money >= tier.cost,
        })
        .collect();

    let skills = state
        .skills
        .iter()
        .map(|(id, node)| SkillView {
            skill:     *id,
            label:     id.label().to_string(),
            level:     node.level,
            max_level: node.max_level,
            cost:      node.cost,
            available: skill_tree::purchase_blocker(state, *id).is_none(),
        })
        .collect();

    DisplaySnapshot {
        money:             state.money,
        money_display:     format_money(state.money),
        income_per_second: income,
        income_display:    format!("{income:.1}/s"),
        multiplier:        state.multiplier,
        click_value:       economy_rules::click_yield(state, config, 1.0).amount,
        total_clicks:      state.total_clicks,

        weather_label:      state.weather.label().to_string(),
        weather_multiplier: state.weather_multiplier,
        combo_label:        (state.combo_count >= 2).then(|| format!("{}x Combo!", state.combo_count)),
        grass_name:         state.grass_tier(config).name.clone(),
        grass_index:        state.current_grass_index,

        afk_button_label:        format!("AFK Income ({})", format_money(state.afk_upgrade_cost)),
        multiplier_button_label: format!("Multiplier ({})", format_money(state.multiplier_upgrade_cost)),
        afk_affordable:          state.money >= state.afk_upgrade_cost,
        multiplier_affordable:   state.money >= state.multiplier_upgrade_cost,
        prestige_available:      prestige_rules::can_prestige(state, config),
        prestige_seeds_preview:  prestige_rules::prestige_seeds(state, config),
        wheel_ready:             state.wheel_cooldown <= 0.0,
        wheel_cooldown:          state.wheel_cooldown,
        sound_enabled:           state.settings.sound_enabled,

        boss,
        powerups: state
            .active_powerups
            .iter()
            .map(|p| PowerupView {
                label:      p.kind.label().to_string(),
                multiplier: p.multiplier,
                remaining:  p.remaining,
            })
            .collect(),
        specials: state
            .specials
            .iter()
            .map(|s| SpecialView {
                id:            s.id,
                position:      s.position,
                radius:        s.radius,
                value:         s.value,
                life_fraction: s.life_fraction(),
            })
            .collect(),
        shop,
        skills,
        stats: StatsView {
            highest_money:         state.highest_money,
            total_clicks:          state.total_clicks,
            best_combo:            state.best_combo,
            total_crits:           state.total_crits,
            bosses_defeated:       state.boss.defeated_count,
            prestige_level:        state.prestige_level,
            grass_seeds:           state.grass_seeds,
            skill_points:          state.skill_points,
            play_time_seconds:     state.play_time_seconds,
            login_streak:          state.login_streak,
            achievements_unlocked: state.achievements.values().filter(|a| a.unlocked).count(),
            achievements_total:    state.achievements.len(),
        },
        notification: ui.notification.clone(),
        modal:        ui.modal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_display_floors() {
        assert_eq!(format_money(0.0), "$0");
        assert_eq!(format_money(1234.99), "$1234");
        assert_eq!(format_money(f64::NAN), "$0");
    }

    #[test]
    fn combo_label_needs_two_clicks() {
        let config = GameConfig::default();
        let mut state = EconomyState::new(&config);
        state.combo_count = 1;
        assert_eq!(snapshot(&state, &UiState::default(), &config).combo_label, None);
        state.combo_count = 2;
        assert_eq!(
            snapshot(&state, &UiState::default(), &config).combo_label.as_deref(),
            Some("2x Combo!")
        );
    }

    #[test]
    fn broken_boss_shows_zero_hp_fraction() {
        let config = GameConfig::default();
        let mut state = EconomyState::new(&config);
        state.boss.active = true;
        state.boss.max_hp = 0.0;
        let snap = snapshot(&state, &UiState::default(), &config);
        assert_eq!(snap.boss.map(|b| b.hp_fraction), Some(0.0));
    }
}
