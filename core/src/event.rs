//! The game event stream: every observable state change.
//!
//! RULE: Rule functions and tick subsystems report what happened ONLY
//! through events. Side-effect requests for the shell (sounds, particles,
//! notifications) are derived from events in effects.rs, never emitted
//! directly by game logic.

use crate::{
    config::WheelPrize,
    input::Panel,
    skill_tree::SkillId,
    state::{BossKind, PowerupKind, Weather},
    types::{Frame, Money, Point, Rgb, Seconds, SpecialId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    AfkIncome,
    ClickMultiplier,
}

/// Why a purchase or action was refused. Refusals are ordinary outcomes,
/// not errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DenyReason {
    InsufficientFunds { needed: Money, available: Money },
    InsufficientSkillPoints { needed: u32, available: u32 },
    SkinOutOfRange { index: usize },
    SkinNotNextTier { index: usize, next: usize },
    SkillMaxed,
    PrerequisiteLocked { prerequisite: SkillId },
    UnknownSkill,
    PrestigeNotReady { needed: Money },
    WheelOnCooldown { remaining: Seconds },
    NoActiveBoss,
    SpecialGone { id: SpecialId },
}

/// Every event emitted during play.
/// Variants are added over time, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Session ────────────────────────────────────
    SessionStarted {
        seed: u64,
    },
    OfflineEarnings {
        elapsed:  Seconds,
        credited: Seconds,
        amount:   Money,
    },
    DailyReward {
        streak: u32,
        amount: Money,
    },
    AutosaveDue {
        frame: Frame,
    },
    GameSaved {
        manual: bool,
    },
    SaveFailed {
        reason: String,
    },
    SaveWiped,
    QuitRequested,

    // ── Clicks & purchases ─────────────────────────
    GrassClicked {
        at:       Point,
        amount:   Money,
        critical: bool,
        combo:    u32,
        /// Particle colour of the tier that was clicked.
        color:    Rgb,
    },
    UpgradePurchased {
        upgrade:  UpgradeKind,
        cost:     Money,
        next_cost: Money,
    },
    SkinSelected {
        index: usize,
    },
    SkinPurchased {
        index: usize,
        cost:  Money,
    },
    SkillPurchased {
        skill: SkillId,
        level: u32,
    },
    PurchaseDenied {
        reason: DenyReason,
    },
    PrestigePerformed {
        level:        u32,
        seeds:        u64,
        skill_points: u32,
    },

    // ── Timed state ────────────────────────────────
    ComboBroken {
        count: u32,
    },
    PowerupActivated {
        kind:       PowerupKind,
        multiplier: f64,
        duration:   Seconds,
    },
    PowerupExpired {
        kind: PowerupKind,
    },
    WeatherChanged {
        from:       Weather,
        to:         Weather,
        multiplier: f64,
    },
    BossSpawned {
        kind:  BossKind,
        level: u32,
        hp:    f64,
    },
    BossDamaged {
        damage:  f64,
        hp_left: f64,
    },
    BossDefeated {
        kind:   BossKind,
        level:  u32,
        reward: Money,
    },
    BossEscaped {
        kind:  BossKind,
        level: u32,
    },
    SpecialSpawned {
        id:       SpecialId,
        position: Point,
    },
    SpecialCollected {
        id:       SpecialId,
        position: Point,
        value:    Money,
    },
    SpecialExpired {
        id: SpecialId,
    },
    WheelSpun {
        prize: WheelPrize,
        value: f64,
    },
    AchievementUnlocked {
        id:     String,
        name:   String,
        reward: Money,
    },

    // ── UI ─────────────────────────────────────────
    PanelOpened {
        panel: Panel,
    },
    PanelClosed {
        panel: Panel,
    },
    SoundToggled {
        enabled: bool,
    },
}

impl GameEvent {
    /// Stable snake_case name, used in logs and by the runner.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. }      => "session_started",
            Self::OfflineEarnings { .. }     => "offline_earnings",
            Self::DailyReward { .. }         => "daily_reward",
            Self::AutosaveDue { .. }         => "autosave_due",
            Self::GameSaved { .. }           => "game_saved",
            Self::SaveFailed { .. }          => "save_failed",
            Self::SaveWiped                  => "save_wiped",
            Self::QuitRequested              => "quit_requested",
            Self::GrassClicked { .. }        => "grass_clicked",
            Self::UpgradePurchased { .. }    => "upgrade_purchased",
            Self::SkinSelected { .. }        => "skin_selected",
            Self::SkinPurchased { .. }       => "skin_purchased",
            Self::SkillPurchased { .. }      => "skill_purchased",
            Self::PurchaseDenied { .. }      => "purchase_denied",
            Self::PrestigePerformed { .. }   => "prestige_performed",
            Self::ComboBroken { .. }         => "combo_broken",
            Self::PowerupActivated { .. }    => "powerup_activated",
            Self::PowerupExpired { .. }      => "powerup_expired",
            Self::WeatherChanged { .. }      => "weather_changed",
            Self::BossSpawned { .. }         => "boss_spawned",
            Self::BossDamaged { .. }         => "boss_damaged",
            Self::BossDefeated { .. }        => "boss_defeated",
            Self::BossEscaped { .. }         => "boss_escaped",
            Self::SpecialSpawned { .. }      => "special_spawned",
            Self::SpecialCollected { .. }    => "special_collected",
            Self::SpecialExpired { .. }      => "special_expired",
            Self::WheelSpun { .. }           => "wheel_spun",
            Self::AchievementUnlocked { .. } => "achievement_unlocked",
            Self::PanelOpened { .. }         => "panel_opened",
            Self::PanelClosed { .. }         => "panel_closed",
            Self::SoundToggled { .. }        => "sound_toggled",
        }
    }
}
