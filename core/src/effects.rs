//! Side-effect requests for the shell.
//!
//! RULE: The core never plays audio or draws. Each game event maps to zero
//! or more requests the shell may fulfil however it likes. The player's
//! settings are applied here: muted sound drops PlaySound, disabled shake
//! drops TriggerScreenShake and particle density scales particle counts.

use crate::{
    config::{GameConfig, WheelPrize},
    event::GameEvent,
    snapshot::format_money,
    state::EconomyState,
    types::{Point, Rgb},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SoundId {
    Click,
    Critical,
    Purchase,
    Denied,
    Prestige,
    Powerup,
    Weather,
    BossSpawn,
    BossHit,
    BossDefeat,
    Collect,
    Wheel,
    Achievement,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum SideEffect {
    PlaySound { sound: SoundId },
    SpawnParticles { point: Point, color: Rgb, count: u32 },
    TriggerScreenShake { intensity: f64, duration: f64 },
    ShowNotification { text: String, color: Rgb },
}

// ── Palette ────────────────────────────────────────────────────────

pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const GREEN: Rgb = Rgb(120, 220, 120);
pub const GOLD:  Rgb = Rgb(255, 215, 0);
pub const RED:   Rgb = Rgb(255, 90, 90);
pub const GREY:  Rgb = Rgb(170, 170, 170);
pub const CYAN:  Rgb = Rgb(100, 200, 255);

const CLICK_PARTICLES:    u32 = 8;
const CRIT_PARTICLES:     u32 = 20;
const COLLECT_PARTICLES:  u32 = 15;

struct Builder<'a> {
    state: &'a EconomyState,
    out:   Vec<SideEffect>,
}

impl Builder<'_> {
    fn sound(&mut self, sound: SoundId) -> &mut Self {
        if self.state.settings.sound_enabled {
            self.out.push(SideEffect::PlaySound { sound });
        }
        self
    }

    fn particles(&mut self, point: Point, color: Rgb, count: u32) -> &mut Self {
        let density = self.state.settings.particle_density.clamp(0.0, 4.0);
        let scaled = (f64::from(count) * density).round() as u32;
        if scaled > 0 {
            self.out.push(SideEffect::SpawnParticles { point, color, count: scaled });
        }
        self
    }

    fn shake(&mut self, intensity: f64, duration: f64) -> &mut Self {
        if self.state.settings.screen_shake_enabled {
            self.out.push(SideEffect::TriggerScreenShake { intensity, duration });
        }
        self
    }

    fn notify(&mut self, text: impl Into<String>, color: Rgb) -> &mut Self {
        self.out.push(SideEffect::ShowNotification { text: text.into(), color });
        self
    }
}

/// Requests the shell should carry out for `event`.
pub fn effects_for(event: &GameEvent, state: &EconomyState, config: &GameConfig) -> Vec<SideEffect> {
    let mut b = Builder { state, out: Vec::new() };

    match event {
        GameEvent::GrassClicked { at, critical, color, .. } => {
            if *critical {
                b.sound(SoundId::Critical)
                    .particles(*at, GOLD, CRIT_PARTICLES)
                    .shake(4.0, 0.15);
            } else {
                b.sound(SoundId::Click).particles(*at, *color, CLICK_PARTICLES);
            }
        }
        GameEvent::UpgradePurchased { .. } | GameEvent::SkinSelected { .. } => {
            b.sound(SoundId::Purchase);
        }
        GameEvent::SkinPurchased { index, .. } => {
            let name = config.grass_catalogue.get(*index).map_or("grass", |t| t.name.as_str());
            b.sound(SoundId::Purchase).notify(format!("Unlocked {name}!"), GOLD);
        }
        GameEvent::SkillPurchased { skill, level } => {
            b.sound(SoundId::Purchase)
                .notify(format!("{} level {level}", skill.label()), GREEN);
        }
        GameEvent::PurchaseDenied { .. } => {
            b.sound(SoundId::Denied);
        }
        GameEvent::PrestigePerformed { level, seeds, .. } => {
            b.sound(SoundId::Prestige)
                .shake(8.0, 0.5)
                .notify(format!("Prestige {level}! +{seeds} seeds"), GOLD);
        }
        GameEvent::PowerupActivated { kind, multiplier, .. } => {
            b.sound(SoundId::Powerup)
                .notify(format!("{} x{multiplier}!", kind.label()), CYAN);
        }
        GameEvent::PowerupExpired { kind } => {
            b.notify(format!("{} ended", kind.label()), GREY);
        }
        GameEvent::WeatherChanged { to, .. } => {
            b.sound(SoundId::Weather)
                .notify(format!("Weather: {}", to.label()), WHITE);
        }
        GameEvent::BossSpawned { kind, .. } => {
            b.sound(SoundId::BossSpawn)
                .shake(6.0, 0.4)
                .notify(format!("{} appeared!", kind.label()), RED);
        }
        GameEvent::BossDamaged { .. } => {
            b.sound(SoundId::BossHit);
        }
        GameEvent::BossDefeated { kind, reward, .. } => {
            b.sound(SoundId::BossDefeat)
                .shake(10.0, 0.6)
                .notify(format!("Defeated {}! +{}", kind.label(), format_money(*reward)), GOLD);
        }
        GameEvent::BossEscaped { kind, .. } => {
            b.notify(format!("{} escaped", kind.label()), RED);
        }
        GameEvent::SpecialCollected { position, value, .. } => {
            b.sound(SoundId::Collect)
                .particles(*position, CYAN, COLLECT_PARTICLES)
                .notify(format!("+{}", format_money(*value)), CYAN);
        }
        GameEvent::WheelSpun { prize, value } => {
            let text = match prize {
                WheelPrize::Money { .. } => format!("Wheel: +{}", format_money(*value)),
                WheelPrize::Powerup { kind } => format!("Wheel: {}", kind.label()),
                WheelPrize::Seeds { amount } => format!("Wheel: +{amount} seeds"),
                WheelPrize::SkillPoints { amount } => format!("Wheel: +{amount} skill points"),
            };
            b.sound(SoundId::Wheel).notify(text, GOLD);
        }
        GameEvent::AchievementUnlocked { name, .. } => {
            b.sound(SoundId::Achievement)
                .notify(format!("Achievement: {name}"), GOLD);
        }
        GameEvent::GameSaved { .. } => {
            b.notify("Game Saved!", GREEN);
        }
        GameEvent::SaveFailed { .. } => {
            b.notify("Save failed!", RED);
        }
        GameEvent::SaveWiped => {
            b.notify("Save wiped", RED);
        }
        GameEvent::OfflineEarnings { amount, .. } => {
            b.notify(format!("Welcome back! +{}", format_money(*amount)), GREEN);
        }
        GameEvent::DailyReward { streak, amount } => {
            b.notify(format!("Day {streak} bonus: +{}", format_money(*amount)), GOLD);
        }
        GameEvent::SoundToggled { enabled } => {
            b.sound(SoundId::Click)
                .notify(if *enabled { "Sound on" } else { "Sound off" }, WHITE);
        }
        GameEvent::PanelOpened { .. } | GameEvent::PanelClosed { .. } => {
            b.sound(SoundId::Click);
        }
        GameEvent::SessionStarted { .. }
        | GameEvent::AutosaveDue { .. }
        | GameEvent::QuitRequested
        | GameEvent::ComboBroken { .. }
        | GameEvent::SpecialSpawned { .. }
        | GameEvent::SpecialExpired { .. } => {}
    }

    b.out
}
