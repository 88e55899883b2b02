use crate::{
    input::Panel,
    skill_tree::SkillId,
    types::{Point, SpecialId},
};
use serde::{Deserialize, Serialize};

/// Everything a player can ask the game to do. The dispatcher turns one
/// click into at most one action; the runner may also submit actions
/// directly.
/// Variants are added over time, never removed or reordered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    // ── Panels ────────────────────────────────────
    CloseModal,
    /// Opens the panel, or closes it when it is already the open one.
    OpenPanel { panel: Panel },
    SelectSkin { index: usize },
    BuySkill { skill: SkillId },

    // ── Play field ────────────────────────────────
    CollectSpecial { id: SpecialId },
    AttackBoss,
    ClickGrass { at: Point },

    // ── Buttons ───────────────────────────────────
    BuyAfk,
    BuyMultiplier,
    SaveGame,
    WipeSave,
    SpinWheel,
    Prestige,
    ToggleSound,
}

impl Action {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CloseModal          => "close_modal",
            Self::OpenPanel { .. }    => "open_panel",
            Self::SelectSkin { .. }   => "select_skin",
            Self::BuySkill { .. }     => "buy_skill",
            Self::CollectSpecial { .. } => "collect_special",
            Self::AttackBoss          => "attack_boss",
            Self::ClickGrass { .. }   => "click_grass",
            Self::BuyAfk              => "buy_afk",
            Self::BuyMultiplier       => "buy_multiplier",
            Self::SaveGame            => "save_game",
            Self::WipeSave            => "wipe_save",
            Self::SpinWheel           => "spin_wheel",
            Self::Prestige            => "prestige",
            Self::ToggleSound         => "toggle_sound",
        }
    }
}
