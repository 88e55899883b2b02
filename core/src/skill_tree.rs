//! Skill tree: node definitions, purchase gating and effect lookups.
//!
//! Skills are bought with skill points (earned by prestiging, defeating
//! bosses and the wheel). A node can be levelled up to `max_level`; its
//! effect is `level * effect_per_level`, applied immediately.

use crate::{
    config::GameConfig,
    event::{DenyReason, GameEvent},
    state::EconomyState,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SkillId {
    /// +% click yield.
    ClickPower,
    /// +% AFK income.
    GreenThumb,
    /// +critical chance.
    SharpEye,
    /// +critical multiplier.
    HeavyHitter,
    /// +seconds before a combo breaks.
    ComboKeeper,
    /// +% damage against bosses.
    BossSlayer,
    /// +% grass seeds on prestige.
    SeedHoarder,
}

impl SkillId {
    pub const ALL: [SkillId; 7] = [
        Self::ClickPower,
        Self::GreenThumb,
        Self::SharpEye,
        Self::HeavyHitter,
        Self::ComboKeeper,
        Self::BossSlayer,
        Self::SeedHoarder,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::ClickPower  => "click_power",
            Self::GreenThumb  => "green_thumb",
            Self::SharpEye    => "sharp_eye",
            Self::HeavyHitter => "heavy_hitter",
            Self::ComboKeeper => "combo_keeper",
            Self::BossSlayer  => "boss_slayer",
            Self::SeedHoarder => "seed_hoarder",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ClickPower  => "Click Power",
            Self::GreenThumb  => "Green Thumb",
            Self::SharpEye    => "Sharp Eye",
            Self::HeavyHitter => "Heavy Hitter",
            Self::ComboKeeper => "Combo Keeper",
            Self::BossSlayer  => "Boss Slayer",
            Self::SeedHoarder => "Seed Hoarder",
        }
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SkillId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.key() == s)
            .ok_or_else(|| format!("unknown skill id '{s}'"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillNode {
    pub level:            u32,
    pub max_level:        u32,
    pub cost:             u32,
    pub effect_per_level: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisite:     Option<SkillId>,
}

impl SkillNode {
    pub fn unlocked(&self) -> bool {
        self.level > 0
    }

    pub fn maxed(&self) -> bool {
        self.level >= self.max_level
    }

    pub fn effect(&self) -> f64 {
        f64::from(self.level) * self.effect_per_level
    }
}

/// The built-in tree, every node at level 0.
pub fn default_tree() -> BTreeMap<SkillId, SkillNode> {
    let node = |max_level, cost, effect_per_level, prerequisite| SkillNode {
        level: 0,
        max_level,
        cost,
        effect_per_level,
        prerequisite,
    };
    BTreeMap::from([
        (SkillId::ClickPower,  node(5, 1, 0.10, None)),
        (SkillId::GreenThumb,  node(5, 1, 0.10, None)),
        (SkillId::SharpEye,    node(5, 2, 0.02, Some(SkillId::ClickPower))),
        (SkillId::HeavyHitter, node(3, 2, 0.50, Some(SkillId::SharpEye))),
        (SkillId::ComboKeeper, node(3, 1, 0.50, Some(SkillId::ClickPower))),
        (SkillId::BossSlayer,  node(3, 3, 0.25, Some(SkillId::HeavyHitter))),
        (SkillId::SeedHoarder, node(5, 2, 0.10, Some(SkillId::GreenThumb))),
    ])
}

/// Current effect of a skill, zero when the node is missing.
pub fn bonus(state: &EconomyState, id: SkillId) -> f64 {
    state.skills.get(&id).map(SkillNode::effect).unwrap_or(0.0)
}

/// Why `id` cannot be bought right now, if anything.
pub fn purchase_blocker(state: &EconomyState, id: SkillId) -> Option<DenyReason> {
    let Some(node) = state.skills.get(&id) else {
        return Some(DenyReason::UnknownSkill);
    };
    if node.maxed() {
        return Some(DenyReason::SkillMaxed);
    }
    if let Some(pre) = node.prerequisite {
        let pre_unlocked = state.skills.get(&pre).is_some_and(SkillNode::unlocked);
        if !pre_unlocked {
            return Some(DenyReason::PrerequisiteLocked { prerequisite: pre });
        }
    }
    if state.skill_points < node.cost {
        return Some(DenyReason::InsufficientSkillPoints {
            needed:    node.cost,
            available: state.skill_points,
        });
    }
    None
}

/// Spend skill points on one level of `id` and apply the effect at once.
pub fn buy_skill(state: &mut EconomyState, config: &GameConfig, id: SkillId) -> Vec<GameEvent> {
    if let Some(reason) = purchase_blocker(state, id) {
        return vec![GameEvent::PurchaseDenied { reason }];
    }
    let Some(node) = state.skills.get_mut(&id) else {
        return vec![GameEvent::PurchaseDenied { reason: DenyReason::UnknownSkill }];
    };
    state.skill_points -= node.cost;
    node.level += 1;
    let level = node.level;
    recompute_derived(state, config);

    log::info!("skill {id} -> level {level}");
    vec![GameEvent::SkillPurchased { skill: id, level }]
}

/// Refresh the fields that are derived from skill levels.
pub fn recompute_derived(state: &mut EconomyState, config: &GameConfig) {
    state.critical_hit_chance =
        (config.critical.base_chance + bonus(state, SkillId::SharpEye)).clamp(0.0, 1.0);
    state.critical_hit_multiplier =
        config.critical.base_multiplier + bonus(state, SkillId::HeavyHitter);
}
