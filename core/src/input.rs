//! Input dispatch: turns one click into at most one action.
//!
//! RULE: A click is consumed by exactly one region. Regions are tested in
//! priority layers, and within a layer in the order the shell supplied
//! them:
//!   1. an open modal panel (its close control, its own toggle button and
//!      its in-panel controls; everything else under it is absorbed)
//!   2. special collectibles
//!   3. the boss
//!   4. primary buttons
//!   5. the grass sprite
//!
//! The core knows nothing about layout. The shell describes this frame's
//! clickable regions and the dispatcher only hit-tests them.

use crate::{
    command::Action,
    skill_tree::SkillId,
    types::{Point, SpecialId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Shop,
    Stats,
    Skills,
}

impl Panel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Shop   => "Shop",
            Self::Stats  => "Stats",
            Self::Skills => "Skills",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "state", content = "panel", rename_all = "snake_case")]
pub enum ModalState {
    #[default]
    Closed,
    Open(Panel),
}

impl ModalState {
    pub fn open_panel(&self) -> Option<Panel> {
        match self {
            Self::Closed      => None,
            Self::Open(panel) => Some(*panel),
        }
    }
}

/// What a clickable region stands for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionId {
    CloseModal,
    OpenPanel { panel: Panel },
    ShopSkin { index: usize },
    SkillNode { skill: SkillId },
    Special { id: SpecialId },
    Boss,
    BuyAfk,
    BuyMultiplier,
    SaveGame,
    WipeSave,
    SpinWheel,
    Prestige,
    ToggleSound,
    Grass,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Rect { x: f64, y: f64, w: f64, h: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
}

impl Shape {
    pub fn contains(&self, p: Point) -> bool {
        match *self {
            Self::Rect { x, y, w, h } => p.x >= x && p.x <= x + w && p.y >= y && p.y <= y + h,
            Self::Circle { cx, cy, r } => {
                let (dx, dy) = (p.x - cx, p.y - cy);
                dx * dx + dy * dy <= r * r
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Region {
    pub id:    RegionId,
    pub shape: Shape,
}

impl Region {
    pub fn rect(id: RegionId, x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { id, shape: Shape::Rect { x, y, w, h } }
    }

    pub fn circle(id: RegionId, cx: f64, cy: f64, r: f64) -> Self {
        Self { id, shape: Shape::Circle { cx, cy, r } }
    }
}

/// Raw input for one frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    Click { point: Point },
    Quit,
}

// Action for a region while `panel` is open, or None if the panel
// absorbs the click.
fn modal_action(panel: Panel, id: RegionId) -> Option<Action> {
    match id {
        RegionId::CloseModal => Some(Action::CloseModal),
        RegionId::OpenPanel { panel: p } if p == panel => Some(Action::OpenPanel { panel: p }),
        RegionId::ShopSkin { index } if panel == Panel::Shop => Some(Action::SelectSkin { index }),
        RegionId::SkillNode { skill } if panel == Panel::Skills => Some(Action::BuySkill { skill }),
        _ => None,
    }
}

fn layer(id: RegionId) -> Option<u8> {
    match id {
        RegionId::Special { .. } => Some(0),
        RegionId::Boss => Some(1),
        RegionId::BuyAfk
        | RegionId::BuyMultiplier
        | RegionId::SaveGame
        | RegionId::OpenPanel { .. }
        | RegionId::WipeSave
        | RegionId::SpinWheel
        | RegionId::Prestige
        | RegionId::ToggleSound => Some(2),
        RegionId::Grass => Some(3),
        // Panel controls only exist while their panel is open.
        RegionId::CloseModal | RegionId::ShopSkin { .. } | RegionId::SkillNode { .. } => None,
    }
}

fn play_action(id: RegionId, point: Point) -> Option<Action> {
    Some(match id {
        RegionId::Special { id } => Action::CollectSpecial { id },
        RegionId::Boss => Action::AttackBoss,
        RegionId::BuyAfk => Action::BuyAfk,
        RegionId::BuyMultiplier => Action::BuyMultiplier,
        RegionId::SaveGame => Action::SaveGame,
        RegionId::OpenPanel { panel } => Action::OpenPanel { panel },
        RegionId::WipeSave => Action::WipeSave,
        RegionId::SpinWheel => Action::SpinWheel,
        RegionId::Prestige => Action::Prestige,
        RegionId::ToggleSound => Action::ToggleSound,
        RegionId::Grass => Action::ClickGrass { at: point },
        RegionId::CloseModal | RegionId::ShopSkin { .. } | RegionId::SkillNode { .. } => return None,
    })
}

/// Resolve a click at `point` against this frame's regions.
pub fn dispatch(modal: &ModalState, regions: &[Region], point: Point) -> Option<Action> {
    let hits = regions.iter().filter(|r| r.shape.contains(point));

    if let Some(panel) = modal.open_panel() {
        return hits.filter_map(|r| modal_action(panel, r.id)).next();
    }

    hits.filter_map(|r| layer(r.id).map(|l| (l, r.id)))
        .min_by_key(|(l, _)| *l)
        .and_then(|(_, id)| play_action(id, point))
}
