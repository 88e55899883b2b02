//! Click resolution: priority layers and single consumption.

use grass_core::{
    command::Action,
    config::GameConfig,
    effects::SideEffect,
    engine::GameSession,
    event::GameEvent,
    input::{dispatch, InputEvent, ModalState, Panel, Region, RegionId},
    skill_tree::SkillId,
    state::{EconomyState, SpecialCollectible},
    types::Point,
};

fn screen() -> Vec<Region> {
    vec![
        Region::rect(RegionId::BuyAfk, 10.0, 540.0, 90.0, 36.0),
        Region::rect(RegionId::OpenPanel { panel: Panel::Shop }, 110.0, 540.0, 90.0, 36.0),
        Region::rect(RegionId::OpenPanel { panel: Panel::Skills }, 210.0, 540.0, 90.0, 36.0),
        Region::rect(RegionId::CloseModal, 620.0, 110.0, 30.0, 30.0),
        Region::rect(RegionId::ShopSkin { index: 1 }, 180.0, 150.0, 420.0, 40.0),
        Region::rect(RegionId::SkillNode { skill: SkillId::ClickPower }, 180.0, 200.0, 420.0, 40.0),
        Region::circle(RegionId::Grass, 400.0, 300.0, 90.0),
    ]
}

#[test]
fn grass_click_when_nothing_else_is_hit() {
    let at = Point::new(400.0, 300.0);
    assert_eq!(
        dispatch(&ModalState::Closed, &screen(), at),
        Some(Action::ClickGrass { at })
    );
}

#[test]
fn miss_resolves_to_nothing() {
    assert_eq!(dispatch(&ModalState::Closed, &screen(), Point::new(5.0, 5.0)), None);
}

#[test]
fn panel_controls_are_inert_while_closed() {
    // The skin row overlaps nothing else at this point.
    assert_eq!(dispatch(&ModalState::Closed, &screen(), Point::new(590.0, 160.0)), None);
}

#[test]
fn open_modal_absorbs_clicks_outside_its_controls() {
    let modal = ModalState::Open(Panel::Shop);
    assert_eq!(dispatch(&modal, &screen(), Point::new(400.0, 300.0)), None);
    assert_eq!(dispatch(&modal, &screen(), Point::new(50.0, 550.0)), None);
}

#[test]
fn open_modal_routes_its_own_controls() {
    let shop = ModalState::Open(Panel::Shop);
    assert_eq!(dispatch(&shop, &screen(), Point::new(630.0, 120.0)), Some(Action::CloseModal));
    assert_eq!(
        dispatch(&shop, &screen(), Point::new(150.0, 550.0)),
        Some(Action::OpenPanel { panel: Panel::Shop })
    );
    assert_eq!(
        dispatch(&shop, &screen(), Point::new(300.0, 170.0)),
        Some(Action::SelectSkin { index: 1 })
    );
    // Another panel's toggle and controls stay blocked.
    assert_eq!(dispatch(&shop, &screen(), Point::new(250.0, 550.0)), None);
    assert_eq!(dispatch(&shop, &screen(), Point::new(300.0, 220.0)), None);

    let skills = ModalState::Open(Panel::Skills);
    assert_eq!(
        dispatch(&skills, &screen(), Point::new(300.0, 220.0)),
        Some(Action::BuySkill { skill: SkillId::ClickPower })
    );
}

#[test]
fn specials_beat_the_boss_beat_buttons_beat_grass() {
    let at = Point::new(400.0, 300.0);
    let mut regions = screen();
    regions.push(Region::rect(RegionId::SaveGame, 350.0, 250.0, 100.0, 100.0));
    assert_eq!(dispatch(&ModalState::Closed, &regions, at), Some(Action::SaveGame));

    regions.push(Region::rect(RegionId::Boss, 380.0, 280.0, 40.0, 40.0));
    assert_eq!(dispatch(&ModalState::Closed, &regions, at), Some(Action::AttackBoss));

    regions.push(Region::circle(RegionId::Special { id: 7 }, 400.0, 300.0, 18.0));
    assert_eq!(
        dispatch(&ModalState::Closed, &regions, at),
        Some(Action::CollectSpecial { id: 7 })
    );
}

#[test]
fn overlapping_buttons_resolve_in_supplied_order() {
    let at = Point::new(50.0, 50.0);
    let regions = vec![
        Region::rect(RegionId::SpinWheel, 0.0, 0.0, 100.0, 100.0),
        Region::rect(RegionId::Prestige, 0.0, 0.0, 100.0, 100.0),
    ];
    assert_eq!(dispatch(&ModalState::Closed, &regions, at), Some(Action::SpinWheel));
}

/// A click on a special over the grass collects it without also
/// counting as a grass click.
#[test]
fn one_click_is_consumed_once() {
    let config = GameConfig::default();
    let mut state = EconomyState::new(&config);
    state.specials.push(SpecialCollectible {
        id:       1,
        position: Point::new(400.0, 300.0),
        radius:   18.0,
        value:    1_000.0,
        life:     15.0,
        max_life: 15.0,
    });
    let mut regions = screen();
    regions.push(Region::circle(RegionId::Special { id: 1 }, 400.0, 300.0, 18.0));
    let mut session = GameSession::build(config, 11, state, None);

    let out = session.frame(
        0.0,
        &[InputEvent::Click { point: Point::new(400.0, 300.0) }],
        &regions,
    );

    assert_eq!(session.state.total_clicks, 0);
    assert!(session.state.money >= 1_000.0);
    assert!(out.events.iter().any(|e| matches!(e, GameEvent::SpecialCollected { id: 1, .. })));
    assert!(!out.events.iter().any(|e| matches!(e, GameEvent::GrassClicked { .. })));
}

#[test]
fn panel_toggle_opens_and_closes() {
    let config = GameConfig::default();
    let mut session = GameSession::build(config.clone(), 1, EconomyState::new(&config), None);

    let opened = session.apply_action(Action::OpenPanel { panel: Panel::Stats });
    assert_eq!(opened, vec![GameEvent::PanelOpened { panel: Panel::Stats }]);
    assert_eq!(session.ui.modal, ModalState::Open(Panel::Stats));

    let closed = session.apply_action(Action::OpenPanel { panel: Panel::Stats });
    assert_eq!(closed, vec![GameEvent::PanelClosed { panel: Panel::Stats }]);
    assert_eq!(session.ui.modal, ModalState::Closed);
}

#[test]
fn sound_toggle_mutes_play_requests() {
    let config = GameConfig::default();
    let mut session = GameSession::build(config.clone(), 1, EconomyState::new(&config), None);
    let regions = screen();

    session.apply_action(Action::ToggleSound);
    let out = session.frame(
        0.0,
        &[InputEvent::Click { point: Point::new(400.0, 300.0) }],
        &regions,
    );

    assert!(!session.state.settings.sound_enabled);
    assert!(!out.effects.iter().any(|e| matches!(e, grass_core::effects::SideEffect::PlaySound { .. })));
    assert!(out.effects.iter().any(|e| matches!(e, grass_core::effects::SideEffect::SpawnParticles { .. })));
}

#[test]
fn click_particles_keep_the_clicked_tier_colour() {
    let mut config = GameConfig::default();
    config.critical.base_chance = 0.0;
    let mut state = EconomyState::new(&config);
    state.money = 20_000.0;
    let mut session = GameSession::build(config.clone(), 5, state, None);

    // Grass click, then open the shop and buy the next skin in the same frame.
    let out = session.frame(
        0.0,
        &[
            InputEvent::Click { point: Point::new(400.0, 300.0) },
            InputEvent::Click { point: Point::new(150.0, 550.0) },
            InputEvent::Click { point: Point::new(300.0, 170.0) },
        ],
        &screen(),
    );

    assert_eq!(session.state.current_grass_index, 1);
    let normal = config.grass_catalogue[0].particle_color;
    assert!(out.events.iter().any(|e| matches!(
        e,
        GameEvent::GrassClicked { color, .. } if *color == normal
    )));
    assert!(out.effects.iter().any(|e| matches!(
        e,
        SideEffect::SpawnParticles { color, .. } if *color == normal
    )));
}
