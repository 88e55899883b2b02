//! Per-frame subsystems driven through a whole session.

use grass_core::{
    command::Action,
    config::GameConfig,
    engine::GameSession,
    event::{DenyReason, GameEvent},
    state::{ActivePowerup, EconomyState, PowerupKind},
    store::SaveStore,
};

fn session_with(config: GameConfig, seed: u64, edit: impl FnOnce(&mut EconomyState)) -> GameSession {
    let mut state = EconomyState::new(&config);
    edit(&mut state);
    GameSession::build(config, seed, state, None)
}

fn session(edit: impl FnOnce(&mut EconomyState)) -> GameSession {
    session_with(GameConfig::default(), 42, edit)
}

/// count=5, timer=0.1, dt=0.2 breaks the combo.
#[test]
fn combo_decays_to_zero() {
    let mut s = session(|st| {
        st.combo_count = 5;
        st.combo_timer = 0.1;
    });

    let out = s.frame(0.2, &[], &[]);

    assert_eq!(s.state.combo_count, 0);
    assert!(out.events.contains(&GameEvent::ComboBroken { count: 5 }));
}

#[test]
fn combo_survives_inside_its_window() {
    let mut s = session(|st| {
        st.combo_count = 5;
        st.combo_timer = 1.0;
    });
    s.frame(0.1, &[], &[]);
    assert_eq!(s.state.combo_count, 5);
    assert!((s.state.combo_timer - 0.9).abs() < 1e-9);
}

/// A 5-second stall only simulates 0.1 seconds.
#[test]
fn large_delta_is_clamped() {
    let mut s = session(|st| st.auto_income = 10.0);

    let out = s.frame(5.0, &[], &[]);

    assert!((s.state.money - 1.0).abs() < 1e-9, "money = {}", s.state.money);
    assert_eq!(out.frame, 1);
}

#[test]
fn negative_and_nan_deltas_simulate_nothing() {
    let mut s = session(|st| st.auto_income = 10.0);
    s.frame(-3.0, &[], &[]);
    s.frame(f64::NAN, &[], &[]);
    assert_eq!(s.state.money, 0.0);
    assert_eq!(s.clock.current_frame, 2);
}

#[test]
fn income_rush_boosts_afk_income() {
    let mut s = session(|st| {
        st.auto_income = 10.0;
        st.active_powerups.push(ActivePowerup {
            kind:       PowerupKind::IncomeRush,
            multiplier: 3.0,
            remaining:  30.0,
        });
    });
    s.frame(0.1, &[], &[]);
    assert!((s.state.money - 3.0).abs() < 1e-9);
}

#[test]
fn powerups_expire_in_order() {
    let mut s = session(|st| {
        st.active_powerups.push(ActivePowerup {
            kind:       PowerupKind::ClickFrenzy,
            multiplier: 2.0,
            remaining:  0.05,
        });
        st.active_powerups.push(ActivePowerup {
            kind:       PowerupKind::IncomeRush,
            multiplier: 3.0,
            remaining:  0.15,
        });
    });

    let first = s.frame(0.1, &[], &[]);
    assert!(first.events.contains(&GameEvent::PowerupExpired { kind: PowerupKind::ClickFrenzy }));
    assert_eq!(s.state.active_powerups.len(), 1);

    let second = s.frame(0.1, &[], &[]);
    assert!(second.events.contains(&GameEvent::PowerupExpired { kind: PowerupKind::IncomeRush }));
    assert!(s.state.active_powerups.is_empty());
}

#[test]
fn weather_rolls_every_period() {
    let mut s = session(|st| st.weather_timer = 49.95);

    let out = s.frame(0.1, &[], &[]);

    let changed = out
        .events
        .iter()
        .find_map(|e| match e {
            GameEvent::WeatherChanged { to, multiplier, .. } => Some((*to, *multiplier)),
            _ => None,
        })
        .expect("weather should roll");
    assert_eq!(s.state.weather, changed.0);
    assert_eq!(s.state.weather_multiplier, changed.1);
    assert_eq!(s.state.weather_timer, 0.0);
}

#[test]
fn boss_spawns_and_escapes() {
    let mut s = session(|st| st.boss.spawn_timer = 0.05);

    let spawned = s.frame(0.1, &[], &[]);
    assert!(spawned.events.iter().any(|e| matches!(e, GameEvent::BossSpawned { level: 1, .. })));
    assert!(s.state.boss.active);
    assert_eq!(s.state.boss.hp, s.state.boss.max_hp);
    assert!(spawned.snapshot.boss.is_some());

    s.state.boss.timer = 0.05;
    let escaped = s.frame(0.1, &[], &[]);
    assert!(escaped.events.iter().any(|e| matches!(e, GameEvent::BossEscaped { level: 1, .. })));
    assert!(!s.state.boss.active);
    assert_eq!(s.state.boss.level, 1);
    assert_eq!(s.state.boss.spawn_timer, s.config().boss.spawn_interval);
}

#[test]
fn defeating_a_boss_pays_and_levels_up() {
    let mut s = session(|st| st.boss.spawn_timer = 0.05);
    s.frame(0.1, &[], &[]);
    s.state.boss.hp = 0.5;
    let money_before = s.state.money;

    let events = s.apply_action(Action::AttackBoss);

    let reward = events
        .iter()
        .find_map(|e| match e {
            GameEvent::BossDefeated { reward, level: 1, .. } => Some(*reward),
            _ => None,
        })
        .expect("boss should fall");
    assert!(reward >= 1_000.0);
    assert!(s.state.money >= money_before + reward);
    assert_eq!(s.state.boss.level, 2);
    assert_eq!(s.state.boss.defeated_count, 1);
    assert_eq!(s.state.skill_points, 1);
    assert!(!s.state.boss.active);
}

#[test]
fn boss_with_no_hp_pool_counts_as_defeated() {
    let mut s = session(|st| {
        st.boss.active = true;
        st.boss.max_hp = 0.0;
        st.boss.hp = 0.0;
        st.boss.timer = 10.0;
    });
    let out = s.frame(0.1, &[], &[]);
    assert!(out.events.iter().any(|e| matches!(e, GameEvent::BossDefeated { .. })));
}

#[test]
fn specials_spawn_collect_and_vanish() {
    let mut config = GameConfig::default();
    config.specials.spawn_chance_per_second = 10.0;
    let mut s = session_with(config, 7, |_| {});

    let out = s.frame(0.1, &[], &[]);
    let id = out
        .events
        .iter()
        .find_map(|e| match e {
            GameEvent::SpecialSpawned { id, .. } => Some(*id),
            _ => None,
        })
        .expect("guaranteed spawn");
    let value = s.state.specials[0].value;
    assert!((800.0..=3_500.0).contains(&value));

    let money_before = s.state.money;
    let events = s.apply_action(Action::CollectSpecial { id });
    assert!(events.iter().any(|e| matches!(e, GameEvent::SpecialCollected { .. })));
    assert!(s.state.money >= money_before + value);

    let again = s.apply_action(Action::CollectSpecial { id });
    assert_eq!(
        again,
        vec![GameEvent::PurchaseDenied { reason: DenyReason::SpecialGone { id } }]
    );
}

#[test]
fn specials_expire_when_life_runs_out() {
    let mut config = GameConfig::default();
    config.specials.spawn_chance_per_second = 0.0;
    let mut s = session_with(config, 7, |_| {});
    s.state.specials.push(grass_core::state::SpecialCollectible {
        id:       99,
        position: grass_core::types::Point::new(200.0, 200.0),
        radius:   18.0,
        value:    1_000.0,
        life:     0.05,
        max_life: 10.0,
    });

    let out = s.frame(0.1, &[], &[]);

    assert!(out.events.contains(&GameEvent::SpecialExpired { id: 99 }));
    assert!(s.state.specials.is_empty());
}

#[test]
fn wheel_cooldown_counts_down() {
    let mut s = session(|_| {});
    s.apply_action(Action::SpinWheel);
    let cooldown = s.state.wheel_cooldown;
    s.frame(0.1, &[], &[]);
    assert!((s.state.wheel_cooldown - (cooldown - 0.1)).abs() < 1e-9);
}

#[test]
fn stats_track_peak_money_and_play_time() {
    let mut s = session(|st| st.money = 750.0);
    for _ in 0..10 {
        s.frame(0.1, &[], &[]);
    }
    assert_eq!(s.state.highest_money, 750.0);
    assert!((s.state.play_time_seconds - 1.0).abs() < 1e-9);
}

#[test]
fn autosave_writes_the_save_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig::default();
    let store = SaveStore::at(dir.path());
    let path = store.path();
    let mut s = GameSession::build(config.clone(), 1, EconomyState::new(&config), Some(store));

    let mut saved = false;
    for _ in 0..301 {
        let out = s.frame(0.1, &[], &[]);
        if out.events.contains(&GameEvent::GameSaved { manual: false }) {
            saved = true;
            break;
        }
    }

    assert!(saved, "autosave should fire within 30 seconds");
    assert!(path.exists());
}

#[test]
fn quit_saves_and_ends_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig::default();
    let store = SaveStore::at(dir.path());
    let path = store.path();
    let mut s = GameSession::build(config.clone(), 1, EconomyState::new(&config), Some(store));
    s.state.money = 321.0;

    let out = s.frame(0.1, &[grass_core::input::InputEvent::Quit], &[]);

    assert!(out.quit);
    assert!(out.events.contains(&GameEvent::QuitRequested));
    assert!(path.exists());
    assert!(s.frame(0.1, &[], &[]).quit);
}

#[test]
fn manual_save_without_directory_reports_failure() {
    let mut s = session(|_| {});
    let event = s.save();
    assert!(matches!(event, GameEvent::SaveFailed { .. }));
}

#[test]
fn paused_clock_freezes_the_economy() {
    let mut s = session(|st| st.auto_income = 10.0);
    s.clock.pause();
    s.frame(0.1, &[], &[]);
    assert_eq!(s.state.money, 0.0);
    s.clock.resume();
    s.frame(0.1, &[], &[]);
    assert!(s.state.money > 0.0);
}
