//! Save document round-trips, defaults and the atomic write.

use chrono::{TimeZone, Utc};
use grass_core::{
    config::GameConfig,
    prestige_rules,
    skill_tree::{self, SkillId},
    state::{AchievementProgress, ActivePowerup, EconomyState, PowerupKind, Weather},
    store::{SaveStore, SAVE_FILE_NAME},
};
use proptest::prelude::*;
use std::fs;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A state with every persisted field moved off its default.
fn played_state(config: &GameConfig) -> EconomyState {
    let mut state = EconomyState::new(config);
    state.money = 12_345.5;
    state.multiplier = 3.5;
    state.auto_income = 12.25;
    state.total_clicks = 4_321;
    state.afk_upgrade_cost = 273.0;
    state.multiplier_upgrade_cost = 216.0;
    state.highest_money = 20_000.0;
    state.highest_grass_index = 2;
    state.current_grass_index = 1;
    state.weather = Weather::Sunny;
    state.weather_multiplier = config.weather.multiplier_for(Weather::Sunny);
    state.prestige_level = 2;
    state.prestige_multiplier = prestige_rules::prestige_multiplier_for(2, config);
    state.grass_seeds = 7;
    state.skill_points = 3;
    if let Some(node) = state.skills.get_mut(&SkillId::ClickPower) {
        node.level = 2;
    }
    if let Some(node) = state.skills.get_mut(&SkillId::SharpEye) {
        node.level = 1;
    }
    skill_tree::recompute_derived(&mut state, config);
    state.achievements.insert(
        "money_1k".into(),
        AchievementProgress { unlocked: true, progress: 1.0 },
    );
    state.settings.sound_enabled = false;
    state.settings.particle_density = 0.5;
    state.last_play_time = Some(Utc.with_ymd_and_hms(2026, 4, 1, 12, 30, 0).unwrap());
    state.total_crits = 11;
    state.best_combo = 42;
    state.boss.level = 3;
    state.boss.defeated_count = 2;
    state.login_streak = 4;
    state.last_login_date = Some(chrono::NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
    state.play_time_seconds = 3_600.25;
    state.wheel_cooldown = 120.5;
    state.active_powerups.push(ActivePowerup {
        kind:       PowerupKind::IncomeRush,
        multiplier: 3.0,
        remaining:  12.5,
    });
    state
}

#[test]
fn save_then_load_round_trips() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig::default();
    let store = SaveStore::at(dir.path());
    let state = played_state(&config);

    store.save(&state).unwrap();
    let loaded = store.load_state(&config);

    assert_eq!(loaded, state);
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig::default();
    let store = SaveStore::at(dir.path());

    assert_eq!(store.load_state(&config), EconomyState::new(&config));
}

#[test]
fn malformed_json_loads_defaults() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig::default();
    let store = SaveStore::at(dir.path());

    fs::write(store.path(), "{ \"money\": 5000, ").unwrap();
    assert_eq!(store.load_state(&config), EconomyState::new(&config));

    fs::write(store.path(), r#"{ "money": "lots" }"#).unwrap();
    assert_eq!(store.load_state(&config), EconomyState::new(&config));
}

#[test]
fn absent_keys_take_documented_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig::default();
    let store = SaveStore::at(dir.path());

    fs::write(store.path(), r#"{ "money": 500, "prestige_level": 1 }"#).unwrap();
    let state = store.load_state(&config);

    assert_eq!(state.money, 500.0);
    assert_eq!(state.multiplier, 1.0);
    assert_eq!(state.afk_upgrade_cost, 150.0);
    assert_eq!(state.multiplier_upgrade_cost, 150.0);
    assert_eq!(state.current_grass_index, 0);
    assert_eq!(state.weather, Weather::Normal);
    assert_eq!(state.skills, skill_tree::default_tree());
    assert_eq!(state.last_play_time, None);
    assert!((state.prestige_multiplier - 1.1).abs() < 1e-12);
}

#[test]
fn unknown_keys_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig::default();
    let store = SaveStore::at(dir.path());

    fs::write(store.path(), r#"{ "money": 42, "pets": ["cat"], "version": 9 }"#).unwrap();
    assert_eq!(store.load_state(&config).money, 42.0);
}

/// A crash between the temp write and the rename leaves the old save intact.
#[test]
fn crash_before_rename_keeps_previous_save() {
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig::default();
    let store = SaveStore::at(dir.path());

    let mut state = EconomyState::new(&config);
    state.money = 100.0;
    store.save(&state).unwrap();
    let before = fs::read(store.path()).unwrap();

    state.money = 999.0;
    let staged = store.stage(&state).unwrap();
    assert!(staged.temp_path().exists());
    drop(staged); // process dies here

    assert_eq!(fs::read(store.path()).unwrap(), before);
    assert_eq!(store.load_state(&config).money, 100.0);
}

/// A crash right after the rename leaves the new save intact.
#[test]
fn crash_after_rename_keeps_new_save() {
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig::default();
    let store = SaveStore::at(dir.path());

    let mut state = EconomyState::new(&config);
    state.money = 100.0;
    store.save(&state).unwrap();

    state.money = 999.0;
    store.stage(&state).unwrap().commit().unwrap();

    assert!(!store.temp_path().exists());
    assert_eq!(store.load_state(&config).money, 999.0);
}

#[test]
fn save_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("TouchTheGrass");
    let store = SaveStore::at(&nested);

    store.save(&EconomyState::new(&GameConfig::default())).unwrap();

    assert!(nested.join(SAVE_FILE_NAME).exists());
}

#[test]
fn saved_document_is_readable_json_with_documented_keys() {
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig::default();
    let store = SaveStore::at(dir.path());
    store.save(&played_state(&config)).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    for key in [
        "money", "multiplier", "auto_income", "total_clicks", "afk_upgrade_cost",
        "multiplier_upgrade_cost", "highest_money", "current_grass_index", "weather_index",
        "achievements", "prestige_level", "grass_seeds", "skills", "skill_points",
        "settings", "last_play_time",
    ] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(json["weather_index"], 1);
}

#[test]
fn delete_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig::default();
    let store = SaveStore::at(dir.path());

    store.delete().unwrap();
    store.save(&played_state(&config)).unwrap();
    store.delete().unwrap();

    assert!(!store.path().exists());
    assert_eq!(store.load_state(&config), EconomyState::new(&config));
}

proptest! {
    /// Arbitrary finite balances come back bit-for-bit after a save.
    #[test]
    fn float_fields_survive_save_and_load(
        money in 0.0f64..1e15,
        auto_income in 0.0f64..1e9,
        highest_money in 0.0f64..1e15,
        play_time_seconds in 0.0f64..1e8,
        wheel_cooldown in 0.0f64..300.0,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::default();
        let store = SaveStore::at(dir.path());
        let mut state = EconomyState::new(&config);
        state.money = money;
        state.auto_income = auto_income;
        state.highest_money = highest_money;
        state.play_time_seconds = play_time_seconds;
        state.wheel_cooldown = wheel_cooldown;

        store.save(&state).unwrap();
        let loaded = store.load_state(&config);

        prop_assert_eq!(loaded.money.to_bits(), money.to_bits());
        prop_assert_eq!(loaded.auto_income.to_bits(), auto_income.to_bits());
        prop_assert_eq!(loaded.highest_money.to_bits(), highest_money.to_bits());
        prop_assert_eq!(loaded.play_time_seconds.to_bits(), play_time_seconds.to_bits());
        prop_assert_eq!(loaded.wheel_cooldown.to_bits(), wheel_cooldown.to_bits());
    }
}
