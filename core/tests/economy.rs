//! Click yield, upgrades and the skin ladder.

use grass_core::{
    config::GameConfig,
    economy_rules::{self, buy_afk_upgrade, buy_multiplier_upgrade, click_yield, select_skin},
    event::{DenyReason, GameEvent, UpgradeKind},
    rng::SubsystemRng,
    state::{ActivePowerup, EconomyState, PowerupKind},
    types::Point,
};
use proptest::prelude::*;

fn fresh() -> (GameConfig, EconomyState) {
    let config = GameConfig::default();
    let state = EconomyState::new(&config);
    (config, state)
}

/// multiplier=2 on the first tier with nothing else active is worth 2.2.
#[test]
fn click_yield_matches_documented_example() {
    let (config, mut state) = fresh();
    state.multiplier = 2.0;

    let hit = click_yield(&state, &config, 0.99);

    assert!(!hit.critical);
    assert!((hit.amount - 2.2).abs() < 1e-12, "got {}", hit.amount);
}

#[test]
fn critical_roll_doubles_the_click() {
    let (config, state) = fresh();
    let normal = click_yield(&state, &config, 0.99).amount;
    let crit = click_yield(&state, &config, 0.0);
    assert!(crit.critical);
    assert!((crit.amount - normal * 2.0).abs() < 1e-12);
}

#[test]
fn click_frenzy_multiplies_click_yield() {
    let (config, mut state) = fresh();
    state.active_powerups.push(ActivePowerup {
        kind:       PowerupKind::ClickFrenzy,
        multiplier: 2.0,
        remaining:  10.0,
    });
    assert!((click_yield(&state, &config, 0.99).amount - 2.2).abs() < 1e-12);
}

#[test]
fn clicking_grass_updates_counters() {
    let (config, mut state) = fresh();
    let mut rng = SubsystemRng::new(7, 0);

    let events = economy_rules::click_grass(&mut state, &config, Point::new(400.0, 300.0), &mut rng);

    assert_eq!(state.total_clicks, 1);
    assert_eq!(state.combo_count, 1);
    assert_eq!(state.best_combo, 1);
    assert!(state.money > 0.0);
    assert!(state.combo_timer > 0.0);
    assert!(matches!(events[0], GameEvent::GrassClicked { combo: 1, .. }));
}

#[test]
fn afk_upgrade_on_first_tier() {
    let (config, mut state) = fresh();
    state.money = 200.0;

    let events = buy_afk_upgrade(&mut state, &config);

    assert_eq!(state.money, 50.0);
    assert_eq!(state.auto_income, 0.5);
    assert!((state.afk_upgrade_cost - 273.0).abs() < 1e-9);
    assert!(matches!(
        events[0],
        GameEvent::UpgradePurchased { upgrade: UpgradeKind::AfkIncome, .. }
    ));
}

#[test]
fn afk_upgrade_on_higher_tier_scales_with_index() {
    let (config, mut state) = fresh();
    state.money = 1_000.0;
    state.multiplier = 2.0;
    state.highest_grass_index = 2;
    state.current_grass_index = 2;

    buy_afk_upgrade(&mut state, &config);

    // 0.5 × 2 × 2 × 1.5
    assert!((state.auto_income - 3.0).abs() < 1e-9);
    assert!((state.afk_upgrade_cost - 180.0).abs() < 1e-9);
}

#[test]
fn multiplier_upgrade_adds_half() {
    let (config, mut state) = fresh();
    state.money = 150.0;

    buy_multiplier_upgrade(&mut state, &config);

    assert_eq!(state.money, 0.0);
    assert_eq!(state.multiplier, 1.5);
    assert!((state.multiplier_upgrade_cost - 180.0).abs() < 1e-9);
}

#[test]
fn unaffordable_upgrade_is_denied_without_change() {
    let (config, mut state) = fresh();
    state.money = 149.0;
    let before = state.clone();

    let events = buy_afk_upgrade(&mut state, &config);

    assert_eq!(state, before);
    assert!(matches!(
        events[0],
        GameEvent::PurchaseDenied { reason: DenyReason::InsufficientFunds { .. } }
    ));
}

/// Skipping a rung fails no matter how much money there is.
#[test]
fn skin_ladder_rejects_skipping_a_tier() {
    let (config, mut state) = fresh();
    state.money = 1e12;

    let events = select_skin(&mut state, &config, 2);

    assert_eq!(
        events,
        vec![GameEvent::PurchaseDenied {
            reason: DenyReason::SkinNotNextTier { index: 2, next: 1 },
        }]
    );
    assert_eq!(state.money, 1e12);
    assert_eq!(state.highest_grass_index, 0);
}

#[test]
fn owned_skins_can_be_reselected_for_free() {
    let (config, mut state) = fresh();
    state.money = 15_000.0;

    select_skin(&mut state, &config, 1);
    assert_eq!(state.money, 5_000.0);
    assert_eq!(state.current_grass_index, 1);

    let events = select_skin(&mut state, &config, 0);
    assert_eq!(events, vec![GameEvent::SkinSelected { index: 0 }]);
    assert_eq!(state.current_grass_index, 0);
    assert_eq!(state.highest_grass_index, 1);

    select_skin(&mut state, &config, 1);
    assert_eq!(state.money, 5_000.0, "re-selecting an owned skin is free");
}

#[test]
fn skin_outside_catalogue_is_denied() {
    let (config, mut state) = fresh();
    let index = config.grass_catalogue.len();
    let events = select_skin(&mut state, &config, index);
    assert_eq!(
        events,
        vec![GameEvent::PurchaseDenied { reason: DenyReason::SkinOutOfRange { index } }]
    );
}

#[derive(Debug, Clone)]
enum Op {
    Earn(f64),
    Afk,
    Multiplier,
    Skin(usize),
    Click,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0.0f64..50_000.0).prop_map(Op::Earn),
        Just(Op::Afk),
        Just(Op::Multiplier),
        (0usize..8).prop_map(Op::Skin),
        Just(Op::Click),
    ]
}

proptest! {
    /// Every successful purchase leaves the next one strictly dearer.
    #[test]
    fn upgrade_costs_strictly_increase(ops in prop::collection::vec(op(), 1..120)) {
        let (config, mut state) = fresh();
        let mut rng = SubsystemRng::new(1, 0);
        for op in ops {
            let afk_before = state.afk_upgrade_cost;
            let mult_before = state.multiplier_upgrade_cost;
            let events = match op {
                Op::Earn(amount) => { state.money += amount; vec![] }
                Op::Afk => buy_afk_upgrade(&mut state, &config),
                Op::Multiplier => buy_multiplier_upgrade(&mut state, &config),
                Op::Skin(i) => select_skin(&mut state, &config, i),
                Op::Click => economy_rules::click_grass(&mut state, &config, Point::default(), &mut rng),
            };
            for event in events {
                if let GameEvent::UpgradePurchased { upgrade, .. } = event {
                    match upgrade {
                        UpgradeKind::AfkIncome => {
                            prop_assert!(state.afk_upgrade_cost > afk_before);
                        }
                        UpgradeKind::ClickMultiplier => {
                            prop_assert!(state.multiplier_upgrade_cost > mult_before);
                        }
                    }
                }
            }
            prop_assert!(state.afk_upgrade_cost >= afk_before);
            prop_assert!(state.multiplier_upgrade_cost >= mult_before);
        }
    }

    /// Purchases are refused rather than overdrawn.
    #[test]
    fn money_never_goes_negative(ops in prop::collection::vec(op(), 1..120)) {
        let (config, mut state) = fresh();
        let mut rng = SubsystemRng::new(2, 0);
        for op in ops {
            match op {
                Op::Earn(amount) => state.money += amount / 10.0,
                Op::Afk => { buy_afk_upgrade(&mut state, &config); }
                Op::Multiplier => { buy_multiplier_upgrade(&mut state, &config); }
                Op::Skin(i) => { select_skin(&mut state, &config, i); }
                Op::Click => { economy_rules::click_grass(&mut state, &config, Point::default(), &mut rng); }
            }
            prop_assert!(state.money >= 0.0, "money went negative: {}", state.money);
            prop_assert!(state.current_grass_index <= state.highest_grass_index);
            prop_assert!(state.highest_grass_index < config.grass_catalogue.len());
        }
    }
}
