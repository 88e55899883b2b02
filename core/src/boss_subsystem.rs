//! Boss encounters.
//!
//! RULE: At most one boss is active. While none is, spawn_timer counts
//! down; when it reaches zero a boss of a weighted-random kind appears
//! with `time_limit` seconds on its clock.
//!
//! Hp:     base_hp × hp_growth^(level − 1) × kind hp multiplier
//! Reward: reward_base × level × kind reward multiplier
//!
//! Defeat pays the reward plus skill points and raises the level.
//! Running out the clock lets the boss escape: nothing is paid and the
//! level stays where it was.
//!
//! Execution: every frame. Damage arrives through `attack_boss`, called
//! from the session when the player clicks the boss.

use crate::{
    config::{BossConfig, GameConfig},
    economy_rules,
    event::{DenyReason, GameEvent},
    rng::SubsystemRng,
    skill_tree::{self, SkillId},
    state::{BossKind, EconomyState},
    subsystem::{TickContext, TickSubsystem},
    types::Money,
};

pub fn boss_max_hp(config: &BossConfig, kind: BossKind, level: u32) -> f64 {
    let kind_mult = config.entry(kind).map(|k| k.hp_multiplier).unwrap_or(1.0);
    let exponent = i32::try_from(level.saturating_sub(1)).unwrap_or(i32::MAX);
    config.base_hp * config.hp_growth.powi(exponent) * kind_mult
}

pub fn boss_reward(config: &BossConfig, kind: BossKind, level: u32) -> Money {
    let kind_mult = config.entry(kind).map(|k| k.reward_multiplier).unwrap_or(1.0);
    config.reward_base * f64::from(level) * kind_mult
}

/// Hit the active boss with one click's worth of damage.
pub fn attack_boss(
    state:  &mut EconomyState,
    config: &GameConfig,
    rng:    &mut SubsystemRng,
) -> Vec<GameEvent> {
    if !state.boss.active {
        return vec![GameEvent::PurchaseDenied { reason: DenyReason::NoActiveBoss }];
    }

    let hit = economy_rules::click_yield(state, config, rng.next_f64());
    let damage = hit.amount * (1.0 + skill_tree::bonus(state, SkillId::BossSlayer));
    state.boss.hp = (state.boss.hp - damage).max(0.0);

    let mut out = vec![GameEvent::BossDamaged { damage, hp_left: state.boss.hp }];
    if state.boss.hp <= 0.0 {
        out.push(defeat(state, &config.boss));
    }
    out
}

fn defeat(state: &mut EconomyState, config: &BossConfig) -> GameEvent {
    let kind = state.boss.kind;
    let level = state.boss.level;
    let reward = boss_reward(config, kind, level);

    state.money += reward;
    state.skill_points = state.skill_points.saturating_add(config.skill_points_per_defeat);
    state.boss.defeated_count = state.boss.defeated_count.saturating_add(1);
    state.boss.level = level.saturating_add(1);
    dismiss(state, config);

    log::info!("{} (level {level}) defeated, reward {reward:.0}", kind.label());
    GameEvent::BossDefeated { kind, level, reward }
}

fn dismiss(state: &mut EconomyState, config: &BossConfig) {
    state.boss.active = false;
    state.boss.hp = 0.0;
    state.boss.timer = 0.0;
    state.boss.spawn_timer = config.spawn_interval;
}

pub struct BossSubsystem {
    config: BossConfig,
}

impl BossSubsystem {
    pub fn new(config: BossConfig) -> Self {
        Self { config }
    }

    fn spawn(&self, ctx: TickContext, state: &mut EconomyState, rng: &mut SubsystemRng) -> GameEvent {
        let weights: Vec<u32> = self.config.kinds.iter().map(|k| k.weight).collect();
        let kind = self
            .config
            .kinds
            .get(rng.weighted_index(&weights))
            .map(|k| k.kind)
            .unwrap_or_default();
        let level = state.boss.level;
        let hp = boss_max_hp(&self.config, kind, level);

        let boss = &mut state.boss;
        boss.active = true;
        boss.kind = kind;
        boss.hp = hp;
        boss.max_hp = hp;
        boss.timer = self.config.time_limit;

        log::debug!("frame={} boss spawned: {} level={level} hp={hp:.0}", ctx.frame, kind.label());
        GameEvent::BossSpawned { kind, level, hp }
    }
}

impl TickSubsystem for BossSubsystem {
    fn name(&self) -> &'static str { "boss" }

    fn update(
        &mut self,
        ctx:        TickContext,
        state:      &mut EconomyState,
        _events_in: &[GameEvent],
        rng:        &mut SubsystemRng,
    ) -> Vec<GameEvent> {
        if !state.boss.active {
            state.boss.spawn_timer -= ctx.dt;
            if state.boss.spawn_timer <= 0.0 {
                return vec![self.spawn(ctx, state, rng)];
            }
            return vec![];
        }

        // A boss with no hp pool is already beaten.
        if state.boss.max_hp <= 0.0 || state.boss.hp <= 0.0 {
            return vec![defeat(state, &self.config)];
        }

        state.boss.timer -= ctx.dt;
        if state.boss.timer > 0.0 {
            return vec![];
        }

        let kind = state.boss.kind;
        let level = state.boss.level;
        dismiss(state, &self.config);
        log::debug!("frame={} boss escaped: {}", ctx.frame, kind.label());
        vec![GameEvent::BossEscaped { kind, level }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hp_and_reward_scale_with_level() {
        let config = BossConfig::default();
        assert_eq!(boss_max_hp(&config, BossKind::Weed, 1), 500.0);
        assert_eq!(boss_max_hp(&config, BossKind::Weed, 3), 500.0 * 1.5 * 1.5);
        assert_eq!(boss_max_hp(&config, BossKind::Lawnmower, 1), 2_000.0);
        assert_eq!(boss_reward(&config, BossKind::Mole, 2), 1_000.0 * 2.0 * 2.5);
    }

    #[test]
    fn attacking_with_no_boss_is_denied() {
        let config = GameConfig::default();
        let mut state = EconomyState::new(&config);
        let mut rng = SubsystemRng::new(1, 0);
        let events = attack_boss(&mut state, &config, &mut rng);
        assert_eq!(
            events,
            vec![GameEvent::PurchaseDenied { reason: DenyReason::NoActiveBoss }]
        );
    }
}
