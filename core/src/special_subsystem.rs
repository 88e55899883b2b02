//! Floating water-can collectibles.
//!
//! Each second there is a `spawn_chance_per_second` chance a can appears
//! somewhere in the spawn area. Cans fade after their life runs out.
//! Collecting one pays its value and sometimes grants a random power-up.

use crate::{
    config::{GameConfig, SpecialConfig},
    economy_rules,
    event::{DenyReason, GameEvent},
    rng::SubsystemRng,
    state::{EconomyState, SpecialCollectible},
    subsystem::{TickContext, TickSubsystem},
    types::{Point, SpecialId},
};

/// Collect the special with `id`. Expired or unknown ids are refused.
pub fn collect_special(
    state:  &mut EconomyState,
    config: &GameConfig,
    id:     SpecialId,
    rng:    &mut SubsystemRng,
) -> Vec<GameEvent> {
    let Some(pos) = state.specials.iter().position(|s| s.id == id) else {
        return vec![GameEvent::PurchaseDenied { reason: DenyReason::SpecialGone { id } }];
    };
    let special = state.specials.remove(pos);
    state.money += special.value;

    let mut out = vec![GameEvent::SpecialCollected {
        id,
        position: special.position,
        value:    special.value,
    }];

    let catalogue = &config.powerups.catalogue;
    if !catalogue.is_empty() && rng.chance(config.specials.powerup_chance) {
        let pick = rng.next_u64_below(catalogue.len() as u64) as usize;
        let kind = catalogue[pick].kind;
        out.extend(economy_rules::activate_powerup(state, config, kind));
    }
    out
}

pub struct SpecialSubsystem {
    config: SpecialConfig,
}

impl SpecialSubsystem {
    pub fn new(config: SpecialConfig) -> Self {
        Self { config }
    }

    fn spawn(&self, state: &mut EconomyState, rng: &mut SubsystemRng) -> SpecialCollectible {
        let (min_x, min_y, max_x, max_y) = self.config.area;
        let life = rng.range_f64(self.config.life_min, self.config.life_max);
        let special = SpecialCollectible {
            id:       state.next_special_id,
            position: Point::new(rng.range_f64(min_x, max_x), rng.range_f64(min_y, max_y)),
            radius:   self.config.click_radius,
            value:    rng.range_u64_inclusive(self.config.value_min, self.config.value_max) as f64,
            life,
            max_life: life,
        };
        state.next_special_id += 1;
        special
    }
}

impl TickSubsystem for SpecialSubsystem {
    fn name(&self) -> &'static str { "special" }

    fn update(
        &mut self,
        ctx:        TickContext,
        state:      &mut EconomyState,
        _events_in: &[GameEvent],
        rng:        &mut SubsystemRng,
    ) -> Vec<GameEvent> {
        let mut out = Vec::new();

        state.specials.retain_mut(|s| {
            s.life -= ctx.dt;
            if s.life > 0.0 {
                true
            } else {
                out.push(GameEvent::SpecialExpired { id: s.id });
                false
            }
        });

        if ctx.dt > 0.0 && rng.chance(self.config.spawn_chance_per_second * ctx.dt) {
            let special = self.spawn(state, rng);
            log::debug!(
                "frame={} special {} spawned worth {:.0}",
                ctx.frame,
                special.id,
                special.value
            );
            out.push(GameEvent::SpecialSpawned { id: special.id, position: special.position });
            state.specials.push(special);
        }
        out
    }
}
