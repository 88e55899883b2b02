//! Achievement evaluation.
//!
//! Execution: every frame, last. Runs after stats so money and play-time
//! milestones see this frame's values.

use crate::{
    achievements::{self, AchievementDef},
    event::GameEvent,
    rng::SubsystemRng,
    state::EconomyState,
    subsystem::{TickContext, TickSubsystem},
};

pub struct AchievementSubsystem {
    defs: Vec<AchievementDef>,
}

impl AchievementSubsystem {
    pub fn new(defs: Vec<AchievementDef>) -> Self {
        Self { defs }
    }

    pub fn defs(&self) -> &[AchievementDef] {
        &self.defs
    }
}

impl TickSubsystem for AchievementSubsystem {
    fn name(&self) -> &'static str { "achievements" }

    fn update(
        &mut self,
        ctx:        TickContext,
        state:      &mut EconomyState,
        _events_in: &[GameEvent],
        _rng:       &mut SubsystemRng,
    ) -> Vec<GameEvent> {
        let unlocked = achievements::check_all(state, &self.defs);
        if !unlocked.is_empty() {
            log::debug!("frame={} {} achievement(s) unlocked", ctx.frame, unlocked.len());
        }
        unlocked
    }
}
