//! Tick subsystem trait.
//!
//! RULE: Every time-driven piece of the game implements TickSubsystem.
//! The session calls update() on each registered subsystem in
//! registration order, every frame. The order is fixed and documented
//! in engine.rs; later subsystems read values earlier ones just wrote.

use crate::{
    event::GameEvent,
    rng::SubsystemRng,
    state::EconomyState,
    types::{Frame, Seconds},
};

/// Timing for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub frame: Frame,
    /// Clamped step in seconds.
    pub dt:    Seconds,
}

/// The contract every tick subsystem fulfils.
pub trait TickSubsystem {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// Advance this subsystem's part of the state by one frame.
    ///
    /// - `ctx`:       frame number and clamped delta
    /// - `state`:     the economy state, already updated by earlier subsystems
    /// - `events_in`: events emitted by earlier subsystems this frame
    /// - `rng`:       this subsystem's deterministic RNG for this frame
    ///
    /// Returns the events this subsystem produced.
    fn update(
        &mut self,
        ctx:       TickContext,
        state:     &mut EconomyState,
        events_in: &[GameEvent],
        rng:       &mut SubsystemRng,
    ) -> Vec<GameEvent>;
}
