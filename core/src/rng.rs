//! Seeded randomness for crits, weather, bosses, specials and the wheel.
//!
//! RULE: the game core never touches thread_rng or the OS entropy pool.
//! Every roll comes from a stream keyed by (session seed, slot, frame), so
//! a new slot leaves the others untouched and the same inputs under the
//! same seed replay identically.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::types::Frame;

/// One seeded stream, handed to a tick system or a player action.
pub struct SubsystemRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SubsystemRng {
    /// Stream for `slot_index` under `seed`. A slot keeps its index forever.
    pub fn new(seed: u64, slot_index: u64) -> Self {
        let mixed = seed ^ slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self { name: "anonymous", inner: Pcg64Mcg::seed_from_u64(mixed) }
    }

    /// Label used in `frame=` debug lines.
    pub fn with_name(self, name: &'static str) -> Self {
        Self { name, ..self }
    }

    /// Uniform in [0, 1) from the top 53 bits. Crit and spawn rolls use this.
    pub fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (1u64 << 53) as f64;
        (self.inner.next_u64() >> 11) as f64 * SCALE
    }

    /// Uniform in [0, n). Callers guarantee `n > 0`.
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll a float in [lo, hi).
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Roll an integer in [lo, hi] inclusive.
    pub fn range_u64_inclusive(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            return lo;
        }
        lo + self.next_u64_below(hi - lo + 1)
    }

    /// `true` with probability `p`. Always draws, so a zero chance still
    /// advances the stream.
    pub fn chance(&mut self, p: f64) -> bool {
        let roll = self.next_f64();
        roll < p
    }

    /// Pick an index with probability proportional to its weight.
    /// Returns 0 when every weight is zero.
    pub fn weighted_index(&mut self, weights: &[u32]) -> usize {
        let total: u64 = weights.iter().map(|w| u64::from(*w)).sum();
        if total == 0 {
            return 0;
        }
        let mut roll = self.next_u64_below(total);
        for (i, w) in weights.iter().enumerate() {
            let w = u64::from(*w);
            if roll < w {
                return i;
            }
            roll -= w;
        }
        weights.len() - 1
    }
}

/// All slot RNGs for a single session.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn seed(&self) -> u64 {
        self.master_seed
    }

    /// The stream for `slot` during `frame`. Calling twice with the same
    /// arguments yields the same sequence.
    pub fn for_subsystem_at_frame(&self, slot: SubsystemSlot, frame: Frame) -> SubsystemRng {
        let frame_seed = self
            .master_seed
            .wrapping_add(frame.wrapping_mul(0xbf58_476d_1ce4_e5b9));
        SubsystemRng::new(frame_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable slot assignments.
/// NEVER reorder or remove entries; only append.
/// Reordering changes every slot's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum SubsystemSlot {
    Click = 0,
    Weather = 1,
    Boss = 2,
    Special = 3,
    Wheel = 4,
    Powerup = 5,
    Engine = 6,
}

impl SubsystemSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Weather => "weather",
            Self::Boss => "boss",
            Self::Special => "special",
            Self::Wheel => "wheel",
            Self::Powerup => "powerup",
            Self::Engine => "engine",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_slot_and_frame_is_reproducible() {
        let bank = RngBank::new(12345);
        let mut a = bank.for_subsystem_at_frame(SubsystemSlot::Click, 7);
        let mut b = bank.for_subsystem_at_frame(SubsystemSlot::Click, 7);
        for _ in 0..16 {
            assert_eq!(a.next_u64_below(1000), b.next_u64_below(1000));
        }
    }

    #[test]
    fn frames_produce_different_streams() {
        let bank = RngBank::new(12345);
        let a: Vec<u64> = {
            let mut rng = bank.for_subsystem_at_frame(SubsystemSlot::Weather, 1);
            (0..8).map(|_| rng.next_u64_below(1_000_000)).collect()
        };
        let b: Vec<u64> = {
            let mut rng = bank.for_subsystem_at_frame(SubsystemSlot::Weather, 2);
            (0..8).map(|_| rng.next_u64_below(1_000_000)).collect()
        };
        assert_ne!(a, b);
    }

    #[test]
    fn zero_chance_never_fires_but_still_draws() {
        let bank = RngBank::new(8);
        let mut a = bank.for_subsystem_at_frame(SubsystemSlot::Special, 2);
        let mut b = bank.for_subsystem_at_frame(SubsystemSlot::Special, 2);
        for _ in 0..100 {
            assert!(!a.chance(0.0));
            b.next_f64();
        }
        assert_eq!(a.next_u64_below(1 << 40), b.next_u64_below(1 << 40));
    }

    #[test]
    fn weighted_index_skips_zero_weights() {
        let bank = RngBank::new(99);
        let mut rng = bank.for_subsystem_at_frame(SubsystemSlot::Wheel, 1);
        for _ in 0..200 {
            let i = rng.weighted_index(&[0, 5, 0, 1]);
            assert!(i == 1 || i == 3, "picked zero-weight index {i}");
        }
    }

    #[test]
    fn inclusive_range_stays_in_bounds() {
        let bank = RngBank::new(3);
        let mut rng = bank.for_subsystem_at_frame(SubsystemSlot::Special, 4);
        for _ in 0..500 {
            let v = rng.range_u64_inclusive(800, 3500);
            assert!((800..=3500).contains(&v));
        }
    }
}
