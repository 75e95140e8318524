//! Fast PRNG for battle simulation. Uses SplitMix64 for throughput and good statistical quality.
//! Deterministic: same seed produces the same sequence. Not cryptographically secure.
//!
//! One handle is threaded explicitly from the Monte-Carlo loop down to every crit roll, so
//! a whole aggregate is reproducible from its seed.

use crate::error::{SimError, SimResult};

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

/// 2^-53, maps the top 53 bits of a draw onto [0, 1).
const F64_UNIT: f64 = 1.0 / (1u64 << 53) as f64;

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeds from the operating system's entropy source.
    pub fn from_entropy() -> SimResult<Self> {
        Ok(Self::new(entropy_seed()?))
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }

    /// Uniform draw in [0, 1).
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * F64_UNIT
    }

    /// One Bernoulli trial: `true` with probability `p`.
    /// Always consumes exactly one draw, even for p = 0 or p = 1.
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

pub fn entropy_seed() -> SimResult<u64> {
    let mut buf = [0u8; 8];
    getrandom::getrandom(&mut buf).map_err(SimError::Entropy)?;
    Ok(u64::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix64_deterministic() {
        let mut a = Rng::new(7);
        let mut b = Rng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn splitmix64_different_seeds_differ() {
        let mut a = Rng::new(1);
        let mut b = Rng::new(2);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn next_f64_stays_in_unit_interval() {
        let mut rng = Rng::new(99);
        for _ in 0..10_000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x), "draw out of range: {x}");
        }
    }

    #[test]
    fn chance_respects_degenerate_probabilities() {
        let mut rng = Rng::new(3);
        for _ in 0..1_000 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn chance_consumes_one_draw_per_roll() {
        let mut rolled = Rng::new(11);
        let mut raw = Rng::new(11);
        rolled.chance(0.5);
        raw.next_u64();
        assert_eq!(rolled.next_u64(), raw.next_u64());
    }
}
