//! Deterministic pseudo-random sequences for glitch effects.
//!
//! Everything here is reproducible from a seed: the decay order of a pulse
//! session is derived from its birth time, and the placeholder letters shown
//! while a glyph flickers are a pure hash of `(index, seed)`. The generator
//! is ChaCha8, whose stream is stable across platforms.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Multiplier applied to the index before mixing it into the seed
const INDEX_MIX: u32 = 1_664_525;
/// Finalisation multiplier for the xor-shift mix
const FINAL_MIX: u32 = 2_246_822_519;

/// Seed for a session born at `birth_time` seconds: whole milliseconds.
pub fn seed_from_birth(birth_time: f64) -> u64 {
    (birth_time * 1000.0).floor().max(0.0) as u64
}

/// A seeded stream used to build one decay plan.
///
/// The shuffle, the batch sizes and the jitter are all drawn from the same
/// stream in that order, so one seed reproduces the whole plan.
#[derive(Debug, Clone)]
pub struct SubSequence {
    rng: ChaCha8Rng,
}

impl SubSequence {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Fisher-Yates shuffle of `0..n`
    pub fn permute(&mut self, n: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut self.rng);
        indices
    }

    /// Uniform batch size in `min..=max`
    pub fn batch_size(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min.max(1);
        }
        self.rng.gen_range(min..=max).max(1)
    }

    /// Jitter in whole milliseconds, `0..max_ms`, returned as seconds
    pub fn jitter(&mut self, max_ms: u32) -> f64 {
        if max_ms == 0 {
            return 0.0;
        }
        f64::from(self.rng.gen_range(0..max_ms)) / 1000.0
    }
}

/// Placeholder capital letter for a glitching glyph.
///
/// Pure function: the same `(index, seed)` always gives the same letter.
/// Callers vary `seed` per frame to make the glyph flicker.
pub fn stable_char(index: usize, seed: i64) -> char {
    let mut s = (seed as u32) ^ (index as u32).wrapping_mul(INDEX_MIX);
    s = (s ^ (s >> 16)).wrapping_mul(FINAL_MIX);
    char::from(b'A' + (s % 26) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn permute(n: usize, seed: u64) -> Vec<usize> {
        SubSequence::new(seed).permute(n)
    }

    #[test]
    fn seed_truncates_to_milliseconds() {
        assert_eq!(seed_from_birth(1.2345), 1234);
        assert_eq!(seed_from_birth(0.0), 0);
        assert_eq!(seed_from_birth(-4.0), 0);
    }

    #[test]
    fn permute_is_reproducible() {
        assert_eq!(permute(24, 5150), permute(24, 5150));
    }

    #[test]
    fn permute_of_empty_is_empty() {
        assert!(permute(0, 9).is_empty());
    }

    #[test]
    fn different_seeds_usually_differ() {
        let a = permute(32, 1);
        let b = permute(32, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn stable_char_is_pure_and_uppercase() {
        for index in 0..64 {
            for seed in [-7_i64, 0, 1, 789, 123_456] {
                let c = stable_char(index, seed);
                assert!(c.is_ascii_uppercase());
                assert_eq!(c, stable_char(index, seed));
            }
        }
    }

    #[test]
    fn batch_size_stays_in_range() {
        let mut seq = SubSequence::new(77);
        for _ in 0..200 {
            let b = seq.batch_size(2, 3);
            assert!((2..=3).contains(&b));
        }
        assert_eq!(seq.batch_size(4, 4), 4);
    }

    #[test]
    fn jitter_is_bounded() {
        let mut seq = SubSequence::new(3);
        for _ in 0..200 {
            let j = seq.jitter(30);
            assert!((0.0..0.030).contains(&j));
        }
        assert_eq!(seq.jitter(0), 0.0);
    }

    proptest! {
        #[test]
        fn permute_is_a_permutation(n in 0usize..200, seed in any::<u64>()) {
            let mut p = permute(n, seed);
            p.sort_unstable();
            prop_assert_eq!(p, (0..n).collect::<Vec<_>>());
        }
    }
}
