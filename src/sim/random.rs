//! Injectable randomness
//!
//! Room population, enemy wandering and heart drops all draw from a [`Dice`]
//! so tests can force outcomes without a global random source.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

pub trait Dice {
    /// True with the given probability (0.0 - 1.0)
    fn chance(&mut self, probability: f32) -> bool;

    /// Uniform value in `min..max`; returns `min` for an empty range
    fn range(&mut self, min: f32, max: f32) -> f32;

    /// Uniform integer in `min..=max`; returns `min` for an empty range
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32;

    /// Uniform index in `0..len`; `len` must be non-zero
    fn index(&mut self, len: usize) -> usize;
}

/// Deterministic dice backed by a seeded PCG stream
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: Pcg32,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl Dice for SeededDice {
    fn chance(&mut self, probability: f32) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.rng.random_bool(f64::from(probability.clamp(0.0, 1.0)))
    }

    fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..max)
    }

    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

/// Dice with forced outcomes: every chance roll returns `succeed`, ranges
/// return the point `fraction` of the way from min to max.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDice {
    pub succeed: bool,
    pub fraction: f32,
}

impl FixedDice {
    /// Every chance roll succeeds
    pub fn always() -> Self {
        Self {
            succeed: true,
            fraction: 0.0,
        }
    }

    /// Every chance roll fails
    pub fn never() -> Self {
        Self {
            succeed: false,
            fraction: 0.0,
        }
    }
}

impl Dice for FixedDice {
    fn chance(&mut self, _probability: f32) -> bool {
        self.succeed
    }

    fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + (max - min) * self.fraction.clamp(0.0, 1.0)
    }

    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        min + ((max - min) as f32 * self.fraction.clamp(0.0, 1.0)).round() as u32
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((len as f32 * self.fraction.clamp(0.0, 1.0)) as usize).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_dice_is_deterministic() {
        let mut a = SeededDice::new(99);
        let mut b = SeededDice::new(99);
        for _ in 0..20 {
            assert_eq!(a.range(0.0, 10.0), b.range(0.0, 10.0));
            assert_eq!(a.chance(0.3), b.chance(0.3));
        }
    }

    #[test]
    fn test_seeded_dice_edge_probabilities() {
        let mut dice = SeededDice::new(1);
        assert!((0..50).all(|_| dice.chance(1.0)));
        assert!((0..50).all(|_| !dice.chance(0.0)));
        assert!((0..50).all(|_| !dice.chance(f32::NAN)));
        assert_eq!(dice.range(5.0, 5.0), 5.0);
        assert_eq!(dice.range_inclusive(3, 3), 3);
        let value = dice.range_inclusive(3, 5);
        assert!((3..=5).contains(&value));
    }

    #[test]
    fn test_fixed_dice() {
        let mut dice = FixedDice {
            succeed: false,
            fraction: 0.5,
        };
        assert!(!dice.chance(1.0));
        assert_eq!(dice.range(10.0, 20.0), 15.0);
        assert_eq!(dice.index(4), 2);
        assert_eq!(FixedDice { fraction: 1.0, ..dice }.index(4), 3);
        assert!(FixedDice::always().chance(0.0));
    }
}
