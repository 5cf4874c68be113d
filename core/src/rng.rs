//! Random sources for maze generation
//!
//! Generation never touches a global RNG. Every random decision (entrance and
//! exit rows, the order lattice moves are tried in) goes through a
//! [`RandomSource`] handed to the generator at construction, so a fixed seed
//! always reproduces the same maze.
//!
//! [`SimpleLCG`] is the default source: a Park-Miller MINSTD generator.
//!
//! Constants:
//! - Multiplier (a): 48271
//! - Modulus (m): 2^31 - 1 = 2147483647
//!
//! Reference: https://en.wikipedia.org/wiki/Lehmer_random_number_generator

const MULTIPLIER: u64 = 48271;
const MODULUS: u64 = 2147483647; // 2^31 - 1

/// Source of randomness consumed by the generator.
pub trait RandomSource {
    /// Random integer in range [a, b] (inclusive).
    fn randint(&mut self, a: usize, b: usize) -> usize;

    /// Random index in range [0, len).
    fn choice_index(&mut self, len: usize) -> usize;

    /// Shuffle a slice in place (Fisher-Yates, back to front).
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.choice_index(i + 1);
            items.swap(i, j);
        }
    }
}

/// Park-Miller Linear Congruential Generator
///
/// Generates a deterministic sequence of pseudo-random numbers from a seed.
/// Same seed always produces the same sequence.
#[derive(Debug, Clone)]
pub struct SimpleLCG {
    state: u32,
}

impl SimpleLCG {
    /// Create a new LCG with the given seed
    ///
    /// The state must stay in [1, m - 1]: a seed of 0 is replaced with 1 and
    /// larger seeds are reduced modulo m.
    pub fn new(seed: u32) -> Self {
        let state = (seed as u64 % MODULUS) as u32;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    fn advance(&mut self) {
        // u64 keeps the multiplication from overflowing
        self.state = ((self.state as u64 * MULTIPLIER) % MODULUS) as u32;
    }
}

impl RandomSource for SimpleLCG {
    /// Pure integer arithmetic: `a + (state * (b - a + 1)) / m`
    fn randint(&mut self, a: usize, b: usize) -> usize {
        debug_assert!(a <= b, "randint called with an empty range");
        self.advance();

        let range = (b - a + 1) as u64;
        let scaled = (self.state as u64 * range) / MODULUS;
        a + scaled as usize
    }

    fn choice_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "choice_index called with an empty range");
        self.advance();

        let scaled = (self.state as u64 * len as u64) / MODULUS;
        scaled as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = SimpleLCG::new(12345);
        let mut rng2 = SimpleLCG::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.choice_index(1000), rng2.choice_index(1000));
        }
    }

    #[test]
    fn test_seed_zero() {
        let mut zero = SimpleLCG::new(0);
        let mut one = SimpleLCG::new(1);
        assert_eq!(zero.randint(0, 1_000_000), one.randint(0, 1_000_000));
    }

    #[test]
    fn test_seed_equal_to_modulus_is_not_degenerate() {
        let mut rng = SimpleLCG::new(MODULUS as u32);
        let values: Vec<usize> = (0..20).map(|_| rng.choice_index(100)).collect();
        assert!(values.iter().any(|&v| v != values[0]));
    }

    #[test]
    fn test_randint() {
        let mut rng = SimpleLCG::new(11111);

        for _ in 0..100 {
            let val = rng.randint(5, 10);
            assert!((5..=10).contains(&val), "randint {} not in [5, 10]", val);
        }
    }

    #[test]
    fn test_randint_single_value() {
        let mut rng = SimpleLCG::new(42);
        for _ in 0..10 {
            assert_eq!(rng.randint(3, 3), 3);
        }
    }

    #[test]
    fn test_choice_index_range() {
        let mut rng = SimpleLCG::new(54321);

        for _ in 0..1000 {
            assert!(rng.choice_index(4) < 4);
        }
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = SimpleLCG::new(2918957128);
        let mut items = [0, 1, 2, 3, 4, 5, 6, 7];
        rng.shuffle(&mut items);

        let mut sorted = items;
        sorted.sort_unstable();
        assert_eq!(sorted, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_shuffle_reproducible() {
        let mut a = [(0, 2), (2, 0), (0, -2), (-2, 0)];
        let mut b = a;
        SimpleLCG::new(777).shuffle(&mut a);
        SimpleLCG::new(777).shuffle(&mut b);
        assert_eq!(a, b);
    }
}
