//! Deterministic Xorshift64 PRNG.
//!
//! Everything random in a generation cycle — shape scatter, force offsets,
//! noise seeds, frame lifetimes — draws from one of these, so a run is
//! reproducible from a single `u64` seed on any platform. The core step is
//! pure integer arithmetic.

/// Xorshift64 PRNG with the standard (13, 7, 17) shift triple.
///
/// A seed of 0 is the algorithm's fixed point and is replaced with a
/// non-zero fallback.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Substitute for seed 0, which would lock the generator at zero.
    const ZERO_SEED_FALLBACK: u64 = 0x9E37_79B9_7F4A_7C15;

    /// Creates a generator from `seed` (0 is replaced with a fallback).
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 {
                Self::ZERO_SEED_FALLBACK
            } else {
                seed
            },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Next value truncated to 32 bits (noise generator seeds).
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform f64 in [0, 1), using the top 53 bits for full mantissa width.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform f64 in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform usize in [0, max).
    ///
    /// # Panics
    ///
    /// Panics if `max` is 0.
    pub fn next_usize(&mut self, max: usize) -> usize {
        (self.next_u64() as usize) % max
    }
}
