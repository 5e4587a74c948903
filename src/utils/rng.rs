//! Seedable random number generator for weight initialization.
//!
//! A small xorshift PRNG passed explicitly to whatever needs randomness, so
//! parameter initialization is reproducible from a seed.

/// Seed used when a caller passes `0`, which would lock xorshift at zero.
const FALLBACK_SEED: u64 = 0x9e3779b97f4a7c15;

/// Xorshift64 random source.
///
/// Cloning an `SimpleRng` forks the stream: both copies produce the same
/// sequence from that point on.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new RNG with explicit seed (if zero, use a fixed value).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { FALLBACK_SEED } else { seed };
        Self { state }
    }

    /// Basic xorshift to generate u32.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        (x >> 32) as u32
    }

    /// Uniform sample in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Uniform sample in [low, high).
    pub fn gen_range_f64(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Standard normal sample via the Box-Muller transform.
    ///
    /// `u1` is drawn from (0, 1] so the logarithm stays finite.
    pub fn next_gaussian(&mut self) -> f64 {
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}
