// rng.rs - Injectable randomness
//
// Particle attributes are sampled through a trait so creation is
// deterministic and replayable under test.

/// Uniform random source for particle attribute sampling.
pub trait RandomSource {
    /// Uniform value in [0, 1).
    fn next(&mut self) -> f32;

    /// Uniform value in [min, max).
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next()
    }
}

/// xorshift32 generator. Small, fast, plenty for visual jitter.
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub fn new(seed: u32) -> Self {
        // xorshift is stuck at zero, so a zero seed gets remapped
        Self {
            state: if seed == 0 { 0xDEAD_BEEF } else { seed },
        }
    }
}

impl RandomSource for XorShift32 {
    fn next(&mut self) -> f32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        (self.state >> 8) as f32 * (1.0 / 16_777_216.0)
    }
}
