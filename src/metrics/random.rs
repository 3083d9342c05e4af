use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the uniform draws the encoder needs.
pub trait RandomSource {
    /// Uniform integer in `[0, upper)`; returns 0 when `upper` is 0.
    fn next_below(&mut self, upper: u64) -> u64;
    /// Uniform float in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

/// Process-wide generator backed by `StdRng`.
#[derive(Debug)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self { rng }
    }
}

impl RandomSource for SeededRandom {
    fn next_below(&mut self, upper: u64) -> u64 {
        if upper == 0 {
            return 0;
        }
        self.rng.gen_range(0..upper)
    }

    fn next_unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}
