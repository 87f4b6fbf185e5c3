//! Where simulated progress increments come from.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Upper bound (exclusive) of one random increment.
const MAX_INCREMENT: u8 = 15;

/// Supplies the increment applied on each progress tick.
pub trait ProgressSource: Send {
    fn next_increment(&mut self) -> u8;
}

impl<F> ProgressSource for F
where
    F: FnMut() -> u8 + Send,
{
    fn next_increment(&mut self) -> u8 {
        self()
    }
}

/// Uniform increments in `0..15`.
#[derive(Debug)]
pub struct RandomProgress {
    rng: StdRng,
}

impl RandomProgress {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSource for RandomProgress {
    fn next_increment(&mut self) -> u8 {
        self.rng.gen_range(0..MAX_INCREMENT)
    }
}
