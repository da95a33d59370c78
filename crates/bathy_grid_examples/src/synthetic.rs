//! Seeded synthetic survey data, so the examples run without input files.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform `f64` source over a seeded [`StdRng`].
pub struct Uniform {
    rng: StdRng,
}

impl Uniform {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Value in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        (self.rng.next_u32() as f64) / ((u32::MAX as f64) + 1.0)
    }

    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_unit()
    }
}

/// A smooth seabed: a channel running south-west to north-east across a shelf, in metres
/// (negative down). `x` and `y` are in `[0, 1]`.
pub fn seabed_depth(x: f64, y: f64) -> f64 {
    let along = (x + y) * 0.5;
    let across = x - y;
    let shelf = -8.0 - 12.0 * along;
    let channel = -25.0 * (-(across * across) / 0.02).exp();
    shelf + channel
}
