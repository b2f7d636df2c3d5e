use rand::prelude::*;
use rand_distr::{Distribution,Uniform};

/// Source of every random draw the optimizer makes.
///
/// Implemented for all `rand::Rng`s, so a seeded `StdRng` can be passed
/// directly; tests substitute a scripted source to force particular draws.
pub trait RandomSource {
    /// Uniform draw from `[low, high)`. Callers guarantee `low < high`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Uniform draw from `[0, 1)`, used for the velocity coefficients.
    fn unit(&mut self) -> f64 {
        self.uniform(0., 1.)
    }
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        Uniform::new(low, high).sample(self)
    }
}

/// Replays a fixed cycle of unit draws, scaled into whatever range is asked for.
#[cfg(test)]
#[derive(Clone,Debug)]
pub(crate) struct Scripted {
    draws: Vec<f64>,
    idx: usize,
    pub calls: usize
}

#[cfg(test)]
impl Scripted {
    pub fn new(draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty());
        Scripted { draws, idx: 0, calls: 0 }
    }
}

#[cfg(test)]
impl RandomSource for Scripted {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        let u = self.draws[self.idx % self.draws.len()];
        self.idx += 1;
        self.calls += 1;
        low + u * (high - low)
    }
}
