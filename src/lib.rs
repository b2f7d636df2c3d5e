pub mod config;
pub mod error;
pub mod exp;
pub mod pso;
pub mod random;
pub mod trials;

use ndarray::{Array1,ArrayView2};

pub use crate::config::SwarmConfig;
pub use crate::error::{Error,Result};
pub use crate::pso::{Gap,IterationStats,PSO,PsoParams,RunResult};
pub use crate::random::RandomSource;

/// Batched objective: scores every row of an `nb_particles x nb_dim`
/// position matrix in one call. Lower is better.
pub trait Objective: Send + Sync {
    fn evaluate(&self, positions: ArrayView2<f64>) -> Array1<f64>;
}

impl<F> Objective for F
    where F: Fn(ArrayView2<f64>) -> Array1<f64> + Send + Sync
{
    fn evaluate(&self, positions: ArrayView2<f64>) -> Array1<f64> {
        self(positions)
    }
}

pub trait Optimizer: Clone + std::fmt::Debug + Send + Sync {
    type Stats;
    type Output;

    fn fit<O: Objective + ?Sized, R: RandomSource + ?Sized, FN: FnMut(&Self::Stats) -> ()>(
        &self,
        objective: &O,
        rng: &mut R,
        callback: FN
    ) -> Result<Self::Output>;
}

/// Parses a JSON configuration record, resolves its objective and runs it
/// once with a seeded `StdRng`.
pub fn run_json(config: &str, seed: u64) -> Result<RunResult> {
    let (objective, pso) = SwarmConfig::from_json(config)?.build()?;
    pso.fit_seeded(&*objective, seed)
}
