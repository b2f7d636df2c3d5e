//! Repeated independent runs of one configuration.
//!
//! Each run owns its swarm and an `StdRng` seeded from its own seed, so the
//! results do not depend on how rayon schedules them.

extern crate rayon;

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::pso::{PSO,RunResult};
use crate::{Objective,Result};

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct TrialSummary {
    pub runs: usize,
    pub successes: usize,
    pub success_rate: f64,
    /// Mean first hitting time over the runs that converged
    pub mean_hitting_time: Option<f64>,
    pub min_hitting_time: Option<usize>,
    pub max_hitting_time: Option<usize>
}

impl TrialSummary {
    pub fn from_results(results: &[RunResult]) -> Self {
        let hits: Vec<usize> = results.iter()
            .filter_map(|r| r.first_hitting_time)
            .collect();

        let runs = results.len();
        let successes = hits.len();
        TrialSummary {
            runs,
            successes,
            success_rate: if runs == 0 { 0. } else { successes as f64 / runs as f64 },
            mean_hitting_time: if hits.is_empty() {
                None
            } else {
                Some(hits.iter().sum::<usize>() as f64 / successes as f64)
            },
            min_hitting_time: hits.iter().copied().min(),
            max_hitting_time: hits.iter().copied().max()
        }
    }
}

/// Runs `pso` once per seed. Results come back in seed order.
pub fn run_trials<O: Objective + ?Sized>(
    pso: &PSO,
    objective: &O,
    seeds: &[u64]
) -> Result<(Vec<RunResult>, TrialSummary)> {
    let results = seeds.par_iter()
        .map(|seed| pso.fit_seeded(objective, *seed))
        .collect::<Result<Vec<_>>>()?;

    let summary = TrialSummary::from_results(&results);
    info!(
        runs = summary.runs,
        successes = summary.successes,
        mean_hitting_time = ?summary.mean_hitting_time,
        "trials finished"
    );
    Ok((results, summary))
}
