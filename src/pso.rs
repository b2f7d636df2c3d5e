extern crate rand;
extern crate float_ord;

use float_ord::FloatOrd;
use ndarray::{Array1,Array2,ArrayView1};
use rand::prelude::*;
use serde::Serialize;
use tracing::{debug,info};

use crate::{Error,Objective,Optimizer,RandomSource,Result};

/// Square exclusion region `[cx - hw, cx + hw] x [cy - hw, cy + hw]` that no
/// initial particle may lie strictly inside. Only defined for two dimensions.
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct Gap {
    pub half_width: f64,
    pub center_x: f64,
    pub center_y: f64
}

impl Gap {
    /// True when `point` lies strictly inside the square; the border is allowed.
    pub fn contains(&self, point: ArrayView1<f64>) -> bool {
        (point[0] - self.center_x).abs() < self.half_width &&
            (point[1] - self.center_y).abs() < self.half_width
    }

    /// True when no draw from `[lower, upper)` can land outside the gap, so
    /// the initial redraw loop would never finish. Uniform draws sit on a grid
    /// no finer than `(upper - lower) * EPSILON`, so a sliver a few grid steps
    /// wide at either edge counts as covered.
    fn covers(&self, lower: f64, upper: f64) -> bool {
        let slack = 4. * (upper - lower) * std::f64::EPSILON;
        let hw = self.half_width;
        let traps = |c: f64| c - hw <= lower + slack && c + hw >= upper - slack;
        traps(self.center_x) && traps(self.center_y)
    }
}

#[derive(Clone,Debug,PartialEq)]
pub struct PsoParams {
    /// Number of dimensions per particle
    pub dims: usize,
    /// Number of particles in the swarm
    pub swarm_size: usize,

    /// Lower bound shared by every coordinate
    pub lower_bound: f64,
    /// Upper bound shared by every coordinate
    pub upper_bound: f64,

    /// Optional region kept free of initial particles
    pub gap: Option<Gap>,

    /// Momentum coefficient
    pub w: f64,

    /// Personal best (cognitive) coefficient
    pub c_1: f64,

    /// Global best (social) coefficient
    pub c_2: f64,

    /// Iteration budget
    pub max_iter: usize,

    pub known_best_fitness: f64,
    pub tol: f64,

    /// Whether to keep a snapshot of the positions after every iteration
    pub record_history: bool
}

/// Reported to the `fit` callback once per iteration.
#[derive(Clone,Copy,Debug,PartialEq,Serialize)]
pub struct IterationStats {
    pub iteration: usize,
    pub evaluations: usize,
    pub global_best_fitness: f64
}

#[derive(Clone,Debug,Serialize)]
pub struct RunResult {
    /// Evaluation count at which the global best first came within `tol` of
    /// the known best fitness. `None` if the budget ran out first.
    pub first_hitting_time: Option<usize>,
    /// One position matrix per executed iteration, empty unless recording
    pub positions_history: Vec<Array2<f64>>,
    pub best_fitness: f64,
    pub best_position: Array1<f64>,
    /// Total objective evaluations, counted per particle
    pub evaluations: usize,
    pub iterations: usize
}

impl RunResult {
    pub fn converged(&self) -> bool {
        self.first_hitting_time.is_some()
    }
}

/// Population state for a single run.
///
/// `best_positions` is filled once from the initial swarm and never written
/// again; only `best_fitness` tracks later improvements. The velocity update
/// therefore always pulls each particle back toward where it started.
#[derive(Clone,Debug)]
struct Swarm {
    positions: Array2<f64>,
    velocity: Array2<f64>,
    best_positions: Array2<f64>,
    best_fitness: Array1<f64>,
    global_best_position: Array1<f64>,
    global_best_fitness: f64
}

/// Index of the smallest fitness, first one on ties.
fn argmin(fitness: &Array1<f64>) -> usize {
    fitness.iter()
        .enumerate()
        .min_by_key(|(_, f)| FloatOrd(**f))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn evaluate<O: Objective + ?Sized>(objective: &O, positions: &Array2<f64>) -> Result<Array1<f64>> {
    let fitness = objective.evaluate(positions.view());
    if fitness.len() != positions.nrows() {
        return Err(Error::ObjectiveShape {
            expected: positions.nrows(),
            got: fitness.len()
        });
    }
    Ok(fitness)
}

impl Swarm {
    fn new(positions: Array2<f64>, fitness: Array1<f64>) -> Self {
        let best = argmin(&fitness);
        Swarm {
            velocity: Array2::zeros(positions.raw_dim()),
            best_positions: positions.clone(),
            global_best_position: positions.row(best).to_owned(),
            global_best_fitness: fitness[best],
            best_fitness: fitness,
            positions
        }
    }

    /// One velocity and position update for the whole swarm. `r_1` and `r_2`
    /// are shared by every particle and every dimension.
    fn step(&mut self, w: f64, c_1: f64, c_2: f64, r_1: f64, r_2: f64) {
        let cognitive = &self.best_positions - &self.positions;
        let away_from_global = &self.positions - &self.global_best_position;

        self.velocity *= w;
        self.velocity.scaled_add(c_1 * r_1, &cognitive);
        self.velocity.scaled_add(-(c_2 * r_2), &away_from_global);

        self.positions += &self.velocity;
    }

    /// Redraws every out of bounds coordinate uniformly inside the bounds.
    /// Returns how many coordinates were redrawn.
    fn enforce_bounds<R: RandomSource + ?Sized>(&mut self, lower: f64, upper: f64, rng: &mut R) -> usize {
        let mut resampled = 0;
        self.positions.iter_mut().for_each(|x| {
            if !(lower <= *x && *x <= upper) {
                *x = rng.uniform(lower, upper);
                resampled += 1;
            }
        });
        resampled
    }

    /// Folds a fresh fitness vector into the global and personal bests.
    fn update_bests(&mut self, fitness: &Array1<f64>) {
        let best = argmin(fitness);
        if fitness[best] < self.global_best_fitness {
            self.global_best_fitness = fitness[best];
            self.global_best_position.assign(&self.positions.row(best));
        }

        self.best_fitness.iter_mut().zip(fitness.iter()).for_each(|(pb, f)| {
            if *f < *pb {
                *pb = *f;
            }
        });
    }
}

#[derive(Clone,Debug)]
pub struct PSO {
    params: PsoParams
}

impl PSO {

    pub fn new(params: PsoParams) -> Result<Self> {
        if params.dims == 0 {
            return Err(Error::invalid("nb_dim", "must be greater than zero"));
        }
        if params.swarm_size == 0 {
            return Err(Error::invalid("nb_particles", "must be greater than zero"));
        }
        if !params.lower_bound.is_finite() || !params.upper_bound.is_finite() {
            return Err(Error::invalid("lower_bound", "bounds must be finite"));
        }
        if !(params.lower_bound < params.upper_bound) {
            return Err(Error::invalid("lower_bound", format!(
                "{} is not below upper_bound {}", params.lower_bound, params.upper_bound)));
        }
        if !(params.tol >= 0.) {
            return Err(Error::invalid("tol", "must be non-negative"));
        }
        if let Some(gap) = params.gap {
            if params.dims != 2 {
                return Err(Error::invalid("initial_positions", format!(
                    "a gap needs exactly 2 dimensions, got {}", params.dims)));
            }
            if !(gap.half_width >= 0.) || !gap.center_x.is_finite() || !gap.center_y.is_finite() {
                return Err(Error::invalid("initial_positions", "gap must be finite with a non-negative half width"));
            }
            if gap.covers(params.lower_bound, params.upper_bound) {
                return Err(Error::invalid("initial_positions", "gap covers the whole search box"));
            }
        }
        Ok(PSO { params })
    }

    pub fn params(&self) -> &PsoParams {
        &self.params
    }

    /// Uniform positions in the box, with particles inside the gap (if any)
    /// redrawn until none remain there.
    fn initial_positions<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Array2<f64> {
        let p = &self.params;
        let (lower, upper) = (p.lower_bound, p.upper_bound);
        let mut positions = Array2::zeros((p.swarm_size, p.dims));
        positions.iter_mut().for_each(|x| *x = rng.uniform(lower, upper));

        if let Some(gap) = p.gap {
            let mut round = 0;
            loop {
                let mut rejected = 0;
                for mut row in positions.rows_mut() {
                    if gap.contains(row.view()) {
                        row.iter_mut().for_each(|x| *x = rng.uniform(lower, upper));
                        rejected += 1;
                    }
                }
                if rejected == 0 {
                    break;
                }
                round += 1;
                debug!(round, rejected, "redrew particles inside gap");
            }
        }
        positions
    }

    /// Runs once with an `StdRng` seeded from `seed`.
    pub fn fit_seeded<O: Objective + ?Sized>(&self, objective: &O, seed: u64) -> Result<RunResult> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        self.fit(objective, &mut rng, |_| {})
    }
}

impl Optimizer for PSO {
    type Stats = IterationStats;
    type Output = RunResult;

    fn fit<O: Objective + ?Sized, R: RandomSource + ?Sized, FN: FnMut(&Self::Stats) -> ()>(
        &self,
        objective: &O,
        rng: &mut R,
        mut callback: FN
    ) -> Result<RunResult> {
        let p = &self.params;

        let positions = self.initial_positions(rng);
        let fitness = evaluate(objective, &positions)?;
        let mut evaluations = p.swarm_size;
        let mut swarm = Swarm::new(positions, fitness);

        let mut history = Vec::new();
        let mut first_hitting_time = None;
        let mut iterations = 0;

        for iteration in 1..=p.max_iter {
            // Exactly two draws per iteration, shared by the whole swarm
            let r_1 = rng.unit();
            let r_2 = rng.unit();
            swarm.step(p.w, p.c_1, p.c_2, r_1, r_2);
            let resampled = swarm.enforce_bounds(p.lower_bound, p.upper_bound, rng);

            if p.record_history {
                history.push(swarm.positions.clone());
            }

            let fitness = evaluate(objective, &swarm.positions)?;
            evaluations += p.swarm_size;
            swarm.update_bests(&fitness);
            iterations = iteration;

            debug!(iteration, evaluations, resampled, best = swarm.global_best_fitness, "pso iteration");
            callback(&IterationStats {
                iteration,
                evaluations,
                global_best_fitness: swarm.global_best_fitness
            });

            if (swarm.global_best_fitness - p.known_best_fitness).abs() < p.tol {
                info!(iteration, evaluations, best = swarm.global_best_fitness, "reached known best fitness");
                first_hitting_time = Some(evaluations);
                break;
            }
        }

        if first_hitting_time.is_none() {
            info!(iterations, evaluations, best = swarm.global_best_fitness, "iteration budget exhausted");
        }

        Ok(RunResult {
            first_hitting_time,
            positions_history: history,
            best_fitness: swarm.global_best_fitness,
            best_position: swarm.global_best_position,
            evaluations,
            iterations
        })
    }
}
