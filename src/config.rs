//! Configuration record for a single run.
//!
//! Every field is required and unknown fields are rejected, so a record that
//! deserializes has exactly the expected shape. Range checks happen in
//! [`SwarmConfig::build`], before the objective is touched.

use std::io::Read;

use serde::Deserialize;

use crate::exp;
use crate::pso::{Gap,PSO,PsoParams};
use crate::{Error,Objective,Result};

#[derive(Clone,Debug,PartialEq,Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwarmConfig {
    /// Name of a benchmark in [`crate::exp`]
    pub objective: String,
    /// Signed so that non-positive values are reported as out of range
    /// rather than as a type error.
    pub nb_dim: i64,
    /// Empty, or `[half_width, center_x, center_y]` of a gap to keep clear
    pub initial_positions: Vec<f64>,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub w: f64,
    pub c1: f64,
    pub c2: f64,
    pub nb_particles: usize,
    pub max_iter: usize,
    pub known_best_fitness: f64,
    pub tol: f64,
    pub positions_hist_flag: bool
}

impl SwarmConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    fn gap(&self) -> Result<Option<Gap>> {
        match self.initial_positions.as_slice() {
            [] => Ok(None),
            [half_width, center_x, center_y] => Ok(Some(Gap {
                half_width: *half_width,
                center_x: *center_x,
                center_y: *center_y
            })),
            other => Err(Error::invalid("initial_positions", format!(
                "expected 0 or 3 values, got {}", other.len())))
        }
    }

    /// Validates the numeric fields into swarm parameters.
    pub fn params(&self) -> Result<PsoParams> {
        if self.nb_dim <= 0 {
            return Err(Error::invalid("nb_dim", format!("must be greater than zero, got {}", self.nb_dim)));
        }
        Ok(PsoParams {
            dims: self.nb_dim as usize,
            swarm_size: self.nb_particles,
            lower_bound: self.lower_bound,
            upper_bound: self.upper_bound,
            gap: self.gap()?,
            w: self.w,
            c_1: self.c1,
            c_2: self.c2,
            max_iter: self.max_iter,
            known_best_fitness: self.known_best_fitness,
            tol: self.tol,
            record_history: self.positions_hist_flag
        })
    }

    /// Resolves the objective and validates everything else. The swarm
    /// parameters are checked first so an out of range record never reaches
    /// the objective lookup.
    pub fn build(&self) -> Result<(Box<dyn Objective>, PSO)> {
        let pso = PSO::new(self.params()?)?;
        let objective = exp::by_name(&self.objective, pso.params().dims)?;
        Ok((objective, pso))
    }
}
