//! Benchmark objectives with a known minimum of zero.

use std::f64::consts::PI;

use ndarray::{Array1,ArrayView1,ArrayView2,Axis};

use crate::{Error,Objective,Result};

fn rowwise<F: Fn(ArrayView1<f64>) -> f64>(positions: ArrayView2<f64>, f: F) -> Array1<f64> {
    positions.map_axis(Axis(1), f)
}

pub struct Sphere;

impl Objective for Sphere {
    fn evaluate(&self, positions: ArrayView2<f64>) -> Array1<f64> {
        rowwise(positions, |x| x.dot(&x))
    }
}

pub struct Rastrigin;

impl Objective for Rastrigin {
    fn evaluate(&self, positions: ArrayView2<f64>) -> Array1<f64> {
        rowwise(positions, |x| {
            10. * x.len() as f64 +
                x.iter().map(|xi| xi * xi - 10. * (2. * PI * xi).cos()).sum::<f64>()
        })
    }
}

pub struct Rosenbrock;

impl Objective for Rosenbrock {
    fn evaluate(&self, positions: ArrayView2<f64>) -> Array1<f64> {
        rowwise(positions, |x| {
            x.iter().zip(x.iter().skip(1))
                .map(|(a, b)| 100. * (b - a * a).powi(2) + (1. - a).powi(2))
                .sum()
        })
    }
}

pub struct Ackley;

impl Objective for Ackley {
    fn evaluate(&self, positions: ArrayView2<f64>) -> Array1<f64> {
        rowwise(positions, |x| {
            let n = x.len() as f64;
            let sq = x.iter().map(|xi| xi * xi).sum::<f64>() / n;
            let cos = x.iter().map(|xi| (2. * PI * xi).cos()).sum::<f64>() / n;
            -20. * (-0.2 * sq.sqrt()).exp() - cos.exp() + 20. + std::f64::consts::E
        })
    }
}

/// Matyas function shifted by `(self.0, self.1)`. Two dimensions only.
pub struct MatyasEnv(pub f64, pub f64);

impl Objective for MatyasEnv {
    fn evaluate(&self, positions: ArrayView2<f64>) -> Array1<f64> {
        rowwise(positions, |candidate| {
            let x = candidate[0] + self.0;
            let y = candidate[1] + self.1;
            0.26 * (x.powi(2) + y.powi(2)) - 0.48 * x * y
        })
    }
}

/// Looks up a benchmark by name for a swarm of `dims` dimensions.
pub fn by_name(name: &str, dims: usize) -> Result<Box<dyn Objective>> {
    let objective: Box<dyn Objective> = match name {
        "sphere" => Box::new(Sphere),
        "rastrigin" => Box::new(Rastrigin),
        "rosenbrock" => Box::new(Rosenbrock),
        "ackley" => Box::new(Ackley),
        "matyas" => {
            if dims != 2 {
                return Err(Error::invalid("objective", format!(
                    "matyas is defined on 2 dimensions, not {}", dims)));
            }
            Box::new(MatyasEnv(0., 0.))
        },
        _ => return Err(Error::NotCallable(name.to_string()))
    };
    Ok(objective)
}
