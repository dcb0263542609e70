//! Step-size control policies
//!
//! Both adaptive policies compare the lower- and higher-order candidate
//! states of one step and rescale `h` by `safety * (tol / err)^exponent`.
//! They differ in how the error is measured and in when they stop:
//!
//! - [`GlobalNorm`] measures one scalar error (Euclidean norm of `y4 - y5`),
//!   keeps `h` once the error lies in the band `(tol/4, tol)` and never lets
//!   `h` fall below a floor, force-accepting the floor step instead.
//! - [`PerComponent`] takes the most pessimistic factor over the state
//!   components, caps `h` from above and always runs a fixed number of
//!   refinements with no acceptance test.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::vector::Vector;

/// Global-norm policy with an acceptance band and a step floor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlobalNorm {
    /// Smallest allowed step; reaching it force-accepts the step
    pub min_step: f64,
    /// Maximum number of rescalings per step
    pub max_adjustments: usize,
    /// Safety factor applied to every rescaling
    pub safety: f64,
    /// Exponent = 1/(order + 1) of the lower-order estimate
    pub exponent: f64,
    /// Growth factor used when the error estimate is exactly zero
    pub max_growth: f64,
}

impl Default for GlobalNorm {
    fn default() -> Self {
        Self {
            min_step: 1.0 / 8192.0,
            max_adjustments: 10,
            safety: 0.8,
            exponent: 0.2,
            max_growth: 5.0,
        }
    }
}

impl GlobalNorm {
    /// True if `error` lies strictly inside `(tol/4, tol)`
    pub fn accepts(&self, error: f64, tol: f64) -> bool {
        error < tol && error > tol / 4.0
    }

    /// Step size rescaling factor for the given error
    pub fn compute_factor(&self, error: f64, tol: f64) -> f64 {
        if error == 0.0 {
            return self.max_growth;
        }
        self.safety * (tol / error).powf(self.exponent)
    }

    /// Error estimate: Euclidean norm of the difference of the candidates
    pub fn error(&self, y4: &Vector, y5: &Vector) -> f64 {
        y4.iter()
            .zip(y5.iter())
            .fold(0.0, |acc: f64, (a, b)| acc.hypot(a - b))
    }
}

/// Per-component policy with a step ceiling and a fixed refinement count
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PerComponent {
    /// Largest allowed step
    pub max_step: f64,
    /// Number of rescalings performed on every step
    pub iterations: usize,
    /// Safety factor applied to every rescaling
    pub safety: f64,
    /// Exponent applied to each component's tolerance ratio
    pub exponent: f64,
}

impl Default for PerComponent {
    fn default() -> Self {
        Self {
            max_step: 1.0 / 32.0,
            iterations: 10,
            safety: 0.8,
            exponent: 0.2,
        }
    }
}

impl PerComponent {
    /// Smallest of the per-component factors `(tol / |y4_i - y5_i|)^exponent`
    ///
    /// A component with zero discrepancy contributes `+inf`, so it never
    /// constrains the step.
    pub fn min_ratio(&self, y4: &Vector, y5: &Vector, tol: f64) -> f64 {
        y4.iter()
            .zip(y5.iter())
            .map(|(a, b)| (tol / (a - b).abs()).powf(self.exponent))
            .fold(f64::INFINITY, f64::min)
    }

    /// Next step size: `h * safety * min_ratio`, capped at `max_step`
    pub fn next_step(&self, h: f64, y4: &Vector, y5: &Vector, tol: f64) -> f64 {
        (h * self.safety * self.min_ratio(y4, y5, tol)).min(self.max_step)
    }
}

/// How the integrator adapts its step size
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StepControl {
    /// Keep the initial step for the whole run
    Fixed,
    /// Single scalar error with acceptance band and step floor
    GlobalNorm(GlobalNorm),
    /// Minimum factor over components, fixed refinement count, step ceiling
    PerComponent(PerComponent),
}

impl Default for StepControl {
    fn default() -> Self {
        StepControl::GlobalNorm(GlobalNorm::default())
    }
}
