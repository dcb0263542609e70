//! Integrator configuration
//!
//! One [`IntegratorConfig`] covers both ways the integrator is used:
//!
//! - [`IntegratorConfig::reference`] (the default): global-norm step control
//!   with an acceptance band, a step floor, and no period bookkeeping.
//! - [`IntegratorConfig::periodic`]: per-component step control with a step
//!   ceiling, exact period-end sampling and a divergence guard on `y[0]`,
//!   for shooting-method trials.
//!
//! Fields are public; the `with_*` setters allow chained overrides.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::controller::{GlobalNorm, PerComponent, StepControl};
use crate::events::DivergenceGuard;

/// Settings for one integrator instance
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntegratorConfig {
    /// Step size of the first step
    pub initial_step: f64,
    /// Maximum number of steps before returning
    /// [`Error::MaxStepsExceeded`](crate::Error::MaxStepsExceeded)
    pub max_steps: usize,
    /// Step-size control policy
    pub step_control: StepControl,
    /// Optional early exit for diverging trajectories
    pub divergence: Option<DivergenceGuard>,
    /// Land exactly on every period boundary of a periodic problem
    pub period_correction: bool,
    /// Step size used right after a period boundary
    pub period_restart_step: f64,
}

impl IntegratorConfig {
    /// Global-norm control, starting step 1/64, no period bookkeeping
    pub fn reference() -> Self {
        Self {
            initial_step: 1.0 / 64.0,
            max_steps: 10_000_000,
            step_control: StepControl::GlobalNorm(GlobalNorm::default()),
            divergence: None,
            period_correction: false,
            period_restart_step: 1.0 / 256.0,
        }
    }

    /// Per-component control, starting step 1/512, exact period ends,
    /// abandon the run once `y[0] < -10`
    pub fn periodic() -> Self {
        Self {
            initial_step: 1.0 / 512.0,
            max_steps: 10_000_000,
            step_control: StepControl::PerComponent(PerComponent::default()),
            divergence: Some(DivergenceGuard::below(0, -10.0)),
            period_correction: true,
            period_restart_step: 1.0 / 256.0,
        }
    }

    /// Set the first step size
    pub fn with_initial_step(mut self, h: f64) -> Self {
        self.initial_step = h;
        self
    }

    /// Set the step budget
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the step-size control policy
    pub fn with_step_control(mut self, control: StepControl) -> Self {
        self.step_control = control;
        self
    }

    /// Set or clear the divergence guard
    pub fn with_divergence(mut self, guard: Option<DivergenceGuard>) -> Self {
        self.divergence = guard;
        self
    }

    /// Enable or disable period-end correction
    pub fn with_period_correction(mut self, enabled: bool) -> Self {
        self.period_correction = enabled;
        self
    }

    /// Set the step used after landing on a period boundary
    pub fn with_period_restart_step(mut self, h: f64) -> Self {
        self.period_restart_step = h;
        self
    }
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self::reference()
    }
}
