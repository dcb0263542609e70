//! # dopri45: Adaptive Dormand-Prince 4(5) Integrator
//!
//! An explicit embedded Runge-Kutta integrator for initial value problems
//! `y' = f(x, y)`, with exact sampling of the state at period boundaries for
//! shooting-method style searches.
//!
//! ## Features
//!
//! - 7-stage Dormand-Prince 4(5) pair, plus Euler, Heun, midpoint and RK4
//!   for fixed-step runs; any explicit embedded tableau can be
//!   supplied instead
//! - Two step-size policies:
//!   - **global norm**: accept once the Euclidean error of the embedded pair
//!     lies in `(tol/4, tol)`, with a minimum step of 1/8192
//!   - **per component**: a fixed number of refinements driven by the worst
//!     component, with a maximum step of 1/32
//! - **Period-end correction**: steps that overshoot a multiple `n*period` are
//!   replaced by one landing exactly on the boundary, and the state there is
//!   recorded
//! - Divergence guard and step observers for early exit
//! - Full trace of `(x, y, h)` for every accepted step
//!
//! ## Basic Usage
//!
//! ```rust
//! use dopri45::{IntegratorConfig, Ode, RungeKutta, Vector};
//!
//! // y' = -y, y(0) = 1
//! let ode = Ode::new(0.0, 2.0, [1.0], |_x: f64, y: &Vector| y.scale(-1.0));
//!
//! let mut rk = RungeKutta::dormand_prince(IntegratorConfig::default());
//! rk.solve(&ode, 1e-9).unwrap();
//!
//! for entry in rk.trace() {
//!     assert!((entry.y[0] - (-entry.x).exp()).abs() < 1e-6);
//! }
//! ```
//!
//! ## Periodic Problems
//!
//! ```rust
//! use dopri45::{problems::Overture, IntegratorConfig, Outcome, RungeKutta};
//!
//! // y0' = y1, y1' = 5 y1, y(0) = (1, s); one trial of a shooting search
//! let ode = Overture::new(5.0).ode(-0.05, 1.0);
//!
//! let mut rk = RungeKutta::dormand_prince(IntegratorConfig::periodic());
//! let outcome = rk.solve(&ode, 1e-9).unwrap();
//! assert!(matches!(outcome, Outcome::Completed { .. }));
//!
//! // records at x = 0 and x = 1
//! let end = rk.period_end_at(1).unwrap();
//! assert_eq!(end.x, 1.0);
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade and never installs a logger.
//!
//! ## References
//!
//! 1. Dormand, J.R. & Prince, P.J. (1980). "A family of embedded Runge-Kutta
//!    formulae". Journal of Computational and Applied Mathematics 6(1).
//!
//! 2. Hairer, E., Nørsett, S.P., & Wanner, G. (1993). "Solving
//!    Ordinary Differential Equations I: Nonstiff Problems".
//!    Springer.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod ode;
pub mod problems;
pub mod solver;
pub mod tableau;
pub mod trace;
pub mod vector;

pub use config::IntegratorConfig;
pub use controller::{GlobalNorm, PerComponent, StepControl};
pub use error::{Error, Result};
pub use events::{DivergenceGuard, EventAction, PeriodEnd, StepObserver};
pub use ode::{Ode, OdeSystem};
pub use solver::{Outcome, RungeKutta, Stats};
pub use tableau::Tableau;
pub use trace::{Trace, TraceEntry};
pub use vector::Vector;
