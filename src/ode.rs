//! ODE problem definitions
//!
//! A problem is a derivative function `dy/dx = f(x, y)` together with the
//! integration domain `[x0, xn]`, the initial state and, for periodic
//! problems, the known period length.

use crate::vector::Vector;

/// System of ordinary differential equations: dy/dx = f(x, y)
///
/// Implemented for every `Fn(f64, &Vector) -> Vector`, so a closure can be
/// passed wherever a system is expected.
pub trait OdeSystem {
    /// Evaluate the right-hand side of the system
    ///
    /// # Arguments
    /// * `x` - Independent variable
    /// * `y` - Current state vector
    fn rhs(&self, x: f64, y: &Vector) -> Vector;
}

impl<F> OdeSystem for F
where
    F: Fn(f64, &Vector) -> Vector,
{
    fn rhs(&self, x: f64, y: &Vector) -> Vector {
        self(x, y)
    }
}

/// Initial value problem on `[x0, xn]`
#[derive(Debug, Clone)]
pub struct Ode<S> {
    /// Start of the domain
    pub x0: f64,
    /// End of the domain
    pub xn: f64,
    /// Initial state
    pub y0: Vector,
    /// Known period length, if the problem is periodic
    pub period: Option<f64>,
    system: S,
}

impl<S: OdeSystem> Ode<S> {
    /// Create a problem without a declared period
    pub fn new(x0: f64, xn: f64, y0: impl Into<Vector>, system: S) -> Self {
        Self {
            x0,
            xn,
            y0: y0.into(),
            period: None,
            system,
        }
    }

    /// Declare the period length
    pub fn with_period(mut self, period: f64) -> Self {
        self.period = Some(period);
        self
    }

    /// Replace the end of the domain
    pub fn with_end(mut self, xn: f64) -> Self {
        self.xn = xn;
        self
    }

    /// Dimension of the state
    pub fn dim(&self) -> usize {
        self.y0.len()
    }

    /// The derivative function
    pub fn system(&self) -> &S {
        &self.system
    }

    /// Evaluate `f(x, y)`
    pub fn eval(&self, x: f64, y: &Vector) -> Vector {
        self.system.rhs(x, y)
    }
}
