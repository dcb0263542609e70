//! Ready-made test problems
//!
//! Each problem implements [`OdeSystem`] and builds an [`Ode`] with its
//! standard initial condition and period.

use std::f64::consts::TAU;

use crate::ode::{Ode, OdeSystem};
use crate::vector::Vector;

/// Simple harmonic oscillator: `y0'' = -omega^2 * y0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicOscillator {
    /// Angular frequency
    pub omega: f64,
}

impl HarmonicOscillator {
    /// Oscillator with angular frequency `omega`
    pub fn new(omega: f64) -> Self {
        Self { omega }
    }

    /// Period `2*pi/omega`
    pub fn period(&self) -> f64 {
        TAU / self.omega
    }

    /// Problem on `[0, xn]` starting from `(1, 0)`; exact solution `(cos wx, -w sin wx)`
    pub fn ode(self, xn: f64) -> Ode<Self> {
        let period = self.period();
        Ode::new(0.0, xn, [1.0, 0.0], self).with_period(period)
    }

    /// Exact state at `x`
    pub fn exact(&self, x: f64) -> Vector {
        let (s, c) = (self.omega * x).sin_cos();
        Vector::from([c, -self.omega * s])
    }
}

impl Default for HarmonicOscillator {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl OdeSystem for HarmonicOscillator {
    fn rhs(&self, _x: f64, y: &Vector) -> Vector {
        Vector::from([y[1], -self.omega * self.omega * y[0]])
    }
}

/// Restricted three-body problem with the Arenstorf periodic orbit.
///
/// State is `(x, y, x', y')` in the rotating frame; `mu1` is the mass of the
/// smaller body (the Moon), `mu2 = 1 - mu1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenstorfOrbit {
    /// Mass ratio of the smaller body
    pub mu1: f64,
}

impl ArenstorfOrbit {
    /// Earth-Moon mass ratio
    pub const MU1: f64 = 0.012277471;
    /// Period of the standard orbit
    pub const PERIOD: f64 = 17.065_216_560_15;
    /// Standard initial state
    pub const Y0: [f64; 4] = [0.994, 0.0, 0.0, -2.001_585_106_379_082_522_405_378_622_24];

    /// Problem covering `[0, xn]` from the standard initial state
    pub fn ode(self, xn: f64) -> Ode<Self> {
        Ode::new(0.0, xn, Self::Y0, self).with_period(Self::PERIOD)
    }
}

impl Default for ArenstorfOrbit {
    fn default() -> Self {
        Self { mu1: Self::MU1 }
    }
}

impl OdeSystem for ArenstorfOrbit {
    fn rhs(&self, _x: f64, y: &Vector) -> Vector {
        let mu1 = self.mu1;
        let mu2 = 1.0 - mu1;
        let d1 = ((y[0] + mu1).powi(2) + y[1] * y[1]).powf(1.5);
        let d2 = ((y[0] - mu2).powi(2) + y[1] * y[1]).powf(1.5);
        Vector::from([
            y[2],
            y[3],
            y[0] + 2.0 * y[3] - mu2 * (y[0] + mu1) / d1 - mu1 * (y[0] - mu2) / d2,
            y[1] - 2.0 * y[2] - mu2 * y[1] / d1 - mu1 * y[1] / d2,
        ])
    }
}

/// Linear shooting problem `y0' = y1, y1' = c * y1` on unit periods.
///
/// With `y0(0) = 1` and `y1(0) = slope` the exact solution is
/// `y0(x) = 1 + slope/c * (exp(c x) - 1)`, so the sign of `y0` at the end of
/// a period tells a bisection on `slope` which half to keep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overture {
    /// Growth rate of `y1`
    pub c: f64,
}

impl Overture {
    /// Problem with growth rate `c`
    pub fn new(c: f64) -> Self {
        Self { c }
    }

    /// Trial problem on `[0, xn]` with initial slope `slope` and period 1
    pub fn ode(self, slope: f64, xn: f64) -> Ode<Self> {
        Ode::new(0.0, xn, [1.0, slope], self).with_period(1.0)
    }

    /// Exact `y0` at `x` for the given initial slope
    pub fn exact_y0(&self, slope: f64, x: f64) -> f64 {
        if self.c == 0.0 {
            1.0 + slope * x
        } else {
            1.0 + slope / self.c * (self.c * x).exp_m1()
        }
    }
}

impl OdeSystem for Overture {
    fn rhs(&self, _x: f64, y: &Vector) -> Vector {
        Vector::from([y[1], self.c * y[1]])
    }
}
