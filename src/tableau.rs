//! Embedded Runge-Kutta tableaus
//!
//! An explicit `s`-stage method is defined by a strictly lower-triangular
//! `s×s` matrix `A`, two weight vectors `b4`, `b5` producing a lower- and a
//! higher-order estimate from the same stages, and the node vector `c`.
//!
//! The Dormand-Prince 4(5) coefficients are from:
//! Dormand, J.R. & Prince, P.J. (1980). "A family of embedded Runge-Kutta
//! formulae". J. Comput. Appl. Math. 6 (1), 19-26.

use crate::error::{Error, Result};

/// Number of stages in the Dormand-Prince 4(5) method
pub const DP_STAGES: usize = 7;

/// Dormand-Prince stage matrix (a_ij)
///
/// Row 6 repeats the 5th-order weights (first-same-as-last), so the last
/// stage is evaluated at the accepted solution.
pub const DP_A: [[f64; DP_STAGES]; DP_STAGES] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
        0.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
        0.0,
        0.0,
    ],
    [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
        0.0,
    ],
];

/// Weights of the 4th-order estimate
pub const DP_B4: [f64; DP_STAGES] = [
    5179.0 / 57600.0,
    0.0,
    7571.0 / 16695.0,
    393.0 / 640.0,
    -92097.0 / 339200.0,
    187.0 / 2100.0,
    1.0 / 40.0,
];

/// Weights of the 5th-order estimate (the accepted solution)
pub const DP_B5: [f64; DP_STAGES] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
];

/// Node coefficients (c_i): stage i is evaluated at x + c[i]*h
pub const DP_C: [f64; DP_STAGES] = [0.0, 0.2, 0.3, 0.8, 8.0 / 9.0, 1.0, 1.0];

/// Validated embedded Runge-Kutta tableau
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    a: Vec<Vec<f64>>,
    b4: Vec<f64>,
    b5: Vec<f64>,
    c: Vec<f64>,
}

impl Tableau {
    /// Build a tableau from explicit coefficient arrays.
    ///
    /// # Errors
    /// [`Error::InvalidTableau`] if `A` is not square, if its size does not
    /// match `c`, `b4` and `b5`, or if it has a non-zero entry on or above
    /// the diagonal.
    pub fn new(a: Vec<Vec<f64>>, b4: Vec<f64>, b5: Vec<f64>, c: Vec<f64>) -> Result<Self> {
        let s = a.len();
        if s == 0 {
            return Err(Error::invalid_tableau("stage matrix has no rows"));
        }
        if let Some((i, row)) = a.iter().enumerate().find(|(_, row)| row.len() != s) {
            return Err(Error::invalid_tableau(format!(
                "stage matrix is not square: row {} has {} columns, expected {}",
                i,
                row.len(),
                s
            )));
        }
        if c.len() != s {
            return Err(Error::invalid_tableau(format!(
                "node vector has length {}, expected {}",
                c.len(),
                s
            )));
        }
        if b4.len() != s {
            return Err(Error::invalid_tableau(format!(
                "lower-order weights have length {}, expected {}",
                b4.len(),
                s
            )));
        }
        if b5.len() != s {
            return Err(Error::invalid_tableau(format!(
                "higher-order weights have length {}, expected {}",
                b5.len(),
                s
            )));
        }
        for (i, row) in a.iter().enumerate() {
            if let Some(j) = (i..s).find(|&j| row[j] != 0.0) {
                return Err(Error::invalid_tableau(format!(
                    "method is not explicit: a[{}][{}] = {}",
                    i, j, row[j]
                )));
            }
        }
        Ok(Self { a, b4, b5, c })
    }

    /// The Dormand-Prince 4(5) tableau
    pub fn dormand_prince() -> Self {
        Self {
            a: DP_A.iter().map(|row| row.to_vec()).collect(),
            b4: DP_B4.to_vec(),
            b5: DP_B5.to_vec(),
            c: DP_C.to_vec(),
        }
    }

    /// Forward Euler, first order
    ///
    /// Both weight vectors are the same, so the embedded error estimate is
    /// always zero; use it with [`StepControl::Fixed`](crate::StepControl::Fixed).
    pub fn euler() -> Self {
        Self {
            a: vec![vec![0.0]],
            b4: vec![1.0],
            b5: vec![1.0],
            c: vec![0.0],
        }
    }

    /// Improved Euler (Heun), second order, with forward Euler embedded
    pub fn heun() -> Self {
        Self {
            a: vec![vec![0.0, 0.0], vec![1.0, 0.0]],
            b4: vec![1.0, 0.0],
            b5: vec![0.5, 0.5],
            c: vec![0.0, 1.0],
        }
    }

    /// Explicit midpoint, second order, with forward Euler embedded
    pub fn midpoint() -> Self {
        Self {
            a: vec![vec![0.0, 0.0], vec![0.5, 0.0]],
            b4: vec![1.0, 0.0],
            b5: vec![0.0, 1.0],
            c: vec![0.0, 0.5],
        }
    }

    /// Classic fourth-order Runge-Kutta
    ///
    /// No embedded pair: both weight vectors are the same.
    pub fn rk4() -> Self {
        let b = vec![1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0];
        Self {
            a: vec![
                vec![0.0, 0.0, 0.0, 0.0],
                vec![0.5, 0.0, 0.0, 0.0],
                vec![0.0, 0.5, 0.0, 0.0],
                vec![0.0, 0.0, 1.0, 0.0],
            ],
            b4: b.clone(),
            b5: b,
            c: vec![0.0, 0.5, 0.5, 1.0],
        }
    }

    /// Number of stages
    pub fn stages(&self) -> usize {
        self.c.len()
    }

    /// Stage coefficient a_ij
    pub fn a(&self, i: usize, j: usize) -> f64 {
        self.a[i][j]
    }

    /// Lower-order weights
    pub fn b4(&self) -> &[f64] {
        &self.b4
    }

    /// Higher-order weights
    pub fn b5(&self) -> &[f64] {
        &self.b5
    }

    /// Nodes
    pub fn c(&self) -> &[f64] {
        &self.c
    }
}

impl Default for Tableau {
    fn default() -> Self {
        Self::dormand_prince()
    }
}
