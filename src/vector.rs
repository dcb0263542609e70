//! Fixed-length numeric vector
//!
//! The state of an ODE system is an ordered tuple of reals whose length is
//! fixed for the lifetime of a problem. [`Vector`] is immutable: every
//! arithmetic operation returns a new vector, and combining vectors of
//! different lengths is reported as [`Error::DimensionMismatch`] instead of
//! being truncated or padded.
//!
//! Indexing is 0-based.

use std::ops::Index;

use crate::error::{Error, Result};

/// Immutable vector of `f64` values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    /// Create a vector that takes ownership of `data`
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Create a vector by copying a slice
    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            data: values.to_vec(),
        }
    }

    /// Create a zero-filled vector of length `n`
    pub fn zeros(n: usize) -> Self {
        Self { data: vec![0.0; n] }
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the vector has no components
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Component `i`, or `None` past the end
    pub fn get(&self, i: usize) -> Option<f64> {
        self.data.get(i).copied()
    }

    /// Borrow the components as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Iterate over the components
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.data.iter()
    }

    /// True if every component is finite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Element-wise sum
    ///
    /// # Errors
    /// [`Error::DimensionMismatch`] if the lengths differ.
    pub fn add(&self, other: &Vector) -> Result<Vector> {
        self.check_len(other)?;
        Ok(Vector::new(
            self.data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| a + b)
                .collect(),
        ))
    }

    /// Element-wise difference `self - other`
    ///
    /// # Errors
    /// [`Error::DimensionMismatch`] if the lengths differ.
    pub fn sub(&self, other: &Vector) -> Result<Vector> {
        self.check_len(other)?;
        Ok(Vector::new(
            self.data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| a - b)
                .collect(),
        ))
    }

    /// Multiply every component by `t`
    pub fn scale(&self, t: f64) -> Vector {
        Vector::new(self.data.iter().map(|v| v * t).collect())
    }

    /// Euclidean (L2) norm
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    fn check_len(&self, other: &Vector) -> Result<()> {
        if self.len() != other.len() {
            return Err(Error::DimensionMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }
        Ok(())
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.data[i]
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Self::new(data)
    }
}

impl<const N: usize> From<[f64; N]> for Vector {
    fn from(values: [f64; N]) -> Self {
        Self::new(values.to_vec())
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
