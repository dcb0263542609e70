//! Integration trace
//!
//! The integrator appends one [`TraceEntry`] per accepted step, starting
//! with the initial condition at index 0. Entries are in strictly
//! increasing `x` order.

use crate::error::{Error, Result};
use crate::vector::Vector;

/// One accepted point of the trajectory
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    /// Independent variable
    pub x: f64,
    /// State at `x`
    pub y: Vector,
    /// Step size that produced this entry (the initial step for entry 0)
    pub h: f64,
}

/// Ordered sequence of `(x, y, h)` entries produced by one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub(crate) fn start(x0: f64, y0: Vector, h0: f64) -> Self {
        Self {
            entries: vec![TraceEntry { x: x0, y: y0, h: h0 }],
        }
    }

    pub(crate) fn push(&mut self, x: f64, y: Vector, h: f64) -> &TraceEntry {
        self.entries.push(TraceEntry { x, y, h });
        &self.entries[self.entries.len() - 1]
    }

    /// Number of entries, including the initial condition
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before the first run
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in order
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Iterate over the entries
    pub fn iter(&self) -> std::slice::Iter<'_, TraceEntry> {
        self.entries.iter()
    }

    /// Last recorded entry
    pub fn last(&self) -> Option<&TraceEntry> {
        self.entries.last()
    }

    /// Entry `i`
    ///
    /// # Errors
    /// [`Error::IndexOutOfBounds`] if `i >= len()`.
    pub fn get(&self, i: usize) -> Result<&TraceEntry> {
        self.entries.get(i).ok_or(Error::IndexOutOfBounds {
            index: i,
            len: self.entries.len(),
        })
    }

    /// Independent variable of entry `i`
    pub fn x_at(&self, i: usize) -> Result<f64> {
        self.get(i).map(|e| e.x)
    }

    /// State of entry `i`
    pub fn state_at(&self, i: usize) -> Result<&Vector> {
        self.get(i).map(|e| &e.y)
    }

    /// Step size of entry `i`
    pub fn step_size_at(&self, i: usize) -> Result<f64> {
        self.get(i).map(|e| e.h)
    }

    /// Split the trace into consecutive segments, one per period.
    ///
    /// Segments close at the integer multiples `n * period`: segment `n`
    /// holds the entries with `x` in `((n-1)*period, n*period]`, and the first
    /// segment also holds the initial entry. An entry landing exactly on a
    /// boundary closes its segment. Trailing entries past the last full period
    /// form a final, shorter segment.
    pub fn split_by_period(&self, period: f64) -> Vec<&[TraceEntry]> {
        let mut segments = Vec::new();
        if period <= 0.0 || !period.is_finite() {
            if !self.entries.is_empty() {
                segments.push(&self.entries[..]);
            }
            return segments;
        }

        let mut start = 0;
        while start < self.entries.len() {
            // first boundary at or after x; the initial entry never closes a segment
            let x = self.entries[start].x;
            let mut n = (x / period).ceil();
            if x <= (n - 1.0) * period {
                n -= 1.0;
            }
            if x > n * period || (start == 0 && x == n * period) {
                n += 1.0;
            }
            let end_x = n * period;
            let taken = self.entries[start..]
                .iter()
                .take_while(|e| e.x <= end_x)
                .count();
            let end = start + taken.max(1);
            segments.push(&self.entries[start..end]);
            start = end;
        }
        segments
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a TraceEntry;
    type IntoIter = std::slice::Iter<'a, TraceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
