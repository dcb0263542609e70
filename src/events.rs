//! Events raised while stepping
//!
//! Three kinds of event can interrupt or annotate a run:
//!
//! - **Period ends**: the trajectory crosses `n * period`. The step that
//!   straddled the boundary is replaced by one landing exactly on it, and
//!   the state there is recorded as a [`PeriodEnd`]. Shooting methods compare
//!   these records across trial initial conditions, so the landing must be
//!   exact.
//! - **Divergence**: a watched state component leaves its allowed range.
//!   The run stops early; this is a cheap way to abandon a hopeless trial
//!   solution, not an error.
//! - **Observer callbacks**: a [`StepObserver`] sees every accepted step and
//!   every period end and may stop the run.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::trace::TraceEntry;
use crate::vector::Vector;

/// Action to take after an observer callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventAction {
    /// Keep integrating
    #[default]
    Continue,
    /// Stop the run after this step
    Stop,
}

/// Hook invoked by the integrator as the run progresses
///
/// Both methods default to [`EventAction::Continue`]; implement only the
/// ones you need. `()` is the no-op observer.
///
/// # Example
///
/// ```
/// use dopri45::{EventAction, StepObserver, TraceEntry};
///
/// // Stop as soon as the first component turns negative
/// struct FirstZero;
///
/// impl StepObserver for FirstZero {
///     fn on_step(&mut self, _index: usize, entry: &TraceEntry) -> EventAction {
///         if entry.y[0] < 0.0 {
///             EventAction::Stop
///         } else {
///             EventAction::Continue
///         }
///     }
/// }
/// ```
pub trait StepObserver {
    /// Called after step `index` has been appended to the trace
    fn on_step(&mut self, _index: usize, _entry: &TraceEntry) -> EventAction {
        EventAction::Continue
    }

    /// Called after a period-end record has been captured
    fn on_period_end(&mut self, _record: &PeriodEnd) -> EventAction {
        EventAction::Continue
    }
}

impl StepObserver for () {}

/// State snapshot at a period boundary
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodEnd {
    /// Period number `n` of the boundary `n * period`; for the initial
    /// condition, the number of the last boundary at or before `x0`
    pub period: i64,
    /// Independent variable at the boundary
    pub x: f64,
    /// State at the boundary
    pub y: Vector,
}

/// Early-exit rule for diverging trajectories
///
/// Trips when `y[component]` drops below `lower` or rises above `upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DivergenceGuard {
    /// Watched state component (0-based)
    pub component: usize,
    /// Lower bound of the allowed range
    pub lower: f64,
    /// Upper bound of the allowed range
    pub upper: f64,
}

impl DivergenceGuard {
    /// Guard that trips when `y[component] < lower`
    pub fn below(component: usize, lower: f64) -> Self {
        Self {
            component,
            lower,
            upper: f64::INFINITY,
        }
    }

    /// Guard that trips when `y[component] > upper`
    pub fn above(component: usize, upper: f64) -> Self {
        Self {
            component,
            lower: f64::NEG_INFINITY,
            upper,
        }
    }

    /// True if `y` is outside the allowed range
    pub fn is_tripped(&self, y: &Vector) -> bool {
        match y.get(self.component) {
            Some(v) => v < self.lower || v > self.upper,
            None => false,
        }
    }
}

/// Bookkeeping for period boundaries during one run
///
/// Boundaries are the integer multiples `n * period` that lie strictly after
/// the start of the run.
#[derive(Debug, Clone)]
pub(crate) struct PeriodTracker {
    period: f64,
    next: i64,
    records: Vec<PeriodEnd>,
}

impl PeriodTracker {
    /// Start tracking at `x0`; the initial state is the first record
    pub(crate) fn new(x0: f64, y0: &Vector, period: f64) -> Self {
        let start = (x0 / period).floor() as i64;
        let mut next = start + 1;
        // x0 / period may round below an exact multiple
        while next as f64 * period <= x0 {
            next += 1;
        }
        Self {
            period,
            next,
            records: vec![PeriodEnd {
                period: next - 1,
                x: x0,
                y: y0.clone(),
            }],
        }
    }

    /// Next boundary to be crossed
    pub(crate) fn boundary(&self) -> f64 {
        self.next as f64 * self.period
    }

    /// True if `x` has reached or advanced past the next boundary
    pub(crate) fn reached(&self, x: f64) -> bool {
        x >= self.boundary()
    }

    /// Record the state at the current boundary and move on to the next one
    pub(crate) fn record(&mut self, y: Vector) -> &PeriodEnd {
        let x = self.boundary();
        self.records.push(PeriodEnd {
            period: self.next,
            x,
            y,
        });
        self.next += 1;
        &self.records[self.records.len() - 1]
    }

    pub(crate) fn into_records(self) -> Vec<PeriodEnd> {
        self.records
    }
}
