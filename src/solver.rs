//! Adaptive embedded Runge-Kutta integrator
//!
//! One integrator drives every use of the crate. The tableau fixes the
//! method (Dormand-Prince 4(5) by default); the [`IntegratorConfig`] fixes
//! how the step size is controlled, whether period boundaries are sampled
//! exactly, and when a diverging trajectory is abandoned.
//!
//! Each step evaluates all stages, forms the lower- and higher-order
//! candidates, lets the step-control policy rescale `h` (recomputing the
//! stages after every rescaling), then accepts the higher-order candidate.

use crate::config::IntegratorConfig;
use crate::controller::StepControl;
use crate::error::{Error, Result};
use crate::events::{EventAction, PeriodEnd, PeriodTracker, StepObserver};
use crate::ode::{Ode, OdeSystem};
use crate::tableau::Tableau;
use crate::trace::Trace;
use crate::vector::Vector;

/// Integration statistics for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// Total number of derivative evaluations
    pub fn_evals: u64,
    /// Number of accepted steps
    pub accepted_steps: u64,
    /// Number of step-size rescalings
    pub step_adjustments: u64,
    /// Steps force-accepted at the global-norm step floor
    pub floor_hits: u64,
    /// Steps replaced by a landing step on a period boundary
    pub period_corrections: u64,
}

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// The end of the domain was reached
    Completed {
        /// Last recorded independent variable (`>= xn`)
        x: f64,
    },
    /// The divergence guard tripped; the offending step was not recorded
    Diverged {
        /// Independent variable of the rejected step
        x: f64,
    },
    /// An observer asked to stop
    Stopped {
        /// Last recorded independent variable
        x: f64,
    },
}

impl Outcome {
    /// True if the end of the domain was reached
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed { .. })
    }
}

/// Embedded Runge-Kutta integrator
///
/// # Example
/// ```
/// use dopri45::{IntegratorConfig, Ode, RungeKutta, Vector};
///
/// // Harmonic oscillator: y'' = -y
/// let ode = Ode::new(0.0, std::f64::consts::TAU, [1.0, 0.0], |_x: f64, y: &Vector| {
///     Vector::from([y[1], -y[0]])
/// });
///
/// let mut rk = RungeKutta::dormand_prince(IntegratorConfig::reference());
/// let outcome = rk.solve(&ode, 1e-10).unwrap();
/// assert!(outcome.is_completed());
///
/// let last = rk.trace().last().unwrap();
/// assert!((last.y[0] - last.x.cos()).abs() < 1e-7);
/// ```
#[derive(Debug, Clone)]
pub struct RungeKutta {
    tableau: Tableau,
    /// Integrator settings, read at the start of every run
    pub config: IntegratorConfig,
    /// Stage evaluations of the current step
    k: Vec<Vector>,
    trace: Trace,
    period_ends: Vec<PeriodEnd>,
    /// Statistics of the last run
    pub stats: Stats,
}

impl RungeKutta {
    /// Create an integrator for the given method
    pub fn new(tableau: Tableau, config: IntegratorConfig) -> Self {
        let stages = tableau.stages();
        Self {
            tableau,
            config,
            k: Vec::with_capacity(stages),
            trace: Trace::default(),
            period_ends: Vec::new(),
            stats: Stats::default(),
        }
    }

    /// Create a Dormand-Prince 4(5) integrator
    pub fn dormand_prince(config: IntegratorConfig) -> Self {
        Self::new(Tableau::dormand_prince(), config)
    }

    /// The method's coefficients
    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    /// Integrate `ode` with the given tolerance.
    ///
    /// The trace and the period-end records are rebuilt from scratch.
    ///
    /// # Returns
    /// * `Ok(Outcome::Completed)` once the last recorded `x >= ode.xn`
    /// * `Ok(Outcome::Diverged)` if the divergence guard tripped
    /// * `Err(Error::MaxStepsExceeded)` if the step budget ran out first
    /// * `Err(_)` for invalid input or a non-finite step or state
    pub fn solve<S: OdeSystem>(&mut self, ode: &Ode<S>, tol: f64) -> Result<Outcome> {
        self.solve_with_observer(ode, tol, &mut ())
    }

    /// Integrate `ode`, reporting every accepted step and every period end
    /// to `observer`, which may stop the run early.
    pub fn solve_with_observer<S, O>(
        &mut self,
        ode: &Ode<S>,
        tol: f64,
        observer: &mut O,
    ) -> Result<Outcome>
    where
        S: OdeSystem,
        O: StepObserver,
    {
        self.validate_inputs(ode, tol)?;

        self.stats = Stats::default();
        self.trace = Trace::start(ode.x0, ode.y0.clone(), self.config.initial_step);
        self.period_ends.clear();

        let mut tracker = match (self.config.period_correction, ode.period) {
            (true, Some(period)) => Some(PeriodTracker::new(ode.x0, &ode.y0, period)),
            _ => None,
        };

        log::debug!(
            "solve: x in [{}, {}], dim = {}, tol = {:e}, stages = {}",
            ode.x0,
            ode.xn,
            ode.dim(),
            tol,
            self.tableau.stages()
        );

        let result = if ode.x0 >= ode.xn {
            Ok(Outcome::Completed { x: ode.x0 })
        } else {
            self.run(ode, tol, observer, tracker.as_mut())
        };

        if let Some(tracker) = tracker {
            self.period_ends = tracker.into_records();
        }

        if let Ok(outcome) = &result {
            log::debug!(
                "solve finished: {:?}, {} entries, {} period ends, {:?}",
                outcome,
                self.trace.len(),
                self.period_ends.len(),
                self.stats
            );
        }
        result
    }

    /// Step loop; the trace already holds the initial condition
    fn run<S, O>(
        &mut self,
        ode: &Ode<S>,
        tol: f64,
        observer: &mut O,
        mut tracker: Option<&mut PeriodTracker>,
    ) -> Result<Outcome>
    where
        S: OdeSystem,
        O: StepObserver,
    {
        let mut x = ode.x0;
        let mut y = ode.y0.clone();
        let mut h = self.config.initial_step;

        for _ in 0..self.config.max_steps {
            self.compute_stages(ode, x, &y, h)?;
            self.control_step(ode, x, &y, &mut h, tol)?;

            let mut x_new = x + h;
            let mut y_new = self.compute_solution(&y, h, false)?;
            if !y_new.is_finite() {
                return Err(Error::NonFiniteState { x: x_new });
            }

            if let Some(guard) = &self.config.divergence {
                if guard.is_tripped(&y_new) {
                    log::info!(
                        "divergence guard tripped at x = {} (y[{}] = {})",
                        x_new,
                        guard.component,
                        y_new[guard.component]
                    );
                    return Ok(Outcome::Diverged { x: x_new });
                }
            }

            // Replace a step that overshoots the next period boundary by one
            // that lands on it exactly.
            let mut landed = false;
            if let Some(tracker) = tracker.as_deref_mut() {
                if tracker.reached(x_new) {
                    let boundary = tracker.boundary();
                    if x_new > boundary {
                        h = boundary - x;
                        self.compute_stages(ode, x, &y, h)?;
                        y_new = self.compute_solution(&y, h, false)?;
                        if !y_new.is_finite() {
                            return Err(Error::NonFiniteState { x: boundary });
                        }
                        self.stats.period_corrections += 1;
                        log::trace!("landing on period boundary x = {} with h = {:e}", boundary, h);
                    }
                    x_new = boundary;
                    landed = true;
                }
            }

            x = x_new;
            y = y_new;
            self.stats.accepted_steps += 1;

            let index = self.trace.len();
            let entry = self.trace.push(x, y.clone(), h);
            let mut action = observer.on_step(index, entry);

            if landed {
                if let Some(tracker) = tracker.as_deref_mut() {
                    let record = tracker.record(y.clone());
                    if observer.on_period_end(record) == EventAction::Stop {
                        action = EventAction::Stop;
                    }
                }
                h = self.config.period_restart_step;
            }

            if x >= ode.xn {
                return Ok(Outcome::Completed { x });
            }
            if action == EventAction::Stop {
                return Ok(Outcome::Stopped { x });
            }
        }

        log::warn!(
            "step budget of {} exhausted at x = {} before reaching {}",
            self.config.max_steps,
            x,
            ode.xn
        );
        Err(Error::MaxStepsExceeded {
            steps: self.config.max_steps,
            x,
        })
    }

    /// Rescale `h` according to the configured policy.
    ///
    /// Expects the stages for `(x, y, h)` to be current and leaves them
    /// current for the returned `h`.
    fn control_step<S: OdeSystem>(
        &mut self,
        ode: &Ode<S>,
        x: f64,
        y: &Vector,
        h: &mut f64,
        tol: f64,
    ) -> Result<()> {
        match self.config.step_control {
            StepControl::Fixed => {}
            StepControl::GlobalNorm(policy) => {
                for _ in 0..policy.max_adjustments {
                    let y4 = self.compute_solution(y, *h, true)?;
                    let y5 = self.compute_solution(y, *h, false)?;
                    let error = policy.error(&y4, &y5);
                    if policy.accepts(error, tol) {
                        break;
                    }

                    *h *= policy.compute_factor(error, tol);
                    self.stats.step_adjustments += 1;
                    if *h < policy.min_step {
                        *h = policy.min_step;
                        self.stats.floor_hits += 1;
                        log::debug!(
                            "step floor {:e} reached at x = {} (error {:e}, tol {:e})",
                            policy.min_step,
                            x,
                            error,
                            tol
                        );
                        self.compute_stages(ode, x, y, *h)?;
                        break;
                    }
                    check_step(x, *h)?;
                    self.compute_stages(ode, x, y, *h)?;
                }
            }
            StepControl::PerComponent(policy) => {
                // No acceptance test: always refine a fixed number of times.
                for _ in 0..policy.iterations {
                    let y4 = self.compute_solution(y, *h, true)?;
                    let y5 = self.compute_solution(y, *h, false)?;
                    *h = policy.next_step(*h, &y4, &y5, tol);
                    self.stats.step_adjustments += 1;
                    check_step(x, *h)?;
                    self.compute_stages(ode, x, y, *h)?;
                }
            }
        }
        check_step(x, *h)
    }

    /// Compute all stages: k_i = f(x + c_i*h, y + h * sum_{j<i} a_ij * k_j)
    fn compute_stages<S: OdeSystem>(
        &mut self,
        ode: &Ode<S>,
        x: f64,
        y: &Vector,
        h: f64,
    ) -> Result<()> {
        self.k.clear();
        for i in 0..self.tableau.stages() {
            let mut y_tmp = y.clone();
            for j in 0..i {
                let a_ij = self.tableau.a(i, j);
                if a_ij != 0.0 {
                    y_tmp = y_tmp.add(&self.k[j].scale(h * a_ij))?;
                }
            }
            let k_i = ode.eval(x + self.tableau.c()[i] * h, &y_tmp);
            if k_i.len() != y.len() {
                return Err(Error::DimensionMismatch {
                    expected: y.len(),
                    found: k_i.len(),
                });
            }
            self.k.push(k_i);
        }
        self.stats.fn_evals += self.tableau.stages() as u64;
        Ok(())
    }

    /// Combine the stages with the lower-order (`b4`) or higher-order (`b5`)
    /// weights: y + h * sum_i b_i * k_i
    fn compute_solution(&self, y: &Vector, h: f64, lower_order: bool) -> Result<Vector> {
        let weights = if lower_order {
            self.tableau.b4()
        } else {
            self.tableau.b5()
        };
        let mut y_new = y.clone();
        for (k_i, &b_i) in self.k.iter().zip(weights) {
            if b_i != 0.0 {
                y_new = y_new.add(&k_i.scale(h * b_i))?;
            }
        }
        Ok(y_new)
    }

    /// Validate integration inputs
    fn validate_inputs<S: OdeSystem>(&self, ode: &Ode<S>, tol: f64) -> Result<()> {
        if !tol.is_finite() || tol <= 0.0 {
            return Err(Error::invalid_input("tolerance must be positive and finite"));
        }
        if !ode.x0.is_finite() || !ode.xn.is_finite() {
            return Err(Error::invalid_input("x0 and xn must be finite"));
        }
        if ode.xn < ode.x0 {
            return Err(Error::invalid_input(format!(
                "xn ({}) must not precede x0 ({})",
                ode.xn, ode.x0
            )));
        }
        if ode.y0.is_empty() {
            return Err(Error::invalid_input("y0 must have at least one component"));
        }
        if let Some(i) = ode.y0.iter().position(|v| !v.is_finite()) {
            return Err(Error::invalid_input(format!("y0[{}] is not finite", i)));
        }
        if let Some(period) = ode.period {
            if !period.is_finite() || period <= 0.0 {
                return Err(Error::invalid_input("period must be positive and finite"));
            }
        }

        let cfg = &self.config;
        if !cfg.initial_step.is_finite() || cfg.initial_step <= 0.0 {
            return Err(Error::invalid_input("initial step must be positive and finite"));
        }
        if cfg.period_correction
            && (!cfg.period_restart_step.is_finite() || cfg.period_restart_step <= 0.0)
        {
            return Err(Error::invalid_input(
                "period restart step must be positive and finite",
            ));
        }
        match cfg.step_control {
            StepControl::GlobalNorm(p) if !(p.min_step > 0.0 && p.min_step.is_finite()) => {
                return Err(Error::invalid_input("step floor must be positive and finite"));
            }
            StepControl::PerComponent(p) if !(p.max_step > 0.0) => {
                return Err(Error::invalid_input("step ceiling must be positive"));
            }
            _ => {}
        }
        if let Some(guard) = &cfg.divergence {
            if guard.component >= ode.dim() {
                return Err(Error::invalid_input(format!(
                    "divergence guard watches y[{}] but the state has {} components",
                    guard.component,
                    ode.dim()
                )));
            }
        }
        Ok(())
    }

    /// Number of trace entries, including the initial condition
    pub fn step_count(&self) -> usize {
        self.trace.len()
    }

    /// Independent variable of trace entry `i`
    pub fn x_at(&self, i: usize) -> Result<f64> {
        self.trace.x_at(i)
    }

    /// State of trace entry `i`
    pub fn state_at(&self, i: usize) -> Result<&Vector> {
        self.trace.state_at(i)
    }

    /// Step size that produced trace entry `i`
    pub fn step_size_at(&self, i: usize) -> Result<f64> {
        self.trace.step_size_at(i)
    }

    /// Statistics of the last run
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Trace of the last run
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Period-end records of the last run, in order
    ///
    /// Empty unless period correction is enabled and the problem declares a
    /// period. Record 0 is the initial condition.
    pub fn period_ends(&self) -> &[PeriodEnd] {
        &self.period_ends
    }

    /// Period-end record `i`
    pub fn period_end_at(&self, i: usize) -> Result<&PeriodEnd> {
        self.period_ends.get(i).ok_or(Error::IndexOutOfBounds {
            index: i,
            len: self.period_ends.len(),
        })
    }
}

fn check_step(x: f64, h: f64) -> Result<()> {
    if h.is_finite() && h > 0.0 {
        Ok(())
    } else {
        Err(Error::StepNotFinite { x, h })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{GlobalNorm, PerComponent};
    use crate::events::DivergenceGuard;
    use crate::trace::TraceEntry;
    use std::f64::consts::PI;

    fn harmonic(xn: f64) -> Ode<impl OdeSystem> {
        Ode::new(0.0, xn, [1.0, 0.0], |_x: f64, y: &Vector| {
            Vector::from([y[1], -y[0]])
        })
    }

    #[test]
    fn test_harmonic_oscillator() {
        let ode = harmonic(2.0 * PI);
        let mut rk = RungeKutta::dormand_prince(IntegratorConfig::reference());

        let outcome = rk.solve(&ode, 1e-10).unwrap();
        assert!(outcome.is_completed(), "outcome = {:?}", outcome);

        let last = rk.trace().last().unwrap();
        assert!(last.x >= 2.0 * PI);
        assert!(
            (last.y[0] - last.x.cos()).abs() < 1e-7,
            "y(x) = {}, expected {}",
            last.y[0],
            last.x.cos()
        );
        assert!((last.y[1] + last.x.sin()).abs() < 1e-7);

        println!("Stats: {:?}", rk.stats);
    }

    #[test]
    fn test_exponential_growth() {
        // y' = y, y(0) = 1, exact y = exp(x)
        let ode = Ode::new(0.0, 1.0, [1.0], |_x: f64, y: &Vector| y.clone());
        let mut rk = RungeKutta::dormand_prince(IntegratorConfig::reference());
        rk.solve(&ode, 1e-10).unwrap();

        let last = rk.trace().last().unwrap();
        let exact = last.x.exp();
        let rel_error = (last.y[0] - exact).abs() / exact;
        assert!(rel_error < 1e-8, "Relative error {} too large", rel_error);
    }

    #[test]
    fn test_initial_entry() {
        let ode = harmonic(1.0);
        let mut rk = RungeKutta::dormand_prince(IntegratorConfig::reference());
        rk.solve(&ode, 1e-8).unwrap();

        assert_eq!(rk.x_at(0).unwrap(), 0.0);
        assert_eq!(rk.state_at(0).unwrap(), &Vector::from([1.0, 0.0]));
        assert_eq!(rk.step_size_at(0).unwrap(), 1.0 / 64.0);
        assert!(rk.x_at(rk.step_count()).is_err());
    }

    #[test]
    fn test_fixed_step_is_exact_for_linear() {
        // y' = 1 is integrated exactly by any consistent method
        let ode = Ode::new(0.0, 1.0, [0.0], |_x: f64, _y: &Vector| Vector::from([1.0]));
        let config = IntegratorConfig::reference()
            .with_step_control(StepControl::Fixed)
            .with_initial_step(0.125);
        let mut rk = RungeKutta::dormand_prince(config);
        rk.solve(&ode, 1e-6).unwrap();

        assert_eq!(rk.step_count(), 9);
        for (i, entry) in rk.trace().iter().enumerate() {
            assert_eq!(entry.x, i as f64 * 0.125);
            assert_eq!(entry.h, 0.125);
            assert!((entry.y[0] - entry.x).abs() < 1e-15);
        }
        assert_eq!(rk.stats.step_adjustments, 0);
        assert_eq!(rk.stats.fn_evals, 8 * 7);
    }

    #[test]
    fn test_custom_tableau() {
        // Heun-Euler 1(2) embedded pair
        let tableau = Tableau::new(
            vec![vec![0.0, 0.0], vec![1.0, 0.0]],
            vec![1.0, 0.0],
            vec![0.5, 0.5],
            vec![0.0, 1.0],
        )
        .unwrap();
        let config = IntegratorConfig::reference()
            .with_step_control(StepControl::Fixed)
            .with_initial_step(1e-3);
        let mut rk = RungeKutta::new(tableau, config);

        let ode = Ode::new(0.0, 1.0, [1.0], |_x: f64, y: &Vector| y.scale(-1.0));
        rk.solve(&ode, 1e-6).unwrap();

        let last = rk.trace().last().unwrap();
        assert!((last.y[0] - (-last.x).exp()).abs() < 1e-6);
        assert_eq!(rk.tableau().stages(), 2);
    }

    #[test]
    fn test_global_norm_floor_is_observable() {
        // fast decay keeps the local error well above roundoff at the floor
        let ode = Ode::new(0.0, 0.01, [1.0], |_x: f64, y: &Vector| y.scale(-1000.0));
        let mut rk = RungeKutta::dormand_prince(IntegratorConfig::reference());
        let outcome = rk.solve(&ode, 1e-20).unwrap();
        assert!(outcome.is_completed());

        let floor = 1.0 / 8192.0;
        assert!(rk.stats.floor_hits > 0);
        assert_eq!(rk.stats.floor_hits, rk.stats.accepted_steps);
        for entry in rk.trace().iter().skip(1) {
            assert_eq!(entry.h, floor);
        }
    }

    #[test]
    fn test_global_norm_steps_stay_in_band() {
        let ode = harmonic(2.0 * PI);
        let mut rk = RungeKutta::dormand_prince(IntegratorConfig::reference());
        rk.solve(&ode, 1e-8).unwrap();

        assert_eq!(rk.stats.floor_hits, 0);
        // rescaling converges quickly, far below the budget of 10 per step
        assert!(
            rk.stats.step_adjustments < 4 * rk.stats.accepted_steps,
            "adjustments = {}, steps = {}",
            rk.stats.step_adjustments,
            rk.stats.accepted_steps
        );
    }

    #[test]
    fn test_per_component_refines_fixed_number_of_times() {
        let ode = harmonic(1.0);
        let config = IntegratorConfig::periodic().with_divergence(None);
        let mut rk = RungeKutta::dormand_prince(config);
        rk.solve(&ode, 1e-9).unwrap();

        assert_eq!(rk.stats.step_adjustments, 10 * rk.stats.accepted_steps);
        // every refinement recomputes all seven stages
        assert_eq!(rk.stats.fn_evals, 11 * 7 * rk.stats.accepted_steps);
        for entry in rk.trace().iter() {
            assert!(entry.h <= 1.0 / 32.0);
        }
    }

    #[test]
    fn test_max_steps_exceeded() {
        let ode = harmonic(100.0);
        let mut rk = RungeKutta::dormand_prince(IntegratorConfig::reference().with_max_steps(5));

        let result = rk.solve(&ode, 1e-8);
        assert!(
            matches!(result, Err(Error::MaxStepsExceeded { steps: 5, .. })),
            "Expected MaxStepsExceeded, got {:?}",
            result
        );
        // the partial trace is still available
        assert_eq!(rk.step_count(), 6);
    }

    #[test]
    fn test_period_end_correction() {
        let ode = harmonic(4.0 * PI + 0.5).with_period(2.0 * PI);
        let mut rk = RungeKutta::dormand_prince(IntegratorConfig::periodic());
        rk.solve(&ode, 1e-10).unwrap();

        let ends = rk.period_ends();
        assert_eq!(ends.len(), 3);
        for (n, rec) in ends.iter().enumerate() {
            assert_eq!(rec.period, n as i64);
            assert!((rec.x - n as f64 * 2.0 * PI).abs() < 1e-9);
            assert!((rec.y[0] - 1.0).abs() < 1e-6, "y0 at period {} = {}", n, rec.y[0]);
            assert!(rec.y[1].abs() < 1e-6, "y1 at period {} = {}", n, rec.y[1]);
        }
        assert_eq!(rk.stats.period_corrections, 2);

        // the landing entry carries the shortened step
        let idx = rk
            .trace()
            .iter()
            .position(|e| e.x == 2.0 * PI)
            .expect("boundary entry");
        let h_land = rk.step_size_at(idx).unwrap();
        assert!((rk.x_at(idx - 1).unwrap() + h_land - 2.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_period_ends_on_multiples_with_offset_start() {
        let ode = Ode::new(0.5, 3.0, [0.5f64.cos(), -0.5f64.sin()], |_x: f64, y: &Vector| {
            Vector::from([y[1], -y[0]])
        })
        .with_period(1.0);
        let mut rk = RungeKutta::dormand_prince(IntegratorConfig::periodic());
        rk.solve(&ode, 1e-10).unwrap();

        let xs: Vec<f64> = rk.period_ends().iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![0.5, 1.0, 2.0, 3.0]);
        let numbers: Vec<i64> = rk.period_ends().iter().map(|r| r.period).collect();
        assert_eq!(numbers, vec![0, 1, 2, 3]);
        for rec in &rk.period_ends()[1..] {
            assert!((rec.y[0] - rec.x.cos()).abs() < 1e-7);
        }
    }

    #[test]
    fn test_landing_step_checks_state() {
        // steps of 0.3 never sample near x = 1; only the landing step does
        let ode = Ode::new(0.0, 2.0, [0.0], |x: f64, _y: &Vector| {
            if x > 0.999 && x < 1.01 {
                Vector::from([f64::INFINITY])
            } else {
                Vector::from([1.0])
            }
        })
        .with_period(1.0);
        let config = IntegratorConfig::periodic()
            .with_step_control(StepControl::Fixed)
            .with_initial_step(0.3);
        let mut rk = RungeKutta::dormand_prince(config);
        assert_eq!(rk.solve(&ode, 1e-6), Err(Error::NonFiniteState { x: 1.0 }));
    }

    #[test]
    fn test_period_correction_needs_period() {
        let ode = harmonic(1.0);
        let mut rk = RungeKutta::dormand_prince(IntegratorConfig::periodic());
        rk.solve(&ode, 1e-8).unwrap();
        assert!(rk.period_ends().is_empty());
        assert!(rk.period_end_at(0).is_err());
    }

    #[test]
    fn test_boundary_hit_exactly_is_not_shortened() {
        // fixed steps of 1/4 land on the boundary x = 1 without correction
        let ode = Ode::new(0.0, 2.0, [0.0], |_x: f64, _y: &Vector| Vector::from([1.0]))
            .with_period(1.0);
        let config = IntegratorConfig::periodic()
            .with_step_control(StepControl::Fixed)
            .with_initial_step(0.25)
            .with_period_restart_step(0.25);
        let mut rk = RungeKutta::dormand_prince(config);
        rk.solve(&ode, 1e-6).unwrap();

        assert_eq!(rk.stats.period_corrections, 0);
        let xs: Vec<f64> = rk.period_ends().iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
        for w in rk.trace().entries().windows(2) {
            assert!(w[1].x > w[0].x);
        }
    }

    #[test]
    fn test_divergence_stops_run() {
        // y0' = y1, y1' = 5 y1 with a steep negative slope
        let ode = Ode::new(0.0, 1.0, [1.0, -5.0], |_x: f64, y: &Vector| {
            Vector::from([y[1], 5.0 * y[1]])
        })
        .with_period(1.0);
        let mut rk = RungeKutta::dormand_prince(IntegratorConfig::periodic());
        let outcome = rk.solve(&ode, 1e-9).unwrap();

        match outcome {
            Outcome::Diverged { x } => assert!(x < 1.0, "diverged at {}", x),
            other => panic!("expected divergence, got {:?}", other),
        }
        let last = rk.trace().last().unwrap();
        assert!(last.x < 1.0);
        assert!(last.y[0] >= -10.0);
        assert_eq!(rk.period_ends().len(), 1);
    }

    #[test]
    fn test_divergence_guard_component_validated() {
        let ode = harmonic(1.0);
        let config = IntegratorConfig::reference().with_divergence(Some(DivergenceGuard::below(2, 0.0)));
        let mut rk = RungeKutta::dormand_prince(config);
        assert!(matches!(rk.solve(&ode, 1e-8), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_observer_stop() {
        struct StopAfter(usize);
        impl StepObserver for StopAfter {
            fn on_step(&mut self, index: usize, _entry: &TraceEntry) -> EventAction {
                if index >= self.0 {
                    EventAction::Stop
                } else {
                    EventAction::Continue
                }
            }
        }

        let ode = harmonic(10.0);
        let mut rk = RungeKutta::dormand_prince(IntegratorConfig::reference());
        let outcome = rk.solve_with_observer(&ode, 1e-8, &mut StopAfter(3)).unwrap();
        assert!(matches!(outcome, Outcome::Stopped { .. }));
        assert_eq!(rk.step_count(), 4);
    }

    #[test]
    fn test_observer_sees_period_ends() {
        #[derive(Default)]
        struct Collect {
            steps: usize,
            ends: Vec<f64>,
        }
        impl StepObserver for Collect {
            fn on_step(&mut self, _index: usize, _entry: &TraceEntry) -> EventAction {
                self.steps += 1;
                EventAction::Continue
            }
            fn on_period_end(&mut self, record: &PeriodEnd) -> EventAction {
                self.ends.push(record.x);
                EventAction::Continue
            }
        }

        let ode = harmonic(3.0).with_period(1.0);
        let mut rk = RungeKutta::dormand_prince(IntegratorConfig::periodic());
        let mut obs = Collect::default();
        rk.solve_with_observer(&ode, 1e-8, &mut obs).unwrap();

        assert_eq!(obs.steps, rk.step_count() - 1);
        assert_eq!(obs.ends, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_rerun_resets_results() {
        let mut rk = RungeKutta::dormand_prince(IntegratorConfig::periodic());
        rk.solve(&harmonic(3.0).with_period(1.0), 1e-8).unwrap();
        assert_eq!(rk.period_ends().len(), 4);

        rk.solve(&harmonic(1.5).with_period(1.0), 1e-8).unwrap();
        assert_eq!(rk.period_ends().len(), 2);
        assert!(rk.trace().last().unwrap().x < 2.0);
    }

    #[test]
    fn test_zero_length_integration() {
        let ode = Ode::new(5.0, 5.0, [42.0], |_x: f64, _y: &Vector| Vector::from([1.0]));
        let mut rk = RungeKutta::dormand_prince(IntegratorConfig::reference());
        let outcome = rk.solve(&ode, 1e-8).unwrap();
        assert_eq!(outcome, Outcome::Completed { x: 5.0 });
        assert_eq!(rk.step_count(), 1);
        assert_eq!(rk.stats.fn_evals, 0);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut rk = RungeKutta::dormand_prince(IntegratorConfig::reference());
        let f = |_x: f64, y: &Vector| y.clone();

        for tol in [0.0, -1e-8, f64::NAN, f64::INFINITY] {
            let ode = Ode::new(0.0, 1.0, [1.0], f);
            assert!(matches!(rk.solve(&ode, tol), Err(Error::InvalidInput { .. })));
        }

        let backwards = Ode::new(1.0, 0.0, [1.0], f);
        assert!(matches!(rk.solve(&backwards, 1e-8), Err(Error::InvalidInput { .. })));

        let nan_state = Ode::new(0.0, 1.0, [f64::NAN], f);
        assert!(matches!(rk.solve(&nan_state, 1e-8), Err(Error::InvalidInput { .. })));

        let empty = Ode::new(0.0, 1.0, Vector::zeros(0), f);
        assert!(matches!(rk.solve(&empty, 1e-8), Err(Error::InvalidInput { .. })));

        let bad_period = Ode::new(0.0, 1.0, [1.0], f).with_period(0.0);
        assert!(matches!(rk.solve(&bad_period, 1e-8), Err(Error::InvalidInput { .. })));

        rk.config.initial_step = 0.0;
        let ode = Ode::new(0.0, 1.0, [1.0], f);
        assert!(matches!(rk.solve(&ode, 1e-8), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let ode = harmonic(1.0);
        let config = IntegratorConfig::reference().with_step_control(StepControl::GlobalNorm(
            GlobalNorm {
                min_step: 0.0,
                ..GlobalNorm::default()
            },
        ));
        let mut rk = RungeKutta::dormand_prince(config);
        assert!(matches!(rk.solve(&ode, 1e-8), Err(Error::InvalidInput { .. })));

        rk.config.step_control = StepControl::PerComponent(PerComponent {
            max_step: -1.0,
            ..PerComponent::default()
        });
        assert!(matches!(rk.solve(&ode, 1e-8), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_wrong_derivative_dimension() {
        let ode = Ode::new(0.0, 1.0, [1.0, 0.0], |_x: f64, _y: &Vector| Vector::from([1.0]));
        let mut rk = RungeKutta::dormand_prince(IntegratorConfig::reference());
        assert_eq!(
            rk.solve(&ode, 1e-8),
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_non_finite_state() {
        let ode = Ode::new(0.0, 1.0, [1.0], |_x: f64, _y: &Vector| Vector::from([f64::NAN]));
        let config = IntegratorConfig::reference().with_step_control(StepControl::Fixed);
        let mut rk = RungeKutta::dormand_prince(config);
        assert!(matches!(
            rk.solve(&ode, 1e-8),
            Err(Error::NonFiniteState { .. })
        ));

        // the adaptive policies fail on the step size first
        rk.config.step_control = StepControl::default();
        assert!(matches!(
            rk.solve(&ode, 1e-8),
            Err(Error::StepNotFinite { .. })
        ));
    }
}
