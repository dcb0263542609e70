//! Basic usage: harmonic oscillator.
//!
//! Integrates y'' + ω²y = 0 for one period and compares with the exact solution.
//!
//! Run with:
//!   cargo run --example harmonic_oscillator

use dopri45::problems::HarmonicOscillator;
use dopri45::{IntegratorConfig, RungeKutta};

fn main() {
    let sho = HarmonicOscillator::new(2.0);
    let period = sho.period();
    let ode = sho.ode(period);

    let mut rk = RungeKutta::dormand_prince(IntegratorConfig::reference());
    let outcome = rk.solve(&ode, 1e-10).unwrap();

    let last = rk.trace().last().unwrap();
    let exact = sho.exact(last.x);

    println!("Harmonic Oscillator (ω = {})", sho.omega);
    println!("  Outcome:     {outcome:?}");
    println!("  Period:      {period:.6}");
    println!("  Final x:     {:.6}", last.x);
    println!();
    println!("  y(x)  = {:.15}   (exact: {:.15})", last.y[0], exact[0]);
    println!("  y'(x) = {:.15}   (exact: {:.15})", last.y[1], exact[1]);
    println!();
    println!("  Position error: {:.2e}", (last.y[0] - exact[0]).abs());
    println!("  Velocity error: {:.2e}", (last.y[1] - exact[1]).abs());
    println!();
    println!("  Accepted steps:   {}", rk.stats.accepted_steps);
    println!("  Step adjustments: {}", rk.stats.step_adjustments);
    println!("  Function evals:   {}", rk.stats.fn_evals);
}
