//! Shooting method on the overture problem.
//!
//! Solves y0' = y1, y1' = c·y1 with y0(0) = 1 and looks for the initial slope
//! that makes y0 vanish at the end of the first period. Each trial is one
//! run of the integrator; trials that dive below the divergence bound are
//! abandoned early and counted as "too steep".
//!
//! Run with:
//!   cargo run --example overture_shooting

use dopri45::problems::Overture;
use dopri45::{IntegratorConfig, Outcome, RungeKutta};

/// Sign of y0 at x = 1 for the given slope; `None` if the trial failed
fn trial(rk: &mut RungeKutta, problem: Overture, slope: f64) -> Option<f64> {
    match rk.solve(&problem.ode(slope, 1.0), 1e-10) {
        Ok(Outcome::Completed { .. }) => rk.period_end_at(1).ok().map(|rec| rec.y[0]),
        Ok(Outcome::Diverged { .. }) => Some(f64::NEG_INFINITY),
        Ok(Outcome::Stopped { .. }) => None,
        Err(e) => {
            eprintln!("slope {slope}: {e}");
            None
        }
    }
}

fn main() {
    let problem = Overture::new(3.0);
    let mut rk = RungeKutta::dormand_prince(IntegratorConfig::periodic());

    // y0(1) is decreasing in the slope
    let (mut lo, mut hi) = (-10.0, 0.0);
    for _ in 0..50 {
        let mid = 0.5 * (lo + hi);
        match trial(&mut rk, problem, mid) {
            Some(y) if y > 0.0 => hi = mid,
            Some(_) => lo = mid,
            None => return,
        }
    }

    let slope = 0.5 * (lo + hi);
    let exact = -problem.c / problem.c.exp_m1();
    println!("Overture shooting (c = {})", problem.c);
    println!("  slope found: {slope:.12}");
    println!("  exact slope: {exact:.12}");
    println!("  error:       {:.2e}", (slope - exact).abs());
    println!("  y0(1):       {:.2e}", problem.exact_y0(slope, 1.0));
}
