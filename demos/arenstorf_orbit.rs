//! Arenstorf orbit: a periodic solution of the restricted three-body problem.
//!
//! Propagates two periods with period-end correction and prints how far the
//! orbit is from closing at each recorded period end.
//!
//! Run with:
//!   cargo run --example arenstorf_orbit

use dopri45::problems::ArenstorfOrbit;
use dopri45::{IntegratorConfig, RungeKutta};
use tracing_subscriber::filter::LevelFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .with_target(false)
        .init();

    let ode = ArenstorfOrbit::default().ode(2.0 * ArenstorfOrbit::PERIOD);
    let config = IntegratorConfig::reference().with_period_correction(true);

    println!("Arenstorf orbit, period {}", ArenstorfOrbit::PERIOD);
    for tol in [1e-6, 1e-8, 1e-10] {
        let mut rk = RungeKutta::dormand_prince(config.clone());
        if let Err(e) = rk.solve(&ode, tol) {
            eprintln!("  tol {tol:e}: {e}");
            continue;
        }

        println!(
            "  tol {tol:e}: {} steps, {} floor hits",
            rk.stats.accepted_steps, rk.stats.floor_hits
        );
        for rec in rk.period_ends().iter().skip(1) {
            let dx = rec.y[0] - ArenstorfOrbit::Y0[0];
            let dy = rec.y[1] - ArenstorfOrbit::Y0[1];
            println!(
                "    period {} at x = {:.11}: closure error {:.3e}",
                rec.period,
                rec.x,
                (dx * dx + dy * dy).sqrt()
            );
        }
    }
}
