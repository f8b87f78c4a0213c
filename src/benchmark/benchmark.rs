use std::time::Instant;

use crate::configuration::config::Algorithm;
use crate::simulation::integrator::make_integrator;
use crate::simulation::states::{BodySpec, Chain};

/// Helper to build a relaxed-ish chain of size `n` with a deterministic
/// perturbation, no rand needed
pub fn make_chain(n: usize) -> Chain {
    let mut specs = Vec::with_capacity(n);
    let mut x = 0.0;

    for i in 0..n {
        let i_f = i as f64;
        let rest_length = 1.0;
        x += rest_length + 0.1 * (i_f * 0.37).sin();

        specs.push(BodySpec {
            mass: 1.0 + 0.5 * (i_f * 0.13).cos().abs(),
            k: 10.0,
            rest_length,
            x0: x,
            v0: 0.0,
        });
    }

    Chain::from_specs(&specs, 1)
}

/// Mean wall-clock time of one micro-step in microseconds
pub fn time_per_step(algorithm: Algorithm, n: usize, steps: usize, dt: f64) -> f64 {
    let mut chain = make_chain(n);
    let mut integrator = make_integrator(algorithm, n);
    integrator.bootstrap(&chain, dt);

    // Warm up
    integrator.advance(&mut chain, dt, 10);

    let t0 = Instant::now();
    integrator.advance(&mut chain, dt, steps);
    t0.elapsed().as_secs_f64() * 1e6 / steps.max(1) as f64
}

/// Benchmark every integrator for a range of chain sizes
/// Paste output directly into excel to graph
pub fn bench_integrators() {
    println!("N,cromer_us,verlet_us,beeman_us,rk4_us");

    for n in [10, 100, 1000, 10_000, 100_000] {
        // Small n: average over many steps to smooth noise
        let steps = (1_000_000 / n).clamp(10, 10_000);

        let row: Vec<String> = Algorithm::ALL
            .iter()
            .map(|a| format!("{:.4}", time_per_step(*a, n, steps, 1e-3)))
            .collect();

        println!("{},{}", n, row.join(","));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bench_chain_is_ordered_and_valid() {
        let chain = make_chain(50);
        assert_eq!(chain.len(), 50);
        for w in chain.bodies.windows(2) {
            assert!(w[1].x > w[0].x);
        }
        assert!(chain.bodies.iter().all(|b| b.mass > 0.0));
    }

    #[test]
    fn timing_is_positive_and_finite() {
        for a in Algorithm::ALL {
            let us = time_per_step(a, 8, 20, 1e-3);
            assert!(us.is_finite() && us >= 0.0);
        }
    }
}
