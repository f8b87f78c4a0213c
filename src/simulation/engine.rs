//! Simulation driver
//!
//! `simulate` validates a run, builds the chain, bootstraps the chosen
//! integrator and samples the state every `t_sample`:
//!
//! ```text
//! sample 0          initial state, energy, t = 0
//! sample i >= 1     steps_per_sample micro-steps, then snapshot
//! ```
//!
//! A run either returns a fully populated `Trajectory` or an error; nothing
//! partial is handed back.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::energy::{first_non_finite_term, total_energy};
use super::error::SimError;
use super::integrator::make_integrator;
use super::params::{validate_bodies, Parameters};
use super::states::{BodySpec, Chain};
use crate::configuration::config::Algorithm;

/// Result of one run
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub algorithm: Algorithm,
    pub chain: Chain, // histories filled
    pub energy: Vec<f64>, // one entry per sample
    pub time: Vec<f64>, // time[i] = i * t_sample
    pub t_sample: f64,
    pub elapsed: Duration, // wall clock
}

impl Trajectory {
    pub fn samples(&self) -> usize {
        self.time.len()
    }

    /// Largest `|E_i - E_0| / |E_0|` over the run (absolute drift if `E_0 == 0`)
    pub fn max_relative_energy_drift(&self) -> f64 {
        let e0 = self.energy.first().copied().unwrap_or(0.0);
        let scale = if e0 != 0.0 { e0.abs() } else { 1.0 };
        self.energy
            .iter()
            .map(|e| (e - e0).abs() / scale)
            .fold(0.0, f64::max)
    }
}

/// Energy of the chain, or the body whose `v^2` or stretch^2 overflowed
fn checked_energy(chain: &Chain, algorithm: Algorithm, sample: usize) -> Result<f64, SimError> {
    let e = total_energy(chain);
    if e.is_finite() {
        return Ok(e);
    }
    let body = first_non_finite_term(chain).unwrap_or(0);
    warn!(%algorithm, sample, body, "energy overflowed");
    Err(SimError::NumericOverflow { sample, body })
}

/// Run one integrator over the chain described by `bodies`
pub fn simulate(params: &Parameters, bodies: &[BodySpec], algorithm: Algorithm) -> Result<Trajectory, SimError> {
    params.validate()?;
    validate_bodies(bodies)?;

    let steps_per_sample = params.steps_per_sample()?;
    let sample_count = params.sample_count()?;
    let micro_steps = params.total_steps()?;
    let size = sample_count + 1;
    debug!(
        %algorithm,
        bodies = bodies.len(),
        steps_per_sample,
        sample_count,
        "starting run"
    );

    let start = Instant::now();

    let mut chain = Chain::from_specs(bodies, size);
    let mut integrator = make_integrator(algorithm, chain.len());
    integrator.bootstrap(&chain, params.dt);

    let mut energy = vec![0.0; size];
    let mut time = vec![0.0; size];
    energy[0] = checked_energy(&chain, algorithm, 0)?;

    for i in 1..size {
        integrator.advance(&mut chain, params.dt, steps_per_sample);

        if let Some(body) = chain.first_non_finite() {
            warn!(%algorithm, sample = i, body, "state diverged");
            return Err(SimError::NumericOverflow { sample: i, body });
        }
        energy[i] = checked_energy(&chain, algorithm, i)?;

        for b in chain.bodies.iter_mut() {
            b.record(i);
        }
        time[i] = i as f64 * params.t_sample;
    }

    let trajectory = Trajectory {
        algorithm,
        chain,
        energy,
        time,
        t_sample: params.t_sample,
        elapsed: start.elapsed(),
    };

    info!(
        %algorithm,
        samples = size,
        micro_steps,
        elapsed_ms = trajectory.elapsed.as_secs_f64() * 1e3,
        energy_drift = trajectory.max_relative_energy_drift(),
        "run finished"
    );

    Ok(trajectory)
}
