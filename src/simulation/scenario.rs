//! Build a validated, runnable scenario from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a `Scenario` holding:
//! - numerical parameters (`Parameters`)
//! - the body specs every run starts from
//! - the integrators to run
//!
//! Runs never share state: each algorithm gets its own chain built from
//! the same immutable specs.

use tracing::{info, warn};

use crate::configuration::config::{Algorithm, ScenarioConfig};
use crate::simulation::engine::{simulate, Trajectory};
use crate::simulation::error::SimError;
use crate::simulation::params::{validate_bodies, Parameters};
use crate::simulation::states::BodySpec;

/// Outcome of one algorithm's run
pub type RunOutcome = (Algorithm, Result<Trajectory, SimError>);

#[derive(Debug, Clone)]
pub struct Scenario {
    pub parameters: Parameters,
    pub bodies: Vec<BodySpec>,
    pub algorithms: Vec<Algorithm>,
}

impl Scenario {
    /// Map and validate a loaded configuration, failing before any run
    pub fn build_scenario(cfg: &ScenarioConfig) -> Result<Self, SimError> {
        let p_cfg = &cfg.parameters;
        let parameters = Parameters::new(p_cfg.t_max, p_cfg.dt, p_cfg.t_sample);
        parameters.validate()?;

        let bodies: Vec<BodySpec> = cfg.bodies.iter().map(BodySpec::from).collect();
        validate_bodies(&bodies)?;

        let mut algorithms = Vec::new();
        for a in &cfg.engine.integrators {
            if !algorithms.contains(a) {
                algorithms.push(*a);
            }
        }
        if algorithms.is_empty() {
            return Err(SimError::invalid("engine.integrators", "at least one integrator is required"));
        }

        Ok(Self {
            parameters,
            bodies,
            algorithms,
        })
    }

    /// Keep only `algorithm`, e.g. when overridden from the command line
    pub fn with_only(mut self, algorithm: Algorithm) -> Self {
        self.algorithms = vec![algorithm];
        self
    }

    /// Run every algorithm in order; a diverging run is logged and
    /// reported in its slot without touching the others
    pub fn run(&self) -> Vec<RunOutcome> {
        info!(
            bodies = self.bodies.len(),
            t_max = self.parameters.t_max,
            dt = self.parameters.dt,
            t_sample = self.parameters.t_sample,
            runs = self.algorithms.len(),
            "running scenario"
        );
        self.algorithms
            .iter()
            .map(|&a| {
                let outcome = simulate(&self.parameters, &self.bodies, a);
                if let Err(e) = &outcome {
                    warn!(algorithm = %a, error = %e, "run failed");
                }
                (a, outcome)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(yaml: &str) -> ScenarioConfig {
        ScenarioConfig::from_yaml_str(yaml).unwrap()
    }

    #[test]
    fn builds_and_runs_each_algorithm() {
        let cfg = config(
            r#"
engine: { integrators: [cromer, rk4, cromer] }
parameters: { t_max: 0.2, dt: 0.01, t_sample: 0.1 }
bodies:
  - { mass: 1.0, k: 10.0, rest_length: 5.0, x0: 7.0 }
  - { mass: 1.0, k: 10.0, rest_length: 5.0, x0: 12.0 }
"#,
        );
        let scenario = Scenario::build_scenario(&cfg).unwrap();
        assert_eq!(scenario.algorithms, vec![Algorithm::Cromer, Algorithm::Rk4]);

        let runs = scenario.run();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].0, Algorithm::Cromer);
        assert_eq!(runs[1].0, Algorithm::Rk4);
        // both start from the same specs
        for (a, r) in &runs {
            let tr = r.as_ref().unwrap();
            assert_eq!(tr.algorithm, *a);
            assert_eq!(tr.chain.bodies[1].position_history[0], 12.0);
        }
    }

    #[test]
    fn unstable_run_keeps_stable_results() {
        // w dt = 2.5: past Euler-Cromer's limit of 2, inside RK4's
        let cfg = config(
            r#"
engine: { integrators: [rk4, cromer] }
parameters: { t_max: 2000.0, dt: 1.0, t_sample: 1.0 }
bodies:
  - { mass: 1.0, k: 6.25, rest_length: 5.0, x0: 7.0 }
"#,
        );
        let runs = Scenario::build_scenario(&cfg).unwrap().run();
        assert_eq!(runs.len(), 2);

        let (a, rk4) = &runs[0];
        assert_eq!(*a, Algorithm::Rk4);
        let rk4 = rk4.as_ref().unwrap();
        assert_eq!(rk4.samples(), 2001);
        assert!(rk4.energy.iter().all(|e| e.is_finite()));

        let (a, cromer) = &runs[1];
        assert_eq!(*a, Algorithm::Cromer);
        assert!(matches!(cromer, Err(SimError::NumericOverflow { body: 0, .. })));
    }

    #[test]
    fn invalid_body_fails_at_build_time() {
        let cfg = config(
            r#"
parameters: { t_max: 1.0, dt: 0.01, t_sample: 0.1 }
bodies:
  - { mass: 0.0, k: 10.0, rest_length: 5.0, x0: 7.0 }
"#,
        );
        let err = Scenario::build_scenario(&cfg).unwrap_err();
        assert_eq!(err.field(), Some("bodies[0].mass"));
    }

    #[test]
    fn empty_integrator_list_is_rejected() {
        let cfg = config(
            r#"
engine: { integrators: [] }
parameters: { t_max: 1.0, dt: 0.01, t_sample: 0.1 }
bodies:
  - { mass: 1.0, k: 10.0, rest_length: 5.0, x0: 7.0 }
"#,
        );
        let err = Scenario::build_scenario(&cfg).unwrap_err();
        assert_eq!(err.field(), Some("engine.integrators"));

        let only = Scenario::build_scenario(&config(
            r#"
parameters: { t_max: 1.0, dt: 0.01, t_sample: 0.1 }
bodies:
  - { mass: 1.0, k: 10.0, rest_length: 5.0, x0: 7.0 }
"#,
        ))
        .unwrap()
        .with_only(Algorithm::Beeman);
        assert_eq!(only.algorithms, vec![Algorithm::Beeman]);
    }
}
