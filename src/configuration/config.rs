//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! spring chain scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – which integrators to run
//! - [`ParametersConfig`] – run length, micro-step and sampling interval
//! - [`BodyConfig`]       – mass, spring and initial state of each body
//! - [`OutputConfig`]     – where the CLI writes its CSV files (optional)
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   integrators: [cromer, verlet, beeman, rk4]
//!
//! parameters:
//!   t_max: 100.0            # total simulation time
//!   dt: 0.001               # micro-step
//!   t_sample: 0.01          # sampling interval, a multiple of dt
//!
//! bodies:                   # left to right, body 0 hangs from the wall
//!   - { mass: 1.0, k: 10.0, rest_length: 5.0, x0: 7.0, v0: 0.0 }
//!   - { mass: 1.0, k: 10.0, rest_length: 5.0, x0: 12.0, v0: 0.0 }
//!
//! output:
//!   directory: "output"
//!   spectrum: true
//! ```
//!
//! The scenario builder validates these values and maps them into the
//! runtime types of [`crate::simulation`].

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::simulation::states::BodySpec;

/// Time integration scheme
/// `integrators: [cromer, verlet, beeman, rk4]`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    #[serde(rename = "cromer")] // Semi-implicit Euler, first order, symplectic
    Cromer,

    #[serde(rename = "verlet")] // Störmer-Verlet position scheme, second order
    Verlet,

    #[serde(rename = "beeman")] // Beeman predictor with two-level acceleration history
    Beeman,

    #[serde(rename = "rk4")] // Classical 4th-order Runge–Kutta, not symplectic
    Rk4,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [Algorithm::Cromer, Algorithm::Verlet, Algorithm::Beeman, Algorithm::Rk4];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Cromer => "cromer",
            Algorithm::Verlet => "verlet",
            Algorithm::Beeman => "beeman",
            Algorithm::Rk4 => "rk4",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown integrator `{s}` (expected cromer, verlet, beeman or rk4)"))
    }
}

fn all_algorithms() -> Vec<Algorithm> {
    Algorithm::ALL.to_vec()
}

/// Which integrators the scenario runs, each as an independent run
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    #[serde(default = "all_algorithms")]
    pub integrators: Vec<Algorithm>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { integrators: all_algorithms() }
    }
}

/// Numerical parameters of every run
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub t_max: f64,    // total duration
    pub dt: f64,       // micro-step size
    pub t_sample: f64, // sampling interval, integer multiple of dt
}

/// Configuration for a single body and the spring to its left
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub mass: f64,        // must be > 0
    pub k: f64,           // spring constant
    pub rest_length: f64, // equilibrium distance to the left neighbour (or the wall)
    pub x0: f64,          // initial position
    #[serde(default)]
    pub v0: f64,          // initial velocity
}

impl From<&BodyConfig> for BodySpec {
    fn from(bc: &BodyConfig) -> Self {
        BodySpec::new(bc.mass, bc.k, bc.rest_length, bc.x0, bc.v0)
    }
}

fn default_output_dir() -> String {
    "output".to_string()
}

/// Where and what the CLI exports
#[derive(Deserialize, Debug, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: String,
    #[serde(default)]
    pub spectrum: bool, // also write |rfft| of every position history
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            spectrum: false,
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub bodies: Vec<BodyConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }
}
