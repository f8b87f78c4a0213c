pub mod simulation;
pub mod configuration;
pub mod analysis;
pub mod export;
pub mod benchmark;
pub mod logging;

pub use simulation::states::{BodySpec, Oscillator, Chain, NVecX};
pub use simulation::params::Parameters;
pub use simulation::error::SimError;
pub use simulation::forces::SpringForces;
pub use simulation::energy::{total_energy, kinetic_energy, potential_energy};
pub use simulation::integrator::{Integrator, EulerCromer, Verlet, Beeman, RungeKutta4, make_integrator};
pub use simulation::engine::{simulate, Trajectory};
pub use simulation::scenario::{RunOutcome, Scenario};

pub use configuration::config::{Algorithm, EngineConfig, ParametersConfig, BodyConfig, OutputConfig, ScenarioConfig};

pub use analysis::spectrum::{rfft_magnitude, rfft_freq, dominant_frequency};
pub use export::csv::{write_trajectory, write_spectrum, export_run};

pub use benchmark::benchmark::bench_integrators;
