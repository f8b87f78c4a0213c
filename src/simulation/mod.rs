pub mod states;
pub mod params;
pub mod error;
pub mod forces;
pub mod energy;
pub mod integrator;
pub mod engine;
pub mod scenario;
