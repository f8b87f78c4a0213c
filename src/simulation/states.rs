//! Core state types for the spring chain.
//!
//! - `BodySpec`   initial description of one mass/spring pair
//! - `Oscillator` runtime state of one mass plus its sampled history
//! - `Chain`      ordered oscillators and the current simulation time
//!
//! Oscillator 0 hangs from a wall at position 0, oscillator `i > 0` hangs
//! from oscillator `i - 1`. The order of `Chain::bodies` is physical.

use nalgebra::DVector;

/// Per-body scalar buffer (positions, velocities, accelerations)
pub type NVecX = DVector<f64>;

/// Initial description of one mass and the spring to its left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySpec {
    pub mass: f64, // body mass
    pub k: f64, // spring constant
    pub rest_length: f64, // equilibrium distance to the left neighbour (or the wall)
    pub x0: f64, // initial position
    pub v0: f64, // initial velocity
}

impl BodySpec {
    pub fn new(mass: f64, k: f64, rest_length: f64, x0: f64, v0: f64) -> Self {
        Self { mass, k, rest_length, x0, v0 }
    }
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    pub mass: f64,
    pub spring_constant: f64,
    pub rest_length: f64,
    pub x: f64, // instant position
    pub v: f64, // instant velocity
    pub position_history: Vec<f64>, // slot 0 = initial position
    pub velocity_history: Vec<f64>, // slot 0 = initial velocity
}

impl Oscillator {
    /// Build an oscillator with `samples` history slots, the first one
    /// holding the initial condition
    pub fn new(spec: &BodySpec, samples: usize) -> Self {
        let mut position_history = vec![0.0; samples];
        let mut velocity_history = vec![0.0; samples];
        if samples > 0 {
            position_history[0] = spec.x0;
            velocity_history[0] = spec.v0;
        }
        Self {
            mass: spec.mass,
            spring_constant: spec.k,
            rest_length: spec.rest_length,
            x: spec.x0,
            v: spec.v0,
            position_history,
            velocity_history,
        }
    }

    /// Copy the instant state into history slot `index`
    pub fn record(&mut self, index: usize) {
        self.position_history[index] = self.x;
        self.velocity_history[index] = self.v;
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.v.is_finite()
    }
}

#[derive(Debug, Clone)]
pub struct Chain {
    pub bodies: Vec<Oscillator>, // left to right
    pub t: f64, // time
}

impl Chain {
    pub fn from_specs(specs: &[BodySpec], samples: usize) -> Self {
        let bodies = specs.iter().map(|s| Oscillator::new(s, samples)).collect();
        Self { bodies, t: 0.0 }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn positions(&self) -> NVecX {
        NVecX::from_iterator(self.len(), self.bodies.iter().map(|b| b.x))
    }

    pub fn velocities(&self) -> NVecX {
        NVecX::from_iterator(self.len(), self.bodies.iter().map(|b| b.v))
    }

    /// Index of the first body whose position or velocity is NaN/inf
    pub fn first_non_finite(&self) -> Option<usize> {
        self.bodies.iter().position(|b| !b.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oscillator_history_starts_with_initial_state() {
        let spec = BodySpec::new(2.0, 3.0, 1.0, 4.0, -0.5);
        let osc = Oscillator::new(&spec, 5);

        assert_eq!(osc.position_history.len(), 5);
        assert_eq!(osc.velocity_history.len(), 5);
        assert_eq!(osc.position_history[0], 4.0);
        assert_eq!(osc.velocity_history[0], -0.5);
        assert_eq!(osc.x, 4.0);
        assert_eq!(osc.v, -0.5);
    }

    #[test]
    fn chain_keeps_input_order() {
        let specs = [
            BodySpec::new(1.0, 10.0, 5.0, 7.0, 0.0),
            BodySpec::new(2.0, 10.0, 5.0, 12.0, 0.0),
        ];
        let chain = Chain::from_specs(&specs, 3);

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.bodies[1].mass, 2.0);
        assert_eq!(chain.positions().as_slice(), &[7.0, 12.0]);
        assert_eq!(chain.t, 0.0);
    }

    #[test]
    fn non_finite_body_is_found() {
        let specs = [BodySpec::new(1.0, 1.0, 1.0, 1.0, 0.0); 3];
        let mut chain = Chain::from_specs(&specs, 1);
        assert_eq!(chain.first_non_finite(), None);

        chain.bodies[2].v = f64::NAN;
        assert_eq!(chain.first_non_finite(), Some(2));
    }
}
