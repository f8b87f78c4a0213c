//! Spring forces and accelerations along the chain
//!
//! Spring `i` connects body `i` to its left neighbour (or to the wall at
//! position 0 for `i == 0`). With `F[i]` the tension of spring `i`:
//!
//! ```text
//! F[0] = k[0] * (x[0] - rest[0])
//! F[i] = k[i] * (x[i] - x[i-1] - rest[i])
//! F[n] = 0                                  (free right end)
//! a[i] = (F[i+1] - F[i]) / m[i]
//! ```
//!
//! Each force depends on two adjacent positions, so all forces are rebuilt
//! on every call.

use super::states::{Chain, NVecX};

/// Force evaluator owning its `n + 1` tension buffer
#[derive(Debug, Clone)]
pub struct SpringForces {
    tension: NVecX,
}

impl SpringForces {
    pub fn new(n: usize) -> Self {
        Self {
            tension: NVecX::zeros(n + 1),
        }
    }

    /// Tension of every spring from the last evaluation, plus the zero
    /// virtual spring at index `n`
    pub fn tensions(&self) -> &NVecX {
        &self.tension
    }

    /// Compute accelerations of all bodies into `out`
    /// - `offset` shifts every position by `offset[i]` before evaluating
    ///   (RK4 intermediate stages); `None` means no shift
    pub fn accelerations(&mut self, chain: &Chain, offset: Option<&NVecX>, out: &mut NVecX) {
        let n = chain.len();
        if n == 0 { // no bodies, return
            return;
        }
        debug_assert_eq!(out.len(), n);
        if self.tension.len() != n + 1 {
            self.tension = NVecX::zeros(n + 1);
        }

        let shifted = |i: usize| match offset {
            Some(dx) => chain.bodies[i].x + dx[i],
            None => chain.bodies[i].x,
        };

        // Pass 1: spring tensions from the left anchor of each body
        let mut left = 0.0; // wall
        for (i, b) in chain.bodies.iter().enumerate() {
            let xi = shifted(i);
            self.tension[i] = b.spring_constant * (xi - left - b.rest_length);
            left = xi;
        }
        self.tension[n] = 0.0;

        // Pass 2: pulled right by spring i+1, pulled back by spring i
        for (i, b) in chain.bodies.iter().enumerate() {
            out[i] = (self.tension[i + 1] - self.tension[i]) / b.mass;
        }
    }
}
