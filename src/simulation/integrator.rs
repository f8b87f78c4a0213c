//! Fixed-step time integrators for the spring chain
//!
//! Provides Euler-Cromer, Störmer-Verlet, Beeman and classical RK4, all
//! driven by `SpringForces` and sharing the `Integrator` contract:
//! `bootstrap` once from the initial state, then `step` per micro-step.
//! Each step is synchronous: every acceleration is computed from the old
//! positions before any body moves. Scratch buffers and any history an
//! algorithm needs are owned by the integrator and survive between calls.

use super::forces::SpringForces;
use super::states::{Chain, NVecX};
use crate::configuration::config::Algorithm;

pub trait Integrator {
    /// Seed algorithm-specific state from the initial chain
    fn bootstrap(&mut self, chain: &Chain, dt: f64);

    /// Advance the chain by one micro-step of size `dt`
    fn step(&mut self, chain: &mut Chain, dt: f64);

    /// Run `steps` micro-steps
    fn advance(&mut self, chain: &mut Chain, dt: f64, steps: usize) {
        for _ in 0..steps {
            self.step(chain, dt);
        }
    }

    /// Force evaluations per micro-step
    fn evaluations_per_step(&self) -> usize;
}

/// Build a fresh integrator for a chain of `n` bodies
pub fn make_integrator(algorithm: Algorithm, n: usize) -> Box<dyn Integrator> {
    match algorithm {
        Algorithm::Cromer => Box::new(EulerCromer::new(n)),
        Algorithm::Verlet => Box::new(Verlet::new(n)),
        Algorithm::Beeman => Box::new(Beeman::new(n)),
        Algorithm::Rk4 => Box::new(RungeKutta4::new(n)),
    }
}

// =========================================================================================
// Euler-Cromer
// =========================================================================================

/// Semi-implicit Euler: the updated velocity is used for the position
#[derive(Debug, Clone)]
pub struct EulerCromer {
    forces: SpringForces,
    a: NVecX,
}

impl EulerCromer {
    pub fn new(n: usize) -> Self {
        Self {
            forces: SpringForces::new(n),
            a: NVecX::zeros(n),
        }
    }
}

impl Integrator for EulerCromer {
    fn bootstrap(&mut self, _chain: &Chain, _dt: f64) {}

    fn step(&mut self, chain: &mut Chain, dt: f64) {
        // a_n from x_n
        self.forces.accelerations(chain, None, &mut self.a);

        // v_n+1 = v_n + a_n dt, x_n+1 = x_n + v_n+1 dt
        for (b, a) in chain.bodies.iter_mut().zip(self.a.iter()) {
            b.v += a * dt;
            b.x += b.v * dt;
        }
        chain.t += dt;
    }

    fn evaluations_per_step(&self) -> usize {
        1
    }
}

// =========================================================================================
// Störmer-Verlet
// =========================================================================================

/// Position Verlet with a central-difference velocity
///
/// `x_prev` is seeded with the first-order backward estimate
/// `x0 - v0 dt` and then updated in place each step.
#[derive(Debug, Clone)]
pub struct Verlet {
    forces: SpringForces,
    a: NVecX,
    x_prev: NVecX,
}

impl Verlet {
    pub fn new(n: usize) -> Self {
        Self {
            forces: SpringForces::new(n),
            a: NVecX::zeros(n),
            x_prev: NVecX::zeros(n),
        }
    }
}

impl Integrator for Verlet {
    fn bootstrap(&mut self, chain: &Chain, dt: f64) {
        // x_-1 = x_0 - v_0 dt
        self.x_prev = chain.positions() - chain.velocities() * dt;
    }

    fn step(&mut self, chain: &mut Chain, dt: f64) {
        let dt2 = dt * dt;
        self.forces.accelerations(chain, None, &mut self.a);

        for (i, b) in chain.bodies.iter_mut().enumerate() {
            let x_old = self.x_prev[i];
            // x_n+1 = 2 x_n - x_n-1 + a_n dt^2
            let x_new = 2.0 * b.x - x_old + self.a[i] * dt2;
            // v_n = (x_n+1 - x_n-1) / 2dt
            b.v = (x_new - x_old) / (2.0 * dt);
            self.x_prev[i] = b.x;
            b.x = x_new;
        }
        chain.t += dt;
    }

    fn evaluations_per_step(&self) -> usize {
        1
    }
}

// =========================================================================================
// Beeman
// =========================================================================================

/// Beeman's predictor with a three-slot acceleration ring buffer
///
/// Slot `head` holds `a_n-1`, `head + 1` holds `a_n`, `head + 2` receives
/// `a_n+1`. Advancing `head` rotates the history without copying.
#[derive(Debug, Clone)]
pub struct Beeman {
    forces: SpringForces,
    ring: [NVecX; 3],
    head: usize,
}

impl Beeman {
    pub fn new(n: usize) -> Self {
        Self {
            forces: SpringForces::new(n),
            ring: [NVecX::zeros(n), NVecX::zeros(n), NVecX::zeros(n)],
            head: 0,
        }
    }

    fn slots(&self) -> (usize, usize, usize) {
        (self.head, (self.head + 1) % 3, (self.head + 2) % 3)
    }

    /// Acceleration at the current time level
    pub fn current_acceleration(&self) -> &NVecX {
        &self.ring[self.slots().1]
    }

    /// Acceleration one step back
    pub fn previous_acceleration(&self) -> &NVecX {
        &self.ring[self.slots().0]
    }
}

impl Integrator for Beeman {
    fn bootstrap(&mut self, chain: &Chain, _dt: f64) {
        // a_-1 = a_0 = a(x_0)
        self.head = 0;
        let (prev, cur, _) = self.slots();
        self.forces.accelerations(chain, None, &mut self.ring[cur]);
        self.ring[prev] = self.ring[cur].clone();
    }

    fn step(&mut self, chain: &mut Chain, dt: f64) {
        let dt2 = dt * dt;
        let (prev, cur, next) = self.slots();

        // x_n+1 = x_n + v_n dt + (2/3 a_n - 1/6 a_n-1) dt^2
        for (i, b) in chain.bodies.iter_mut().enumerate() {
            let (a_prev, a_cur) = (self.ring[prev][i], self.ring[cur][i]);
            b.x += b.v * dt + (2.0 / 3.0) * a_cur * dt2 - (1.0 / 6.0) * a_prev * dt2;
        }

        // a_n+1 from x_n+1
        self.forces.accelerations(chain, None, &mut self.ring[next]);

        // v_n+1 = v_n + (1/3 a_n+1 + 5/6 a_n - 1/6 a_n-1) dt
        for (i, b) in chain.bodies.iter_mut().enumerate() {
            let (a_prev, a_cur, a_next) = (self.ring[prev][i], self.ring[cur][i], self.ring[next][i]);
            b.v += ((1.0 / 3.0) * a_next + (5.0 / 6.0) * a_cur - (1.0 / 6.0) * a_prev) * dt;
        }

        // a_n becomes a_n-1, a_n+1 becomes a_n
        self.head = (self.head + 1) % 3;
        chain.t += dt;
    }

    fn evaluations_per_step(&self) -> usize {
        1
    }
}

// =========================================================================================
// Runge-Kutta 4
// =========================================================================================

/// Classical four-stage Runge-Kutta
///
/// Stages 2 and 3 evaluate forces at half-step position offsets, stage 4 at
/// the full-step offset. Self-starting, keeps no state between steps.
#[derive(Debug, Clone)]
pub struct RungeKutta4 {
    forces: SpringForces,
    a: NVecX,
    offset: NVecX,
    kx: [NVecX; 4], // position increments x1..x4
    kv: [NVecX; 4], // velocity increments v1..v4
}

impl RungeKutta4 {
    pub fn new(n: usize) -> Self {
        let z = || NVecX::zeros(n);
        Self {
            forces: SpringForces::new(n),
            a: z(),
            offset: z(),
            kx: [z(), z(), z(), z()],
            kv: [z(), z(), z(), z()],
        }
    }

    /// Fill `kx[stage]` and `kv[stage]`; stages 1 and 2 take half of the
    /// previous increments, stage 3 the full ones
    fn stage(&mut self, chain: &Chain, stage: usize, dt: f64) {
        if stage == 0 {
            self.forces.accelerations(chain, None, &mut self.a);
            for (i, b) in chain.bodies.iter().enumerate() {
                self.kv[0][i] = self.a[i] * dt;
                self.kx[0][i] = b.v * dt;
            }
            return;
        }

        let scale = if stage == 3 { 1.0 } else { 0.5 };
        for i in 0..chain.len() {
            self.offset[i] = scale * self.kx[stage - 1][i];
        }
        self.forces.accelerations(chain, Some(&self.offset), &mut self.a);
        for (i, b) in chain.bodies.iter().enumerate() {
            self.kv[stage][i] = self.a[i] * dt;
            self.kx[stage][i] = dt * (b.v + scale * self.kv[stage - 1][i]);
        }
    }
}

impl Integrator for RungeKutta4 {
    fn bootstrap(&mut self, _chain: &Chain, _dt: f64) {}

    fn step(&mut self, chain: &mut Chain, dt: f64) {
        for stage in 0..4 {
            self.stage(chain, stage, dt);
        }

        let (kx, kv) = (&self.kx, &self.kv);
        for (i, b) in chain.bodies.iter_mut().enumerate() {
            b.v += (kv[0][i] + 2.0 * kv[1][i] + 2.0 * kv[2][i] + kv[3][i]) / 6.0;
            b.x += (kx[0][i] + 2.0 * kx[1][i] + 2.0 * kx[2][i] + kx[3][i]) / 6.0;
        }
        chain.t += dt;
    }

    fn evaluations_per_step(&self) -> usize {
        4
    }
}
