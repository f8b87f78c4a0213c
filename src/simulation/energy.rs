//! Total mechanical energy of the chain at one instant.

use super::states::Chain;

/// `(kinetic, potential)` of every body, the potential measured on the
/// spring to its left (neighbour or wall)
fn body_terms(chain: &Chain) -> impl Iterator<Item = (f64, f64)> + '_ {
    let lefts = std::iter::once(0.0).chain(chain.bodies.iter().map(|b| b.x));
    chain.bodies.iter().zip(lefts).map(|(b, left)| {
        let d = b.x - left - b.rest_length;
        (0.5 * b.mass * b.v * b.v, 0.5 * b.spring_constant * d * d)
    })
}

/// Sum of `0.5 m v^2` over all bodies
pub fn kinetic_energy(chain: &Chain) -> f64 {
    body_terms(chain).map(|(k, _)| k).sum()
}

/// Sum of `0.5 k d^2` over all springs, `d` measured from the left
/// neighbour (or the wall) minus the rest length
pub fn potential_energy(chain: &Chain) -> f64 {
    body_terms(chain).map(|(_, p)| p).sum()
}

pub fn total_energy(chain: &Chain) -> f64 {
    kinetic_energy(chain) + potential_energy(chain)
}

/// Index of the first body whose energy contribution overflows, even
/// though its position and velocity may still be finite
pub fn first_non_finite_term(chain: &Chain) -> Option<usize> {
    body_terms(chain).position(|(k, p)| !(k + p).is_finite())
}
