//! Jump decision: a normalized affine score over three sensory inputs.
//!
//! ```text
//! a = (d·g0 + s·g1 + (w/2)·g2 + g3) / (d + s + w/2 + 1)
//! ```
//!
//! where `d` is the distance to the nearest obstacle, `s` the horizontal
//! speed and `w` the obstacle width. The agent jumps iff `a > threshold`.

use crate::schema::Chromosome;

/// Default activation threshold for jumping.
pub const DEFAULT_THRESHOLD: f32 = 0.55;

/// Activation for the given inputs.
#[inline]
pub fn activation(distance: f32, speed: f32, obstacle_width: f32, chromosome: &Chromosome) -> f32 {
    let [g0, g1, g2, g3] = *chromosome.genes();
    let half_width = obstacle_width / 2.0;
    (distance * g0 + speed * g1 + half_width * g2 + g3) / (distance + speed + half_width + 1.0)
}

/// Whether an agent with this chromosome should jump.
///
/// A non-finite activation (no obstacle ahead, or a zero denominator) never jumps.
#[inline]
pub fn predict(
    distance: f32,
    speed: f32,
    obstacle_width: f32,
    chromosome: &Chromosome,
    threshold: f32,
) -> bool {
    let a = activation(distance, speed, obstacle_width, chromosome);
    a.is_finite() && a > threshold
}
