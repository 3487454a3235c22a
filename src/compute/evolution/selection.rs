//! Fitness ranking and parent/victim selection.

use super::EvolutionError;

/// Minimum population for selecting four distinct agents.
pub const MIN_POPULATION: usize = 4;

/// Parents and replacement slots chosen from a finished generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub fittest: usize,
    pub second_fittest: usize,
    pub least_fit: usize,
    pub second_least_fit: usize,
}

/// Agent indices sorted by ascending score. Ties keep index order.
pub fn rank(scores: &[f32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]).then(a.cmp(&b)));
    order
}

/// Pick the two highest and two lowest scoring agents.
pub fn select(scores: &[f32]) -> Result<Selection, EvolutionError> {
    if scores.len() < MIN_POPULATION {
        return Err(EvolutionError::PopulationTooSmall(scores.len()));
    }
    let order = rank(scores);
    let n = order.len();
    Ok(Selection {
        fittest: order[n - 1],
        second_fittest: order[n - 2],
        least_fit: order[0],
        second_least_fit: order[1],
    })
}
