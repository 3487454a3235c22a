//! Genetic algorithm step between generations.

use crate::compute::Population;
use crate::schema::{Chromosome, EvolutionConfig, MutationConfig};

use super::EvolutionError;
use super::chromosome::ChromosomeRng;
use super::selection::{Selection, select};

/// Chromosomes for the next generation and how they were produced.
#[derive(Debug, Clone)]
pub struct Offspring {
    /// One chromosome per agent, in label order.
    pub chromosomes: Vec<Chromosome>,
    /// Parents and replaced slots.
    pub selection: Selection,
    /// Crossover point used for both children.
    pub crossover_point: usize,
    /// Gene replaced in each child by mutation, if any.
    pub mutated: [Option<usize>; 2],
}

/// Evolution engine that breeds each new generation.
///
/// The two fittest agents are crossed over; their children replace the two
/// least fit agents and every other chromosome carries over unchanged.
pub struct EvolutionEngine {
    rng: ChromosomeRng,
    mutation: MutationConfig,
}

impl EvolutionEngine {
    /// Create a new evolution engine.
    pub fn new(mutation: MutationConfig, random_seed: Option<u64>) -> Self {
        let seed = random_seed.unwrap_or_else(rand::random);
        Self {
            rng: ChromosomeRng::new(seed),
            mutation,
        }
    }

    /// Create from a run configuration.
    pub fn from_config(config: &EvolutionConfig) -> Self {
        Self::new(config.mutation.clone(), config.random_seed)
    }

    /// Random chromosomes for the first generation.
    pub fn initial_chromosomes(&mut self, size: usize) -> Vec<Chromosome> {
        (0..size).map(|_| self.rng.random_chromosome()).collect()
    }

    /// Breed the next generation from a finished population.
    pub fn next_generation(&mut self, population: &Population) -> Result<Offspring, EvolutionError> {
        let scores: Vec<f32> = population.agents().iter().map(|a| a.score()).collect();
        self.breed(&scores, &population.chromosomes())
    }

    /// Breed from final scores and the chromosomes that earned them.
    pub fn breed(
        &mut self,
        scores: &[f32],
        chromosomes: &[Chromosome],
    ) -> Result<Offspring, EvolutionError> {
        if scores.len() != chromosomes.len() {
            return Err(EvolutionError::LengthMismatch {
                scores: scores.len(),
                chromosomes: chromosomes.len(),
            });
        }

        let selection = select(scores)?;
        log::debug!(
            "selected fittest={} ({:.3}) second={} ({:.3}), replacing {} and {}",
            selection.fittest,
            scores[selection.fittest],
            selection.second_fittest,
            scores[selection.second_fittest],
            selection.least_fit,
            selection.second_least_fit
        );

        let (mut first_child, mut second_child, crossover_point) = self.rng.crossover(
            &chromosomes[selection.fittest],
            &chromosomes[selection.second_fittest],
        );

        let mut mutated = [None, None];
        if self.mutation.enabled {
            mutated[0] = self.rng.mutate(&mut first_child, self.mutation.probability);
            mutated[1] = self.rng.mutate(&mut second_child, self.mutation.probability);
            log::trace!("crossover at {crossover_point}, mutated genes {mutated:?}");
        }

        let mut next = chromosomes.to_vec();
        next[selection.least_fit] = first_child;
        next[selection.second_least_fit] = second_child;

        Ok(Offspring {
            chromosomes: next,
            selection,
            crossover_point,
            mutated,
        })
    }
}
