//! Genetic algorithm that evolves agent decision parameters.
//!
//! Between generations the engine ranks agents by final score, crosses the
//! two fittest over at a single random point, writes the two children over
//! the two least fit agents and optionally mutates one gene of each child.
//!
//! # Example
//!
//! ```rust
//! use dino_evolve::compute::evolution::EvolutionEngine;
//! use dino_evolve::schema::{Chromosome, MutationConfig};
//!
//! let mut engine = EvolutionEngine::new(MutationConfig::default(), Some(42));
//! let parents = engine.initial_chromosomes(4);
//! let offspring = engine.breed(&[1.0, 3.0, 0.5, 2.0], &parents).unwrap();
//!
//! assert_eq!(offspring.selection.fittest, 1);
//! assert_eq!(offspring.chromosomes[1], parents[1]);
//! ```
//!
//! - `chromosome`: Seedable random source, crossover and mutation
//! - `selection`: Ranking with index tie-break and parent/victim selection
//! - `engine`: One breeding step per generation boundary
//! - `report`: Best-score-per-generation file output

mod chromosome;
mod engine;
mod report;
mod selection;

pub use chromosome::{ChromosomeRng, crossover_at};
pub use engine::{EvolutionEngine, Offspring};
pub use report::{ScoreReport, report_file_name};
pub use selection::{MIN_POPULATION, Selection, rank, select};

/// Errors raised while breeding a new generation.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Population of {0} is too small, selection needs at least 4 agents")]
    PopulationTooSmall(usize),
    #[error("Got {scores} scores for {chromosomes} chromosomes")]
    LengthMismatch { scores: usize, chromosomes: usize },
}
