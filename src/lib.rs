//! Dino Evolve - Neuro-evolution of jumping agents on an obstacle course.
//!
//! A population of agents runs across a tile-based course. Each tick every
//! agent senses the nearest obstacle and decides whether to jump using its
//! four-gene chromosome. When the whole generation has died, a genetic
//! algorithm breeds the next one from the fittest agents.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, course descriptions and chromosomes
//! - `compute`: Terrain, agent physics, the generation loop and evolution
//!
//! # Example
//!
//! ```rust,no_run
//! use dino_evolve::{
//!     compute::GenerationLoop,
//!     schema::{Course, EvolutionConfig},
//! };
//!
//! let config = EvolutionConfig {
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//! let mut generation_loop = GenerationLoop::new(config, Course::default()).unwrap();
//!
//! let history = generation_loop
//!     .run_with_callback(10, |summary| {
//!         println!("generation {}: best {:.3}", summary.generation, summary.best_score);
//!     })
//!     .unwrap();
//!
//! println!("Best score over 10 generations: {:?}", history.overall_best());
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{GenerationLoop, SetupError, TickStats};
pub use schema::{Course, EvolutionConfig, GenerationSummary, SimulationConfig};
