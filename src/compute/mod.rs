//! Compute module - Terrain queries, agent physics and the generation loop.

mod agent;
mod decision;
mod population;
mod simulation;
mod terrain;

pub mod evolution;

pub use agent::*;
pub use decision::*;
pub use population::*;
pub use simulation::*;
pub use terrain::*;
