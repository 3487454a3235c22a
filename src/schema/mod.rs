//! Schema module - Configuration, course and chromosome types.

mod config;
mod course;
mod evolution;

pub use config::*;
pub use course::*;
pub use evolution::*;
