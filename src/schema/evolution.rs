//! Evolution configuration and chromosome types.
//!
//! This module provides the decision-parameter chromosome carried by every
//! agent, the tunables of the genetic algorithm and the serializable records
//! produced at each generation boundary.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::SimulationConfig;

/// Number of genes in a chromosome.
pub const GENE_COUNT: usize = 4;

// ============================================================================
// Chromosome
// ============================================================================

/// Decision parameters of one agent: three input weights and a bias.
///
/// Every gene lies in `[0, 1]`. Out-of-range genes are a programming error:
/// construction asserts in debug builds and clamps in release builds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f32; GENE_COUNT]", into = "[f32; GENE_COUNT]")]
pub struct Chromosome {
    genes: [f32; GENE_COUNT],
}

impl Chromosome {
    /// Create a chromosome from raw genes.
    pub fn new(genes: [f32; GENE_COUNT]) -> Self {
        debug_assert!(
            genes.iter().all(|g| is_valid_gene(*g)),
            "gene outside [0, 1]: {genes:?}"
        );
        Self {
            genes: genes.map(clamp_gene),
        }
    }

    /// All genes in order.
    #[inline]
    pub fn genes(&self) -> &[f32; GENE_COUNT] {
        &self.genes
    }

    /// Gene at `index`.
    #[inline]
    pub fn gene(&self, index: usize) -> f32 {
        self.genes[index]
    }

    /// Replace the gene at `index`.
    pub fn set_gene(&mut self, index: usize, value: f32) {
        debug_assert!(is_valid_gene(value), "gene outside [0, 1]: {value}");
        self.genes[index] = clamp_gene(value);
    }
}

fn is_valid_gene(g: f32) -> bool {
    (0.0..=1.0).contains(&g)
}

fn clamp_gene(g: f32) -> f32 {
    if g.is_nan() { 0.0 } else { g.clamp(0.0, 1.0) }
}

impl TryFrom<[f32; GENE_COUNT]> for Chromosome {
    type Error = ChromosomeError;

    fn try_from(genes: [f32; GENE_COUNT]) -> Result<Self, Self::Error> {
        if let Some(index) = genes.iter().position(|g| !is_valid_gene(*g)) {
            return Err(ChromosomeError::GeneOutOfRange {
                index,
                value: genes[index],
            });
        }
        Ok(Self { genes })
    }
}

impl From<Chromosome> for [f32; GENE_COUNT] {
    fn from(chromosome: Chromosome) -> Self {
        chromosome.genes
    }
}

/// Rejected chromosome values.
#[derive(Debug, thiserror::Error)]
pub enum ChromosomeError {
    #[error("Gene {index} is {value}, expected a value in [0, 1]")]
    GeneOutOfRange { index: usize, value: f32 },
}

// ============================================================================
// Configuration
// ============================================================================

/// Top-level configuration for a run of the genetic algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Simulation parameters shared by every generation.
    #[serde(default)]
    pub base_config: SimulationConfig,
    /// Population settings.
    #[serde(default)]
    pub population: PopulationConfig,
    /// Activation above which an agent jumps.
    #[serde(default = "default_prediction_threshold")]
    pub prediction_threshold: f32,
    /// Mutation settings.
    #[serde(default)]
    pub mutation: MutationConfig,
    /// Score report output.
    #[serde(default)]
    pub report: ReportConfig,
    /// Optional course file. The bundled course is used when absent.
    #[serde(default)]
    pub course: Option<PathBuf>,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            base_config: SimulationConfig::default(),
            population: PopulationConfig::default(),
            prediction_threshold: default_prediction_threshold(),
            mutation: MutationConfig::default(),
            report: ReportConfig::default(),
            course: None,
            random_seed: None,
        }
    }
}

fn default_prediction_threshold() -> f32 {
    0.55
}

/// Population settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of agents per generation. Constant for the whole run.
    #[serde(default = "default_population_size")]
    pub size: usize,
    /// Generations to run before stopping (the binary's default).
    #[serde(default)]
    pub max_generations: Option<usize>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            max_generations: None,
        }
    }
}

fn default_population_size() -> usize {
    10
}

/// Mutation settings for the two offspring of each generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Whether offspring are mutated at all.
    #[serde(default = "default_mutation_enabled")]
    pub enabled: bool,
    /// Probability that a child has one gene replaced.
    #[serde(default = "default_mutation_probability")]
    pub probability: f32,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            enabled: default_mutation_enabled(),
            probability: default_mutation_probability(),
        }
    }
}

fn default_mutation_enabled() -> bool {
    true
}
fn default_mutation_probability() -> f32 {
    0.5
}

/// Best-score report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Seconds since start before the report is first written.
    #[serde(default = "default_sampling_secs")]
    pub sampling_secs: f64,
    /// Directory the report file is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sampling_secs: default_sampling_secs(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_sampling_secs() -> f64 {
    600.0
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

// ============================================================================
// Progress and results
// ============================================================================

/// Outcome of one finished generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Generation number, starting at 0.
    pub generation: usize,
    /// Highest final score.
    pub best_score: f32,
    /// Mean final score.
    pub mean_score: f32,
    /// Ticks the generation lasted.
    pub ticks: u64,
    /// Chromosome of the highest scoring agent.
    pub fittest: Chromosome,
}

/// Score history across generations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionHistory {
    /// Best score per generation.
    pub best_scores: Vec<f32>,
    /// Mean score per generation.
    pub mean_scores: Vec<f32>,
}

impl EvolutionHistory {
    /// Append a finished generation.
    pub fn push(&mut self, summary: &GenerationSummary) {
        self.best_scores.push(summary.best_score);
        self.mean_scores.push(summary.mean_score);
    }

    /// Number of generations recorded.
    pub fn len(&self) -> usize {
        self.best_scores.len()
    }

    /// Whether no generation has finished yet.
    pub fn is_empty(&self) -> bool {
        self.best_scores.is_empty()
    }

    /// Best score over all generations.
    pub fn overall_best(&self) -> Option<f32> {
        self.best_scores.iter().copied().reduce(f32::max)
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Evolution configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionConfigError {
    #[error("Population size must be at least 4, got {0}")]
    PopulationTooSmall(usize),
    #[error("Prediction threshold must be finite, got {0}")]
    InvalidThreshold(f32),
    #[error("Mutation probability must be in [0, 1], got {0}")]
    InvalidMutationProbability(f32),
    #[error("Sampling duration must be finite and non-negative, got {0}")]
    InvalidSampling(f64),
    #[error("Base config validation failed: {0}")]
    BaseConfigError(#[from] super::ConfigError),
}

impl EvolutionConfig {
    /// Validate evolution configuration.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        self.base_config.validate()?;

        // Selection needs four distinct agents
        if self.population.size < 4 {
            return Err(EvolutionConfigError::PopulationTooSmall(
                self.population.size,
            ));
        }

        if !self.prediction_threshold.is_finite() {
            return Err(EvolutionConfigError::InvalidThreshold(
                self.prediction_threshold,
            ));
        }

        if !(0.0..=1.0).contains(&self.mutation.probability) {
            return Err(EvolutionConfigError::InvalidMutationProbability(
                self.mutation.probability,
            ));
        }

        if !self.report.sampling_secs.is_finite() || self.report.sampling_secs < 0.0 {
            return Err(EvolutionConfigError::InvalidSampling(
                self.report.sampling_secs,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "gene outside [0, 1]")]
    fn test_out_of_range_gene_panics_in_debug() {
        Chromosome::new([1.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "gene outside [0, 1]")]
    fn test_set_gene_out_of_range_panics_in_debug() {
        let mut chromosome = Chromosome::new([0.5; GENE_COUNT]);
        chromosome.set_gene(2, -0.1);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_out_of_range_gene_clamps_in_release() {
        let chromosome = Chromosome::new([1.5, -0.5, f32::NAN, 0.25]);
        assert_eq!(chromosome.genes(), &[1.0, 0.0, 0.0, 0.25]);

        let mut chromosome = Chromosome::new([0.5; GENE_COUNT]);
        chromosome.set_gene(1, 7.0);
        chromosome.set_gene(3, f32::NAN);
        assert_eq!(chromosome.genes(), &[0.5, 1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_default_config_valid() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population.size, 10);
        assert_eq!(config.prediction_threshold, 0.55);
        assert!(config.mutation.enabled);
    }

    #[test]
    fn test_small_population_rejected() {
        let config = EvolutionConfig {
            population: PopulationConfig {
                size: 3,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::PopulationTooSmall(3))
        ));
    }

    #[test]
    fn test_base_config_error_wrapped() {
        let mut config = EvolutionConfig::default();
        config.base_config.tile_size = 0.0;
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::BaseConfigError(_))
        ));
    }

    #[test]
    fn test_serialization() {
        let config = EvolutionConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EvolutionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.population.size, config.population.size);
        assert_eq!(parsed.report.sampling_secs, 600.0);
    }

    #[test]
    fn test_chromosome_json_is_plain_array() {
        let chromosome = Chromosome::new([0.25, 0.5, 0.75, 1.0]);
        let json = serde_json::to_string(&chromosome).unwrap();
        assert_eq!(json, "[0.25,0.5,0.75,1.0]");
    }

    #[test]
    fn test_chromosome_rejects_out_of_range_gene() {
        let result: Result<Chromosome, _> = serde_json::from_str("[0.1, 1.5, 0.2, 0.3]");
        assert!(result.is_err());

        let err = Chromosome::try_from([0.1, 0.2, -0.1, 0.3]).unwrap_err();
        assert!(matches!(
            err,
            ChromosomeError::GeneOutOfRange { index: 2, .. }
        ));
    }

    #[test]
    fn test_history_tracks_best() {
        let mut history = EvolutionHistory::default();
        assert_eq!(history.overall_best(), None);
        for (generation, best) in [2.0, 5.0, 3.0].into_iter().enumerate() {
            history.push(&GenerationSummary {
                generation,
                best_score: best,
                mean_score: best / 2.0,
                ticks: 10,
                fittest: Chromosome::new([0.5; GENE_COUNT]),
            });
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.overall_best(), Some(5.0));
    }
}
