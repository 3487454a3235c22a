//! Best-score-per-generation report for offline analysis.
//!
//! Each line is `"<best score> <generation>"`. Lines are buffered until the
//! sampling duration has elapsed, then written out and appended one per
//! generation from there on.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::schema::EvolutionConfig;

/// Score report writer.
#[derive(Debug)]
pub struct ScoreReport {
    path: PathBuf,
    sampling: Duration,
    pending: Vec<(f32, usize)>,
    started: bool,
}

impl ScoreReport {
    /// Create a report writing into `dir`.
    pub fn new<P: AsRef<Path>>(dir: P, file_name: String, sampling: Duration) -> Self {
        Self {
            path: dir.as_ref().join(file_name),
            sampling,
            pending: Vec::new(),
            started: false,
        }
    }

    /// Create from a run configuration. The file name encodes the tunables.
    pub fn from_config(config: &EvolutionConfig) -> Self {
        let file_name = report_file_name(config.mutation.enabled, config.prediction_threshold);
        let sampling =
            Duration::try_from_secs_f64(config.report.sampling_secs).unwrap_or(Duration::ZERO);
        Self::new(&config.report.output_dir, file_name, sampling)
    }

    /// Report file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file has been created.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Record a generation's best score.
    ///
    /// `elapsed` is the time since the run started. Returns whether anything
    /// was written to disk.
    pub fn record(
        &mut self,
        best_score: f32,
        generation: usize,
        elapsed: Duration,
    ) -> io::Result<bool> {
        self.pending.push((best_score, generation));

        if !self.started {
            if elapsed <= self.sampling {
                return Ok(false);
            }
            File::create(&self.path)?;
            self.started = true;
            log::info!("writing score report to {}", self.path.display());
        }

        self.flush_pending()?;
        Ok(true)
    }

    fn flush_pending(&mut self) -> io::Result<()> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        for (score, generation) in &self.pending {
            writeln!(writer, "{} {}", score, generation)?;
        }
        writer.flush()?;
        self.pending.clear();
        Ok(())
    }
}

/// Report file name for the given tunables.
pub fn report_file_name(mutate_genes: bool, prediction_threshold: f32) -> String {
    format!(
        "output_mutate_genes_{}_prediction_threshold_{}.txt",
        mutate_genes, prediction_threshold
    )
}
