//! Pipeline configuration.
//!
//! Configuration is an explicit value handed to [`Ingestor::new`]; there is
//! no process-wide mutable state. [`IngestConfig::from_env`] exists as a
//! convenience for deployments that locate the dataset via an environment
//! variable, and fails fast when the variable is unset.
//!
//! [`Ingestor::new`]: crate::pipeline::Ingestor::new

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable naming the dataset base directory for
/// [`IngestConfig::from_env`]. Input files are expected under its `data/`
/// subdirectory.
pub const DATA_LOC_VAR: &str = "HOPPER_DATA_LOC";

/// Number of input files committed together as one atomic unit.
pub const DEFAULT_CHUNK_SIZE: usize = 5;

/// Maximum decoded rows held per in-memory batch while reading one file.
pub const DEFAULT_BATCH_ROWS: usize = 10_000;

/// Configuration for one ingestion run.
///
/// `chunk_size` must be held constant across runs that target the same
/// output store: the resume offset is `committed_chunks * chunk_size`, so
/// changing it between runs invalidates the offset. This is a documented
/// precondition, not something the pipeline detects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestConfig {
    /// Directory containing the slice files.
    pub input_dir: PathBuf,
    /// Files per committed chunk.
    pub chunk_size: usize,
    /// Row bound per in-memory batch.
    pub batch_rows: usize,
}

impl IngestConfig {
    /// Configuration for `input_dir` with default chunk and batch sizes.
    #[must_use]
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            batch_rows: DEFAULT_BATCH_ROWS,
        }
    }

    /// Build a configuration from the `HOPPER_DATA_LOC` environment variable.
    ///
    /// The input directory is `<HOPPER_DATA_LOC>/data`.
    ///
    /// # Errors
    /// Returns an error if the variable is unset or not valid Unicode; a run
    /// without a data location is not attempted.
    pub fn from_env() -> Result<Self> {
        let base = std::env::var(DATA_LOC_VAR)
            .with_context(|| format!("required environment variable {DATA_LOC_VAR} is not set"))?;
        Ok(Self::new(PathBuf::from(base).join("data")))
    }
}
