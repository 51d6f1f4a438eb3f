//! The canonical ingestion pipeline: discover, resume, commit chunk by chunk.
//!
//! One run is purely sequential: slice files are enumerated in deterministic
//! order, the store reports how many chunks it already holds, and the
//! remaining files are processed `chunk_size` at a time with one atomic
//! commit per chunk. File- and record-level failures are logged and skipped;
//! a store write failure ends the run at the current chunk boundary, from
//! which the next invocation resumes.

use crate::config::IngestConfig;
use crate::reader::read_slice;
use crate::slices::discover_slices;
use crate::store::{Chunk, SliceStore};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// Tallies of one ingestion run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Slice files found in the input directory.
    pub files_discovered: usize,
    /// Files skipped up front because earlier runs already committed them.
    pub files_resumed: usize,
    /// Files read successfully this run.
    pub files_read: usize,
    /// Files skipped this run because they could not be read or parsed.
    pub files_failed: usize,
    /// Chunks committed this run.
    pub chunks_committed: usize,
    /// Playlists handed to the store this run (before key deduplication).
    pub playlists_written: usize,
}

/// Drives one resumable ingestion run against a [`SliceStore`].
pub struct Ingestor {
    config: IngestConfig,
}

impl Ingestor {
    #[must_use]
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion against `store`.
    ///
    /// Safe to re-invoke after a failed or interrupted run with the same
    /// configuration: already-committed chunks are skipped and the final
    /// store converges to that of a single uninterrupted run.
    ///
    /// # Errors
    /// Returns an error if discovery fails, the store cannot report its
    /// committed chunks, or a chunk commit fails. Unreadable input files are
    /// not errors; they are logged and skipped.
    pub fn run<S: SliceStore>(&self, store: &mut S) -> Result<IngestReport> {
        let chunk_size = self.config.chunk_size.max(1);
        let files = discover_slices(&self.config.input_dir)?;
        let committed = store
            .committed_chunks()
            .context("inspect store for committed chunks")?;
        let skip = committed.saturating_mul(chunk_size);

        let mut report = IngestReport {
            files_discovered: files.len(),
            files_resumed: skip.min(files.len()),
            ..IngestReport::default()
        };

        if skip >= files.len() {
            info!(
                "nothing to ingest: {committed} committed chunk(s) already cover all {} file(s)",
                files.len()
            );
            return Ok(report);
        }
        if skip > 0 {
            info!("resuming after {committed} committed chunk(s); skipping {skip} file(s)");
        }

        for chunk_files in files[skip..].chunks(chunk_size) {
            let chunk = self.read_chunk(chunk_files, &mut report);
            store
                .commit(&chunk)
                .with_context(|| format!("commit chunk starting at {}", chunk_start(chunk_files)))?;
            report.chunks_committed += 1;
            report.playlists_written += chunk.playlists.len();
            info!(
                "committed chunk of {} file(s) with {} playlist(s)",
                chunk_files.len(),
                chunk.playlists.len()
            );
        }

        info!(
            "ingestion complete: {} chunk(s), {} file(s) read, {} skipped",
            report.chunks_committed, report.files_read, report.files_failed
        );
        Ok(report)
    }

    /// Read one chunk's files, isolating per-file failures.
    fn read_chunk(&self, chunk_files: &[PathBuf], report: &mut IngestReport) -> Chunk {
        let mut chunk = Chunk::default();
        for path in chunk_files {
            match read_slice(path, self.config.batch_rows) {
                Ok(batches) => {
                    for batch in batches {
                        chunk.absorb(batch);
                    }
                    report.files_read += 1;
                }
                Err(err) => {
                    warn!("skipping {}: {err:#}", path.display());
                    report.files_failed += 1;
                }
            }
        }
        chunk
    }
}

fn chunk_start(chunk_files: &[PathBuf]) -> String {
    chunk_files
        .first()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<empty chunk>".to_string())
}
