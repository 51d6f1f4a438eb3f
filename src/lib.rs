//! # Hopper
//!
//! Resumable, chunked ingestion of playlist dataset slices into a columnar
//! (Parquet) or relational (SQLite) store.
//!
//! A dataset arrives as a directory of JSON "slice" files, each covering a
//! numbered sub-range of playlists. Hopper converts them into one output
//! store with a correctness contract worth stating precisely:
//! **exactly-once-effective ingestion under restart**. A run that dies —
//! crash, Ctrl-C, disk full — can simply be re-invoked and converges to the
//! same store a single uninterrupted run would have produced.
//!
//! ## How it works
//!
//! - Input files are enumerated in a total, deterministic order keyed by the
//!   slice number embedded in the file name ([`slices`]).
//! - Files are read into bounded in-memory batches ([`reader`]); a corrupt
//!   file or record is logged and skipped, never aborting the run.
//! - Files are grouped into fixed-size **chunks** (default 5) and each chunk
//!   is committed as one atomic unit: one Parquet row group, or one SQLite
//!   transaction ([`store`]). Peak memory is bounded by
//!   `chunk_size * batch_rows`, not by total input size.
//! - Before starting, the store reports how many chunks it already holds
//!   and the pipeline resumes at file index `committed_chunks * chunk_size`
//!   ([`pipeline`]). Keep `chunk_size` constant across runs against the
//!   same store.
//!
//! Duplicate keys across slice files are resolved by insert-or-ignore:
//! the first committed row wins and is never updated.
//!
//! ## Quick start
//!
//! ```no_run
//! use hopper::{IngestConfig, Ingestor, SqliteStore};
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let config = IngestConfig::new("/datasets/playlists/data");
//! let mut store = SqliteStore::open("/datasets/playlists/playlists.db")?;
//! let report = Ingestor::new(config).run(&mut store)?;
//! println!("committed {} chunk(s)", report.chunks_committed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature flags
//!
//! - `store-parquet` - Parquet output backend (Arrow-based)
//! - `store-sqlite` - SQLite output backend
//! - `compression-gzip` - transparent reading of `.json.gz` input
//!
//! ## Module overview
//!
//! - [`slices`] - input discovery and deterministic slice ordering
//! - [`reader`] - one file to bounded typed batches, failure isolation
//! - [`rows`] - typed row tuples for `info`/`playlists`/`tracks`/`playlist_tracks`
//! - [`store`] - the [`SliceStore`] seam and the two backends
//! - [`pipeline`] - the chunked, resumable run loop
//! - [`config`] - explicit run configuration

pub mod config;
pub mod model;
pub mod pipeline;
pub mod reader;
pub mod rows;
pub mod slices;
pub mod store;

// General re-exports
pub use config::IngestConfig;
pub use model::{PlaylistEntry, SliceBatch, SliceInfo, TrackEntry};
pub use pipeline::{IngestReport, Ingestor};
pub use slices::{discover_slices, slice_start};
pub use store::{Chunk, SliceStore};

// Gated re-exports
#[cfg(feature = "store-parquet")]
pub use store::parquet::ParquetStore;

#[cfg(feature = "store-sqlite")]
pub use store::sqlite::{ColumnInfo, SqliteStore};
