//! Output store backends and the seam between them and the pipeline.
//!
//! A [`SliceStore`] owns exactly one writer handle for the duration of a
//! run. [`SliceStore::committed_chunks`] is the one formalized resume query:
//! each backend persists its own committed-chunk marker (Parquet footer
//! metadata / an `ingest_progress` row) and the pipeline never probes store
//! internals directly.

use crate::model::{PlaylistEntry, SliceBatch, SliceInfo};
use anyhow::Result;

#[cfg_attr(docsrs, doc(cfg(feature = "store-parquet")))]
#[cfg(feature = "store-parquet")]
pub mod parquet;

#[cfg_attr(docsrs, doc(cfg(feature = "store-sqlite")))]
#[cfg(feature = "store-sqlite")]
pub mod sqlite;

/// All decoded content of one chunk of input files, concatenated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chunk {
    /// Headers of the chunk's files, in file order.
    pub infos: Vec<SliceInfo>,
    /// Playlists of the chunk's files, in file order.
    pub playlists: Vec<PlaylistEntry>,
}

impl Chunk {
    /// Fold one reader batch into the chunk.
    pub fn absorb(&mut self, batch: SliceBatch) {
        if let Some(info) = batch.info {
            self.infos.push(info);
        }
        self.playlists.extend(batch.playlists);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty() && self.playlists.is_empty()
    }
}

/// An output store that commits chunks atomically and can report how many
/// it has already committed.
pub trait SliceStore {
    /// Number of chunks already committed to this store.
    ///
    /// The pipeline resumes at file index `committed_chunks * chunk_size`,
    /// so this must count exactly the commits that are fully visible.
    ///
    /// # Errors
    /// Returns an error if the store state cannot be inspected.
    fn committed_chunks(&self) -> Result<usize>;

    /// Commit one chunk as a single atomic unit.
    ///
    /// After a successful return the chunk (and the bumped committed-chunk
    /// marker) is durably visible; after an error, none of it is. An empty
    /// chunk must still be committed so the marker stays aligned with file
    /// offsets.
    ///
    /// # Errors
    /// Returns an error if the write fails; the caller treats this as fatal
    /// for the run.
    fn commit(&mut self, chunk: &Chunk) -> Result<()>;
}
