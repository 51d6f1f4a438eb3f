//! Columnar store: one Parquet file, one row group per committed chunk.
//!
//! A Parquet footer cannot be extended in place, so a commit rewrites the
//! store: existing row groups are streamed through one at a time into a
//! temporary sibling file (preserving group boundaries), the new chunk is
//! appended as one more group, and the temporary file is renamed over the
//! store. The rename is the commit point; a crash mid-commit leaves the
//! previous file intact, so a chunk is either fully visible or absent.
//!
//! The committed-chunk count is persisted in the footer's key-value
//! metadata and is the authoritative resume marker: writers do not emit
//! zero-row groups, so a chunk whose files all failed to read would
//! otherwise not advance the row-group count even though it consumed file
//! offsets. For files written by other tools (no marker) the row-group
//! count is used instead.
//!
//! The row schema is derived from [`PlaylistEntry`] via `serde_arrow`
//! (`SchemaLike::from_type`), making it identical for every chunk.

use crate::model::PlaylistEntry;
use crate::store::{Chunk, SliceStore};
use anyhow::{Context, Result};
use arrow::datatypes::FieldRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use serde_arrow::schema::{SchemaLike, TracingOptions};
use serde_arrow::{from_record_batch, to_record_batch};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Footer metadata key holding the committed-chunk count.
const CHUNKS_KEY: &str = "hopper.committed_chunks";

/// Parquet-backed slice store.
pub struct ParquetStore {
    path: PathBuf,
}

impl ParquetStore {
    /// Store backed by the Parquet file at `path` (created on first commit).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole store back into typed playlist rows.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, batch iteration fails,
    /// or a batch does not deserialize to [`PlaylistEntry`].
    pub fn read_playlists(&self) -> Result<Vec<PlaylistEntry>> {
        let file =
            File::open(&self.path).with_context(|| format!("open {}", self.path.display()))?;
        let mut reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .context("open ParquetRecordBatchReader")?
            .with_batch_size(64 * 1024)
            .build()
            .context("build ParquetRecordBatchReader")?;

        let mut out: Vec<PlaylistEntry> = Vec::new();
        while let Some(batch) = reader.next().transpose().context("read next batch")? {
            let mut rows: Vec<PlaylistEntry> =
                from_record_batch(&batch).context("deserialize RecordBatch rows")?;
            out.append(&mut rows);
        }
        Ok(out)
    }

    /// Number of row groups in the backing file (0 if absent).
    ///
    /// # Errors
    /// Returns an error if the file exists but its metadata cannot be read.
    pub fn row_groups(&self) -> Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }
        let file =
            File::open(&self.path).with_context(|| format!("open {}", self.path.display()))?;
        let reader = SerializedFileReader::new(file).context("read parquet metadata")?;
        Ok(reader.metadata().num_row_groups())
    }

    fn footer_marker(&self) -> Result<Option<usize>> {
        let file =
            File::open(&self.path).with_context(|| format!("open {}", self.path.display()))?;
        let reader = SerializedFileReader::new(file).context("read parquet metadata")?;
        let marker = reader
            .metadata()
            .file_metadata()
            .key_value_metadata()
            .and_then(|kvs| kvs.iter().find(|kv| kv.key == CHUNKS_KEY))
            .and_then(|kv| kv.value.as_deref())
            .and_then(|v| v.parse::<usize>().ok());
        Ok(marker)
    }

    /// Stream every row group of the current file into `writer`, one output
    /// group per input group.
    fn carry_over_groups(&self, writer: &mut ArrowWriter<File>) -> Result<()> {
        let groups = self.row_groups()?;
        for group in 0..groups {
            let file =
                File::open(&self.path).with_context(|| format!("open {}", self.path.display()))?;
            let mut reader = ParquetRecordBatchReaderBuilder::try_new(file)
                .context("open ParquetRecordBatchReader")?
                .with_row_groups(vec![group])
                .with_batch_size(64 * 1024)
                .build()
                .with_context(|| format!("build reader for row group {group}"))?;
            while let Some(batch) = reader
                .next()
                .transpose()
                .with_context(|| format!("read row group {group}"))?
            {
                writer
                    .write(&batch)
                    .with_context(|| format!("carry over row group {group}"))?;
            }
            // Seal this group so carried-over chunk boundaries survive.
            writer
                .flush()
                .with_context(|| format!("flush row group {group}"))?;
        }
        Ok(())
    }
}

impl SliceStore for ParquetStore {
    fn committed_chunks(&self) -> Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }
        match self.footer_marker()? {
            Some(chunks) => Ok(chunks),
            None => self.row_groups(),
        }
    }

    fn commit(&mut self, chunk: &Chunk) -> Result<()> {
        let fields: Vec<FieldRef> =
            Vec::<FieldRef>::from_type::<PlaylistEntry>(TracingOptions::default())
                .context("infer Arrow schema for playlist rows")?;
        let batch: RecordBatch =
            to_record_batch(&fields, &chunk.playlists).context("convert playlists to RecordBatch")?;

        let committed = self.committed_chunks()?;
        let tmp = self.path.with_extension("parquet.tmp");
        let out = File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
        let props = WriterProperties::builder().build();
        let mut writer = ArrowWriter::try_new(out, batch.schema(), Some(props))
            .context("create ArrowWriter")?;

        if self.path.exists() {
            self.carry_over_groups(&mut writer)?;
        }

        // A zero-row batch does not open a row group; the footer marker
        // still advances, keeping resume offsets aligned.
        writer.write(&batch).context("write chunk batch")?;
        writer.append_key_value_metadata(KeyValue::new(
            CHUNKS_KEY.to_string(),
            (committed + 1).to_string(),
        ));
        writer.close().context("close ArrowWriter")?;

        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("publish {}", self.path.display()))?;
        Ok(())
    }
}
