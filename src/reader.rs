//! Record Reader: one input file to bounded, typed in-memory batches.
//!
//! Two file conventions are supported, matching how slices were distributed:
//! a single document object (`{"info": ..., "playlists": [...]}`) and
//! line-delimited JSON with one playlist record per line. Gzip-compressed
//! input (`.gz`) is decompressed transparently when the `compression-gzip`
//! feature is enabled.
//!
//! Failure isolation happens at two levels:
//! - A file whose content is not valid JSON (or not one of the two shapes)
//!   is an error for the *caller* to log and skip; no partial batches are
//!   returned for it.
//! - A playlist element that is valid JSON but fails typed decoding (e.g.
//!   missing `pid`) is rejected and logged here, while its siblings in the
//!   same file survive.

use crate::model::{PlaylistEntry, SliceBatch, SliceInfo};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Read one slice file into batches of at most `batch_rows` playlists.
///
/// Only the first batch carries the file's `info` header. A file with a
/// header but no playlists still yields one (playlist-empty) batch so the
/// header is not lost; an empty file yields no batches.
///
/// # Errors
/// Returns an error if the file cannot be opened or read, or if its content
/// is not valid JSON in either supported shape. Per-record decode failures
/// are not errors; they are logged and skipped.
pub fn read_slice(path: &Path, batch_rows: usize) -> Result<Vec<SliceBatch>> {
    let text = read_input(path)?;
    let (info, values) = split_records(&text, path)?;

    let mut playlists = Vec::new();
    for value in values {
        match serde_json::from_value::<PlaylistEntry>(value) {
            Ok(playlist) => playlists.push(playlist),
            Err(err) => {
                warn!("{}: rejecting playlist record: {err}", path.display());
            }
        }
    }

    Ok(into_batches(info, playlists, batch_rows))
}

/// Read a file's full content, decompressing `.gz` input when the
/// `compression-gzip` feature is enabled.
fn read_input(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut reader = wrap_reader(file, path);
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .with_context(|| format!("read {}", path.display()))?;
    Ok(text)
}

#[cfg(feature = "compression-gzip")]
fn wrap_reader(file: File, path: &Path) -> Box<dyn Read> {
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz")) {
        Box::new(flate2::read::GzDecoder::new(file))
    } else {
        Box::new(file)
    }
}

#[cfg(not(feature = "compression-gzip"))]
fn wrap_reader(file: File, _path: &Path) -> Box<dyn Read> {
    Box::new(file)
}

/// Split file content into an optional `info` header and raw playlist values.
///
/// Content that parses as one JSON object with a `playlists` array is a
/// document; one object without it is a single playlist record. Anything
/// else is treated as line-delimited records, where any unparseable line
/// poisons the whole file.
fn split_records(text: &str, path: &Path) -> Result<(Option<SliceInfo>, Vec<Value>)> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return match value {
            Value::Object(mut doc) if doc.contains_key("playlists") => {
                let info = doc.remove("info").and_then(|raw| decode_info(raw, path));
                match doc.remove("playlists") {
                    Some(Value::Array(values)) => Ok((info, values)),
                    _ => bail!("{}: \"playlists\" is not an array", path.display()),
                }
            }
            obj @ Value::Object(_) => Ok((None, vec![obj])),
            other => bail!(
                "{}: expected a slice document or line-delimited records, got {}",
                path.display(),
                json_kind(&other)
            ),
        };
    }

    // Line-delimited: every non-empty line must be a JSON object.
    let mut values = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("parse line {} in {}", i + 1, path.display()))?;
        values.push(value);
    }
    Ok((None, values))
}

fn decode_info(raw: Value, path: &Path) -> Option<SliceInfo> {
    match serde_json::from_value(raw) {
        Ok(info) => Some(info),
        Err(err) => {
            warn!("{}: rejecting info header: {err}", path.display());
            None
        }
    }
}

fn into_batches(
    mut info: Option<SliceInfo>,
    playlists: Vec<PlaylistEntry>,
    batch_rows: usize,
) -> Vec<SliceBatch> {
    let batch_rows = batch_rows.max(1);
    if playlists.is_empty() {
        return match info.take() {
            Some(info) => vec![SliceBatch {
                info: Some(info),
                playlists: Vec::new(),
            }],
            None => Vec::new(),
        };
    }

    let mut batches = Vec::with_capacity(playlists.len().div_ceil(batch_rows));
    let mut current = Vec::new();
    for playlist in playlists {
        current.push(playlist);
        if current.len() == batch_rows {
            batches.push(SliceBatch {
                info: info.take(),
                playlists: std::mem::take(&mut current),
            });
        }
    }
    if !current.is_empty() {
        batches.push(SliceBatch {
            info: info.take(),
            playlists: current,
        });
    }
    batches
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
