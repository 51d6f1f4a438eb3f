//! Input slice discovery and deterministic ordering.
//!
//! Slice files embed their range in the file name (`...slice.<start>-<end>.json`).
//! Discovery enumerates `*.json` files in the input directory and orders them
//! by the numeric slice start, falling back to `0` when the name does not
//! match; ties are broken by file name. The order is total and deterministic,
//! which is what makes chunk-offset-based resume correct: every rerun must
//! enumerate files identically.

use anyhow::{Context, Result};
use glob::glob;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static SLICE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"slice\.(\d+)-").expect("slice pattern compiles"));

/// Parse the starting slice number from a file name.
///
/// Returns `0` when the name does not contain a `slice.<digits>-` segment
/// (or the digits overflow); malformed names must not block ingestion of the
/// matched ones.
///
/// # Examples
///
/// ```
/// use hopper::slices::slice_start;
///
/// assert_eq!(slice_start("mpd.slice.1000-1999.json"), 1000);
/// assert_eq!(slice_start("notes.json"), 0);
/// ```
#[must_use]
pub fn slice_start(name: &str) -> u64 {
    SLICE_START
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Enumerate the input directory's slice files in ingestion order.
///
/// Matches `*.json` (plus `*.json.gz` when the `compression-gzip` feature is
/// enabled), keeps regular files only, and sorts by `(slice_start, file name)`.
///
/// # Errors
/// Returns an error if the directory path cannot be turned into a valid glob
/// pattern or an entry cannot be read. A directory with no matches yields an
/// empty vector, not an error.
pub fn discover_slices(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for pattern in slice_patterns(input_dir) {
        let paths = glob(&pattern).with_context(|| format!("invalid glob pattern: {pattern}"))?;
        for entry in paths {
            let path = entry
                .with_context(|| format!("error reading glob entry for pattern: {pattern}"))?;
            if path.is_file() {
                out.push(path);
            }
        }
    }
    out.sort_by_key(|path| sort_key(path));
    Ok(out)
}

fn slice_patterns(input_dir: &Path) -> Vec<String> {
    let mut patterns = vec![input_dir.join("*.json").display().to_string()];
    if cfg!(feature = "compression-gzip") {
        patterns.push(input_dir.join("*.json.gz").display().to_string());
    }
    patterns
}

fn sort_key(path: &Path) -> (u64, String) {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    (slice_start(name), name.to_string())
}
