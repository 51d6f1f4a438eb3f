//! Typed records for the playlist slice format.
//!
//! A slice file carries one generation header (`info`) and a list of
//! playlists, each with a nested list of track placements. The structs here
//! mirror that shape one-to-one; they double as the columnar row type, since
//! `serde_arrow` derives the Arrow schema directly from [`PlaylistEntry`].

use serde::{Deserialize, Serialize};

/// Generation metadata carried once per slice file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceInfo {
    /// Generation timestamp; unique key of the `info` relation.
    pub generated_on: String,
    /// Slice range label, e.g. `"0-999"`.
    pub slice: String,
    /// Dataset format version, e.g. `"v1"`.
    pub version: String,
}

/// One track placement inside a playlist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackEntry {
    /// Zero-based position of the track within its playlist.
    pub pos: i64,
    pub track_name: String,
    pub track_uri: String,
    pub artist_name: String,
    pub artist_uri: String,
    pub album_uri: String,
    pub album_name: String,
    pub duration_ms: i64,
}

/// One playlist record with its nested tracks.
///
/// `collaborative` is kept as the source's string form (`"true"`/`"false"`)
/// rather than a bool; the dataset ships it as text and the stores persist
/// it unchanged. Unknown fields in the source JSON are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub pid: i64,
    pub name: String,
    pub collaborative: String,
    pub modified_at: i64,
    pub num_tracks: i64,
    pub num_albums: i64,
    pub num_followers: i64,
    pub num_edits: i64,
    pub duration_ms: i64,
    pub num_artists: i64,
    #[serde(default)]
    pub tracks: Vec<TrackEntry>,
}

/// One bounded batch of decoded records from a single input file.
///
/// Only the first batch of a file carries the `info` header; follow-up
/// batches exist purely to cap the number of rows held in memory at once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SliceBatch {
    pub info: Option<SliceInfo>,
    pub playlists: Vec<PlaylistEntry>,
}
