//! Row Builder: decoded records to typed row tuples for the four relations.
//!
//! Rows are plain typed values; no SQL text is ever assembled from field
//! content. The relational store binds these rows as statement parameters,
//! so untrusted strings (playlist names, URIs) never reach a command string.
//!
//! Emission order is `playlists` then `tracks` then `playlist_tracks` per
//! playlist, so that applying the vectors in struct-field order gives
//! best-effort referential completeness: every `playlist_tracks` row is
//! preceded by its playlist and track.

use crate::model::{PlaylistEntry, SliceInfo, TrackEntry};
use crate::store::Chunk;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoRow {
    pub generated_on: String,
    pub slice: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistRow {
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
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackRow {
    pub track_uri: String,
    pub track_name: String,
    pub artist_name: String,
    pub artist_uri: String,
    pub album_uri: String,
    pub album_name: String,
    pub duration_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistTrackRow {
    pub pid: i64,
    pub track_uri: String,
    pub pos: i64,
}

/// The four ordered row vectors produced from one chunk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowSet {
    pub info: Vec<InfoRow>,
    pub playlists: Vec<PlaylistRow>,
    pub tracks: Vec<TrackRow>,
    pub playlist_tracks: Vec<PlaylistTrackRow>,
}

impl RowSet {
    /// Total rows across all four relations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.info.len() + self.playlists.len() + self.tracks.len() + self.playlist_tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Flatten one chunk into row tuples for `info`, `playlists`, `tracks`, and
/// `playlist_tracks`.
///
/// A track URI appearing in several playlists yields one `TrackRow` per
/// appearance; collapsing duplicates is the store's job (insert-or-ignore),
/// not the builder's.
#[must_use]
pub fn build_rows(chunk: &Chunk) -> RowSet {
    let mut rows = RowSet::default();
    for info in &chunk.infos {
        rows.info.push(info_row(info));
    }
    for playlist in &chunk.playlists {
        rows.playlists.push(playlist_row(playlist));
        for track in &playlist.tracks {
            rows.tracks.push(track_row(track));
            rows.playlist_tracks.push(PlaylistTrackRow {
                pid: playlist.pid,
                track_uri: track.track_uri.clone(),
                pos: track.pos,
            });
        }
    }
    rows
}

fn info_row(info: &SliceInfo) -> InfoRow {
    InfoRow {
        generated_on: info.generated_on.clone(),
        slice: info.slice.clone(),
        version: info.version.clone(),
    }
}

fn playlist_row(playlist: &PlaylistEntry) -> PlaylistRow {
    PlaylistRow {
        pid: playlist.pid,
        name: playlist.name.clone(),
        collaborative: playlist.collaborative.clone(),
        modified_at: playlist.modified_at,
        num_tracks: playlist.num_tracks,
        num_albums: playlist.num_albums,
        num_followers: playlist.num_followers,
        num_edits: playlist.num_edits,
        duration_ms: playlist.duration_ms,
        num_artists: playlist.num_artists,
    }
}

fn track_row(track: &TrackEntry) -> TrackRow {
    TrackRow {
        track_uri: track.track_uri.clone(),
        track_name: track.track_name.clone(),
        artist_name: track.artist_name.clone(),
        artist_uri: track.artist_uri.clone(),
        album_uri: track.album_uri.clone(),
        album_name: track.album_name.clone(),
        duration_ms: track.duration_ms,
    }
}
