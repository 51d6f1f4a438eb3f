//! Shared fixtures: in-memory slice documents and on-disk slice files.

#![allow(dead_code)]

use hopper::PlaylistEntry;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// A playlist JSON object with one track per URI in `track_uris`.
pub fn playlist_json(pid: i64, name: &str, track_uris: &[&str]) -> Value {
    let tracks: Vec<Value> = track_uris
        .iter()
        .enumerate()
        .map(|(pos, uri)| {
            json!({
                "pos": pos,
                "track_name": format!("track {pos}"),
                "track_uri": uri,
                "artist_name": "artist",
                "artist_uri": "spotify:artist:a1",
                "album_uri": "spotify:album:b1",
                "album_name": "album",
                "duration_ms": 210_000,
            })
        })
        .collect();
    json!({
        "pid": pid,
        "name": name,
        "collaborative": "false",
        "modified_at": 1_493_424_000,
        "num_tracks": track_uris.len(),
        "num_albums": 1,
        "num_followers": 0,
        "num_edits": 1,
        "duration_ms": 210_000 * track_uris.len() as i64,
        "num_artists": 1,
        "tracks": tracks,
    })
}

/// A full slice document with an `info` header labelled `slice_label`.
pub fn doc_json(slice_label: &str, playlists: Vec<Value>) -> Value {
    json!({
        "info": {
            "generated_on": format!("2017-12-03 08:41:42.{}", slice_label.replace('-', "")),
            "slice": slice_label,
            "version": "v1",
        },
        "playlists": playlists,
    })
}

/// Write a slice document to `dir/name` and return its path.
pub fn write_doc(dir: &Path, name: &str, slice_label: &str, playlists: Vec<Value>) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, doc_json(slice_label, playlists).to_string()).unwrap();
    path
}

/// Decode a fixture playlist into the typed record.
pub fn playlist_entry(pid: i64, name: &str, track_uris: &[&str]) -> PlaylistEntry {
    serde_json::from_value(playlist_json(pid, name, track_uris)).unwrap()
}

/// The standard three-slice input directory: slices 0-999, 1000-1999, and
/// 2000-2999, written in shuffled name order, each with two playlists.
pub fn write_three_slices(dir: &Path) {
    write_doc(
        dir,
        "mpd.slice.2000-2999.json",
        "2000-2999",
        vec![
            playlist_json(2000, "roadtrip", &["spotify:track:t20", "spotify:track:t21"]),
            playlist_json(2001, "focus", &["spotify:track:t22"]),
        ],
    );
    write_doc(
        dir,
        "mpd.slice.0-999.json",
        "0-999",
        vec![
            playlist_json(0, "throwbacks", &["spotify:track:t00", "spotify:track:t01"]),
            playlist_json(1, "gym", &["spotify:track:t02"]),
        ],
    );
    write_doc(
        dir,
        "mpd.slice.1000-1999.json",
        "1000-1999",
        vec![
            playlist_json(1000, "study", &["spotify:track:t10"]),
            playlist_json(1001, "summer", &["spotify:track:t11", "spotify:track:t00"]),
        ],
    );
}
