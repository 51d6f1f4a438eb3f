#![cfg(feature = "store-parquet")]

//! Tests for the Parquet backend: row-group-per-chunk commits, the footer
//! resume marker, and atomic publication.

mod common;

use anyhow::Result;
use common::playlist_entry;
use hopper::{Chunk, ParquetStore, SliceStore};
use tempfile::TempDir;

fn chunk_of(playlists: Vec<hopper::PlaylistEntry>) -> Chunk {
    Chunk {
        infos: vec![],
        playlists,
    }
}

#[test]
fn fresh_store_has_no_committed_chunks() -> Result<()> {
    let dir = TempDir::new()?;
    let store = ParquetStore::new(dir.path().join("out.parquet"));
    assert_eq!(store.committed_chunks()?, 0);
    Ok(())
}

#[test]
fn each_commit_adds_one_row_group() -> Result<()> {
    let dir = TempDir::new()?;
    let mut store = ParquetStore::new(dir.path().join("out.parquet"));

    let first = vec![
        playlist_entry(0, "throwbacks", &["spotify:track:t1", "spotify:track:t2"]),
        playlist_entry(1, "gym", &["spotify:track:t3"]),
    ];
    store.commit(&chunk_of(first.clone()))?;
    assert_eq!(store.committed_chunks()?, 1);
    assert_eq!(store.row_groups()?, 1);

    let second = vec![playlist_entry(2, "study", &["spotify:track:t4"])];
    store.commit(&chunk_of(second.clone()))?;
    assert_eq!(store.committed_chunks()?, 2);
    assert_eq!(store.row_groups()?, 2);

    // Earlier chunks are carried over untouched and order is preserved.
    let mut expected = first;
    expected.extend(second);
    assert_eq!(store.read_playlists()?, expected);
    Ok(())
}

#[test]
fn nested_tracks_round_trip() -> Result<()> {
    let dir = TempDir::new()?;
    let mut store = ParquetStore::new(dir.path().join("out.parquet"));
    let playlists = vec![playlist_entry(
        5,
        "nested",
        &["spotify:track:a", "spotify:track:b", "spotify:track:c"],
    )];
    store.commit(&chunk_of(playlists.clone()))?;

    let back = store.read_playlists()?;
    assert_eq!(back, playlists);
    assert_eq!(back[0].tracks.len(), 3);
    assert_eq!(back[0].tracks[2].pos, 2);
    Ok(())
}

#[test]
fn empty_chunk_advances_the_marker_without_a_row_group() -> Result<()> {
    let dir = TempDir::new()?;
    let mut store = ParquetStore::new(dir.path().join("out.parquet"));

    let playlists = vec![playlist_entry(0, "kept", &["spotify:track:t1"])];
    store.commit(&chunk_of(playlists.clone()))?;
    store.commit(&Chunk::default())?;

    assert_eq!(store.committed_chunks()?, 2);
    assert_eq!(store.row_groups()?, 1);
    assert_eq!(store.read_playlists()?, playlists);

    // A later non-empty chunk still lands as its own group.
    store.commit(&chunk_of(vec![playlist_entry(1, "later", &[])]))?;
    assert_eq!(store.committed_chunks()?, 3);
    assert_eq!(store.row_groups()?, 2);
    Ok(())
}

#[test]
fn marker_survives_reopening_the_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("out.parquet");
    {
        let mut store = ParquetStore::new(&path);
        store.commit(&chunk_of(vec![playlist_entry(0, "kept", &[])]))?;
        store.commit(&chunk_of(vec![playlist_entry(1, "also kept", &[])]))?;
    }
    let store = ParquetStore::new(&path);
    assert_eq!(store.committed_chunks()?, 2);
    assert_eq!(store.read_playlists()?.len(), 2);
    Ok(())
}

#[test]
fn commit_publishes_atomically_with_no_leftover_temp_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("out.parquet");
    let mut store = ParquetStore::new(&path);
    store.commit(&chunk_of(vec![playlist_entry(0, "only", &[])]))?;

    let entries: Vec<_> = std::fs::read_dir(dir.path())?
        .map(|e| e.unwrap().file_name().to_str().unwrap().to_string())
        .collect();
    assert_eq!(entries, vec!["out.parquet"]);
    Ok(())
}
