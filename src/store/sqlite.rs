//! Relational store: the four relations in one embedded SQLite file.
//!
//! Unique keys are enforced by `INSERT OR IGNORE` (first write wins, never
//! update), and every chunk is applied inside a single transaction together
//! with the `ingest_progress` marker bump, so a chunk either becomes fully
//! visible or not at all. Row values are bound as statement parameters;
//! field content never appears in SQL text.

use crate::rows::build_rows;
use crate::store::{Chunk, SliceStore};
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS info (
    generated_on TEXT PRIMARY KEY,
    slice        TEXT NOT NULL,
    version      TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS playlists (
    pid           INTEGER PRIMARY KEY,
    name          TEXT NOT NULL,
    collaborative TEXT NOT NULL,
    modified_at   INTEGER NOT NULL,
    num_tracks    INTEGER NOT NULL,
    num_albums    INTEGER NOT NULL,
    num_followers INTEGER NOT NULL,
    num_edits     INTEGER NOT NULL,
    duration_ms   INTEGER NOT NULL,
    num_artists   INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS tracks (
    track_uri   TEXT PRIMARY KEY,
    track_name  TEXT NOT NULL,
    artist_name TEXT NOT NULL,
    artist_uri  TEXT NOT NULL,
    album_uri   TEXT NOT NULL,
    album_name  TEXT NOT NULL,
    duration_ms INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS playlist_tracks (
    pid       INTEGER NOT NULL,
    track_uri TEXT NOT NULL,
    pos       INTEGER NOT NULL,
    PRIMARY KEY (pid, track_uri)
) WITHOUT ROWID;
CREATE TABLE IF NOT EXISTS ingest_progress (
    id               INTEGER PRIMARY KEY CHECK (id = 1),
    chunks_committed INTEGER NOT NULL
);
";

/// One `(schema, table, column, type)` row from [`SqliteStore::schema_columns`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnInfo {
    pub schema: String,
    pub table: String,
    pub column: String,
    pub data_type: String,
}

/// SQLite-backed slice store.
///
/// Holds the single writer connection for the duration of a run; dropping
/// the store releases it.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or the schema DDL
    /// fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn =
            Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        Self::with_connection(conn)
    }

    /// In-memory store, useful for tests and dry runs.
    ///
    /// # Errors
    /// Returns an error if the connection cannot be created or the schema
    /// DDL fails.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory().context("open in-memory database")?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).context("create store schema")?;
        Ok(Self { conn })
    }

    /// The underlying connection, for read-only collaborators (ad-hoc
    /// queries, profiling). Concurrent writers are not supported.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Describe every table of the completed store as
    /// `(schema, table, column, type)` rows, for external profiling and
    /// reporting tooling.
    ///
    /// # Errors
    /// Returns an error if the catalog query fails.
    pub fn schema_columns(&self) -> Result<Vec<ColumnInfo>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT m.name, p.name, p.type
                 FROM sqlite_master AS m
                 JOIN pragma_table_info(m.name) AS p
                 WHERE m.type = 'table' AND m.name NOT LIKE 'sqlite_%'
                 ORDER BY m.name, p.cid",
            )
            .context("prepare schema introspection query")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ColumnInfo {
                    schema: "main".to_string(),
                    table: row.get(0)?,
                    column: row.get(1)?,
                    data_type: row.get(2)?,
                })
            })
            .context("run schema introspection query")?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("read schema introspection row")?);
        }
        Ok(out)
    }
}

fn apply_rows(tx: &Transaction<'_>, chunk: &Chunk) -> Result<()> {
    let rows = build_rows(chunk);

    let mut info = tx
        .prepare_cached(
            "INSERT OR IGNORE INTO info (generated_on, slice, version) VALUES (?1, ?2, ?3)",
        )
        .context("prepare info upsert")?;
    for row in &rows.info {
        info.execute(params![row.generated_on, row.slice, row.version])
            .context("insert info row")?;
    }

    let mut playlists = tx
        .prepare_cached(
            "INSERT OR IGNORE INTO playlists
             (pid, name, collaborative, modified_at, num_tracks, num_albums,
              num_followers, num_edits, duration_ms, num_artists)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .context("prepare playlists upsert")?;
    for row in &rows.playlists {
        playlists
            .execute(params![
                row.pid,
                row.name,
                row.collaborative,
                row.modified_at,
                row.num_tracks,
                row.num_albums,
                row.num_followers,
                row.num_edits,
                row.duration_ms,
                row.num_artists,
            ])
            .context("insert playlist row")?;
    }

    let mut tracks = tx
        .prepare_cached(
            "INSERT OR IGNORE INTO tracks
             (track_uri, track_name, artist_name, artist_uri, album_uri, album_name, duration_ms)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .context("prepare tracks upsert")?;
    for row in &rows.tracks {
        tracks
            .execute(params![
                row.track_uri,
                row.track_name,
                row.artist_name,
                row.artist_uri,
                row.album_uri,
                row.album_name,
                row.duration_ms,
            ])
            .context("insert track row")?;
    }

    let mut playlist_tracks = tx
        .prepare_cached(
            "INSERT OR IGNORE INTO playlist_tracks (pid, track_uri, pos) VALUES (?1, ?2, ?3)",
        )
        .context("prepare playlist_tracks upsert")?;
    for row in &rows.playlist_tracks {
        playlist_tracks
            .execute(params![row.pid, row.track_uri, row.pos])
            .context("insert playlist_tracks row")?;
    }

    tx.execute(
        "INSERT INTO ingest_progress (id, chunks_committed) VALUES (1, 1)
         ON CONFLICT (id) DO UPDATE SET chunks_committed = chunks_committed + 1",
        [],
    )
    .context("bump committed-chunk marker")?;
    Ok(())
}

impl SliceStore for SqliteStore {
    fn committed_chunks(&self) -> Result<usize> {
        let committed: Option<i64> = self
            .conn
            .query_row(
                "SELECT chunks_committed FROM ingest_progress WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()
            .context("query committed-chunk marker")?;
        Ok(committed.unwrap_or(0).max(0) as usize)
    }

    fn commit(&mut self, chunk: &Chunk) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .context("begin chunk transaction")?;
        apply_rows(&tx, chunk)?;
        tx.commit().context("commit chunk transaction")
    }
}
