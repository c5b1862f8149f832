//! # Catalog Loading
//!
//! Reads catalog rows from disk. Two sources are supported:
//!
//! - **CSV**, the music sentiment dataset format, with the headers listed in
//!   [`REQUIRED_COLUMNS`] (plus an optional `User_ID`).
//! - **SQLite**, a `songs` table with the snake_case columns listed in
//!   [`REQUIRED_SQL_COLUMNS`], read in `rowid` order.
//!
//! Missing columns are reported all at once, before any row is parsed, as a
//! [`CatalogError::MissingColumns`] wrapped in the returned `anyhow::Error`.

use crate::catalog::{Catalog, SongRecord};
use crate::error::CatalogError;
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Deserialize;
use std::collections::HashSet;
use std::io;
use std::path::Path;

/// CSV headers a catalog file must have.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "Sentiment_Label",
    "Recommended_Song_ID",
    "Song_Name",
    "Artist",
    "Genre",
    "Tempo (BPM)",
    "Mood",
    "Energy",
    "Danceability",
];

/// Columns the SQLite `songs` table must have.
pub const REQUIRED_SQL_COLUMNS: [&str; 9] = [
    "sentiment_label",
    "song_id",
    "song_name",
    "artist",
    "genre",
    "tempo_bpm",
    "mood",
    "energy",
    "danceability",
];

const SQLITE_EXTENSIONS: [&str; 4] = ["db", "db3", "sqlite", "sqlite3"];

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "User_ID", default)]
    user_id: Option<String>,
    #[serde(rename = "Sentiment_Label")]
    sentiment_label: String,
    #[serde(rename = "Recommended_Song_ID")]
    song_id: String,
    #[serde(rename = "Song_Name")]
    song_name: String,
    #[serde(rename = "Artist")]
    artist: String,
    #[serde(rename = "Genre")]
    genre: String,
    #[serde(rename = "Tempo (BPM)")]
    tempo_bpm: f64,
    #[serde(rename = "Mood")]
    mood: String,
    #[serde(rename = "Energy")]
    energy: String,
    #[serde(rename = "Danceability")]
    danceability: String,
}

impl From<CsvRow> for SongRecord {
    fn from(row: CsvRow) -> Self {
        Self {
            user_id: row.user_id.filter(|id| !id.is_empty()),
            song_id: row.song_id,
            song_name: row.song_name,
            artist: row.artist,
            genre: row.genre,
            sentiment_label: row.sentiment_label,
            mood: row.mood,
            energy: row.energy,
            danceability: row.danceability,
            tempo_bpm: row.tempo_bpm,
        }
    }
}

/// Required columns absent from `present`, in declaration order.
fn missing_columns<'a>(required: &[&str], present: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let present: HashSet<&str> = present.into_iter().collect();
    required
        .iter()
        .filter(|column| !present.contains(*column))
        .map(|column| (*column).to_string())
        .collect()
}

/// Load a catalog, choosing the format from the file extension.
///
/// # Errors
///
/// I/O and parse failures, or a [`CatalogError`] if the data cannot form a catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let is_sqlite = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SQLITE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)));

    let catalog = if is_sqlite {
        load_sqlite(path)?
    } else {
        load_csv(path)?
    };

    log::info!("Loaded {} catalog rows from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Load a CSV catalog file.
///
/// # Errors
///
/// See [`read_csv`].
pub fn load_csv(path: &Path) -> Result<Catalog> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open catalog file {}", path.display()))?;
    read_csv(file).with_context(|| format!("Invalid catalog file {}", path.display()))
}

/// Parse CSV catalog data from any reader.
///
/// # Errors
///
/// Missing headers, unparsable rows, or an invalid catalog.
pub fn read_csv<R: io::Read>(reader: R) -> Result<Catalog> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers().context("Failed to read CSV headers")?.clone();
    let missing = missing_columns(&REQUIRED_COLUMNS, headers.iter());
    if !missing.is_empty() {
        return Err(CatalogError::MissingColumns(missing).into());
    }

    let mut songs = Vec::new();
    for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1.
        let row = row.with_context(|| format!("Failed to parse catalog line {}", i + 2))?;
        songs.push(SongRecord::from(row));
    }

    Ok(Catalog::new(songs)?)
}

/// Load the `songs` table of a SQLite database.
///
/// # Errors
///
/// Database errors, missing columns, or an invalid catalog.
pub fn load_sqlite(path: &Path) -> Result<Catalog> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open catalog database {}", path.display()))?;
    read_sqlite(&conn)
}

/// Read the `songs` table from an open connection.
///
/// # Errors
///
/// See [`load_sqlite`].
pub fn read_sqlite(conn: &Connection) -> Result<Catalog> {
    let columns: Vec<String> = conn
        .prepare("SELECT name FROM pragma_table_info('songs')")
        .context("Failed to inspect songs table")?
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<_>>()
        .context("Failed to read songs table columns")?;

    if columns.is_empty() {
        anyhow::bail!("Catalog database has no 'songs' table");
    }

    let missing = missing_columns(&REQUIRED_SQL_COLUMNS, columns.iter().map(String::as_str));
    if !missing.is_empty() {
        return Err(CatalogError::MissingColumns(missing).into());
    }

    let user_id = if columns.iter().any(|c| c == "user_id") {
        "CAST(user_id AS TEXT)"
    } else {
        "NULL"
    };
    let sql = format!(
        "SELECT {user_id}, CAST(song_id AS TEXT), song_name, artist, genre, sentiment_label, \
         mood, energy, danceability, tempo_bpm FROM songs ORDER BY rowid"
    );

    let mut stmt = conn.prepare(&sql).context("Failed to prepare catalog query")?;
    let songs = stmt
        .query_map([], |row| {
            Ok(SongRecord {
                user_id: row.get(0)?,
                song_id: row.get(1)?,
                song_name: row.get(2)?,
                artist: row.get(3)?,
                genre: row.get(4)?,
                sentiment_label: row.get(5)?,
                mood: row.get(6)?,
                energy: row.get(7)?,
                danceability: row.get(8)?,
                tempo_bpm: row.get(9)?,
            })
        })
        .context("Failed to query songs")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to read song row")?;

    Ok(Catalog::new(songs)?)
}
