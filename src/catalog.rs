//! # Catalog Store
//!
//! The static set of songs that recommendations are drawn from. A [`Catalog`]
//! is built once at startup from rows supplied by [`crate::loader`] and is
//! never mutated afterwards, so it can be shared freely between threads.
//!
//! Rows are kept in source order. The same song (same name and artist) may
//! appear many times, once per listening session in the original dataset;
//! those duplicates are preserved here and only collapsed when results are
//! assembled.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// One row of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
    /// Listening-session context the row came from. Not used for ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Opaque identifier; not unique across rows.
    pub song_id: String,
    pub song_name: String,
    pub artist: String,
    pub genre: String,
    /// Coarse mood category (Happy, Sad, Relaxed, Motivated, ...).
    pub sentiment_label: String,
    /// Fine-grained mood (Joyful, Melancholic, Calm, ...).
    pub mood: String,
    /// Ordered category: Low / Medium / High.
    pub energy: String,
    pub danceability: String,
    pub tempo_bpm: f64,
}

impl SongRecord {
    /// Identity used for deduplication.
    #[must_use]
    pub fn key(&self) -> (&str, &str) {
        (&self.song_name, &self.artist)
    }
}

/// Immutable, non-empty collection of [`SongRecord`]s.
#[derive(Debug, Clone)]
pub struct Catalog {
    songs: Vec<SongRecord>,
}

impl Catalog {
    /// Validate and wrap the loaded rows.
    ///
    /// # Errors
    ///
    /// * [`CatalogError::Empty`] if `songs` is empty
    /// * [`CatalogError::InvalidTempo`] if any tempo is not a positive finite number
    pub fn new(songs: Vec<SongRecord>) -> Result<Self, CatalogError> {
        if songs.is_empty() {
            return Err(CatalogError::Empty);
        }

        if let Some((row, song)) = songs
            .iter()
            .enumerate()
            .find(|(_, song)| !(song.tempo_bpm.is_finite() && song.tempo_bpm > 0.0))
        {
            return Err(CatalogError::InvalidTempo { row, value: song.tempo_bpm });
        }

        log::debug!("Catalog accepted {} rows", songs.len());
        Ok(Self { songs })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Always false for a constructed catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    #[must_use]
    pub fn songs(&self) -> &[SongRecord] {
        &self.songs
    }

    /// Row at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds. Indexes come from the catalog itself,
    /// so an out-of-range index is a bug.
    #[must_use]
    pub fn song(&self, idx: usize) -> &SongRecord {
        &self.songs[idx]
    }

    /// Number of distinct (song name, artist) pairs.
    #[must_use]
    pub fn unique_song_count(&self) -> usize {
        self.songs.iter().map(SongRecord::key).collect::<HashSet<_>>().len()
    }

    /// Distinct sentiment labels in the order they first appear.
    #[must_use]
    pub fn sentiment_labels(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.songs
            .iter()
            .map(|song| song.sentiment_label.as_str())
            .filter(|label| seen.insert(*label))
            .collect()
    }

    /// Distinct energy levels, sorted.
    #[must_use]
    pub fn energy_levels(&self) -> Vec<&str> {
        sorted_distinct(self.songs.iter().map(|song| song.energy.as_str()))
    }

    /// Distinct genres, sorted.
    #[must_use]
    pub fn genres(&self) -> Vec<&str> {
        sorted_distinct(self.songs.iter().map(|song| song.genre.as_str()))
    }
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    values.collect::<BTreeSet<_>>().into_iter().collect()
}
