//! # Feature Encoder
//!
//! Turns every catalog row into a 5-dimensional numeric vector:
//!
//! ```text
//! [genre_code, mood_code, energy_code, danceability_code, tempo_z]
//! ```
//!
//! Categorical codes are the rank of the value among the distinct values of
//! that column, sorted lexicographically, so the same catalog snapshot always
//! encodes the same way. Codes are only meaningful within one encoder; a
//! re-fit on a different snapshot may renumber everything.
//!
//! Tempo is standardized: `(bpm - mean) / std` using the population standard
//! deviation. A catalog where every song has the same tempo encodes tempo as
//! `0.0` everywhere.

use crate::catalog::{Catalog, SongRecord};
use std::collections::BTreeMap;

/// Dimensionality of a [`FeatureVector`].
pub const FEATURE_DIM: usize = 5;

/// Encoded features of a single song.
pub type FeatureVector = [f64; FEATURE_DIM];

/// Deterministic string -> integer code mapping for one categorical column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCodes {
    codes: BTreeMap<String, u32>,
}

impl CategoryCodes {
    /// Learn the vocabulary from `values`.
    pub fn fit<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut codes: BTreeMap<String, u32> = values
            .into_iter()
            .map(|value| (value.to_string(), 0))
            .collect();

        // BTreeMap iterates in key order, which fixes the numbering.
        for (code, slot) in (0u32..).zip(codes.values_mut()) {
            *slot = code;
        }

        Self { codes }
    }

    #[must_use]
    pub fn code(&self, value: &str) -> Option<u32> {
        self.codes.get(value).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Known values in code order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.codes.keys().map(String::as_str)
    }
}

/// Standard-score transform for tempo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoScaler {
    pub mean: f64,
    pub std: f64,
}

impl TempoScaler {
    /// # Panics
    ///
    /// Panics on an empty slice; catalogs are never empty.
    #[must_use]
    pub fn fit(values: &[f64]) -> Self {
        assert!(!values.is_empty(), "cannot fit tempo scaler on no values");

        #[allow(clippy::cast_precision_loss)]
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Self { mean, std: variance.sqrt() }
    }

    #[must_use]
    pub fn transform(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            (value - self.mean) / self.std
        }
    }

    /// True when every fitted tempo was (numerically) the same.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.std <= f64::EPSILON * self.mean.abs().max(1.0)
    }
}

/// Fitted encoder plus the encoded catalog, row-aligned with [`Catalog::songs`].
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    pub genre: CategoryCodes,
    pub mood: CategoryCodes,
    pub energy: CategoryCodes,
    pub danceability: CategoryCodes,
    pub tempo: TempoScaler,
    vectors: Vec<FeatureVector>,
}

impl FeatureEncoder {
    /// Fit the vocabularies and scaler on `catalog` and encode every row.
    #[must_use]
    pub fn fit(catalog: &Catalog) -> Self {
        let songs = catalog.songs();

        let genre = CategoryCodes::fit(songs.iter().map(|s| s.genre.as_str()));
        let mood = CategoryCodes::fit(songs.iter().map(|s| s.mood.as_str()));
        let energy = CategoryCodes::fit(songs.iter().map(|s| s.energy.as_str()));
        let danceability = CategoryCodes::fit(songs.iter().map(|s| s.danceability.as_str()));
        let tempos: Vec<f64> = songs.iter().map(|s| s.tempo_bpm).collect();
        let tempo = TempoScaler::fit(&tempos);

        let mut encoder = Self {
            genre,
            mood,
            energy,
            danceability,
            tempo,
            vectors: Vec::with_capacity(songs.len()),
        };

        let vectors = songs
            .iter()
            .map(|song| {
                encoder
                    .encode(song)
                    .unwrap_or_else(|| unreachable!("vocabulary was fitted on this row"))
            })
            .collect();
        encoder.vectors = vectors;

        log::info!(
            "Encoded {} rows ({} genres, {} moods, {} energy levels, {} danceability levels, tempo mean {:.1} std {:.1})",
            songs.len(),
            encoder.genre.len(),
            encoder.mood.len(),
            encoder.energy.len(),
            encoder.danceability.len(),
            encoder.tempo.mean,
            encoder.tempo.std,
        );

        encoder
    }

    /// Encode `song` against the fitted vocabulary. `None` if any of its
    /// categories was not seen during fitting.
    #[must_use]
    pub fn encode(&self, song: &SongRecord) -> Option<FeatureVector> {
        Some([
            f64::from(self.genre.code(&song.genre)?),
            f64::from(self.mood.code(&song.mood)?),
            f64::from(self.energy.code(&song.energy)?),
            f64::from(self.danceability.code(&song.danceability)?),
            self.tempo.transform(song.tempo_bpm),
        ])
    }

    /// Encoded catalog, one vector per row.
    #[must_use]
    pub fn vectors(&self) -> &[FeatureVector] {
        &self.vectors
    }

    #[must_use]
    pub fn vector(&self, idx: usize) -> &FeatureVector {
        &self.vectors[idx]
    }
}
