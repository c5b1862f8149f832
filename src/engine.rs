//! # Recommendation Engine
//!
//! Turns a mood / energy / genre request into an ordered list of distinct
//! songs. The pipeline, in order:
//!
//! 1. **Filter** ([`crate::filter`]): mood is hard, energy and genre are soft.
//! 2. **Deduplicate** on (song name, artist), first catalog occurrence wins.
//! 3. **Shuffle** the unique pool.
//! 4. **Rank** only if the pool is larger than requested: each candidate
//!    scores the mean of its similarity row against the *whole* catalog,
//!    multiplied by a random factor in `[jitter_min, jitter_max]`.
//! 5. **Assemble** summaries, dropping any repeated (song name, artist).
//!
//! Randomness is passed in, so tests can use a seeded generator while the
//! default entry point draws from a call-local thread RNG. Nothing shared is
//! mutated during a call.

use crate::catalog::{Catalog, SongRecord};
use crate::encoder::FeatureEncoder;
use crate::error::RequestError;
use crate::filter::{FieldFilter, FilterPipeline, MoodFilter, SongField};
use crate::similarity::SimilarityIndex;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

/// Results returned when the caller does not ask for a specific count.
pub const DEFAULT_RESULT_COUNT: usize = 10;

/// Genre value meaning "any genre".
pub const ALL_GENRES: &str = "All";

/// A single recommendation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub mood: String,
    pub energy: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default = "default_result_count")]
    pub result_count: usize,
}

fn default_result_count() -> usize {
    DEFAULT_RESULT_COUNT
}

impl RecommendationRequest {
    #[must_use]
    pub fn new(mood: impl Into<String>, energy: impl Into<String>) -> Self {
        Self {
            mood: mood.into(),
            energy: energy.into(),
            genre: None,
            result_count: DEFAULT_RESULT_COUNT,
        }
    }

    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    #[must_use]
    pub fn with_result_count(mut self, result_count: usize) -> Self {
        self.result_count = result_count;
        self
    }

    /// # Errors
    ///
    /// Blank mood or energy, or a zero result count.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.mood.trim().is_empty() {
            return Err(RequestError::MissingMood);
        }
        if self.energy.trim().is_empty() {
            return Err(RequestError::MissingEnergy);
        }
        if self.result_count == 0 {
            return Err(RequestError::ZeroResultCount);
        }
        Ok(())
    }

    /// Genre to filter on, `None` for empty or [`ALL_GENRES`].
    #[must_use]
    pub fn genre_filter(&self) -> Option<&str> {
        self.genre
            .as_deref()
            .map(str::trim)
            .filter(|genre| !genre.is_empty() && !genre.eq_ignore_ascii_case(ALL_GENRES))
    }

    fn pipeline(&self) -> FilterPipeline {
        let pipeline = FilterPipeline::new()
            .stage(MoodFilter::new(self.mood.trim()))
            .stage(FieldFilter::new(SongField::Energy, self.energy.trim()));

        match self.genre_filter() {
            Some(genre) => pipeline.stage(FieldFilter::new(SongField::Genre, genre)),
            None => pipeline,
        }
    }
}

/// What the caller sees for each recommended song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongSummary {
    pub song_id: String,
    pub song_name: String,
    pub artist: String,
    pub genre: String,
    pub tempo: i64,
    pub mood: String,
    pub energy: String,
    pub danceability: String,
    pub sentiment: String,
}

impl From<&SongRecord> for SongSummary {
    #[allow(clippy::cast_possible_truncation)]
    fn from(song: &SongRecord) -> Self {
        Self {
            song_id: song.song_id.clone(),
            song_name: song.song_name.clone(),
            artist: song.artist.clone(),
            genre: song.genre.clone(),
            tempo: song.tempo_bpm.trunc() as i64,
            mood: song.mood.clone(),
            energy: song.energy.clone(),
            danceability: song.danceability.clone(),
            sentiment: song.sentiment_label.clone(),
        }
    }
}

/// Result list plus a human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub message: String,
    pub recommendations: Vec<SongSummary>,
}

impl From<Vec<SongSummary>> for RecommendationResponse {
    fn from(recommendations: Vec<SongSummary>) -> Self {
        let message = if recommendations.is_empty() {
            "No songs found matching your preferences. Try different criteria.".to_string()
        } else {
            format!("Found {} recommendations for you!", recommendations.len())
        };
        Self { message, recommendations }
    }
}

/// Bounds of the random factor applied to ranking scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingConfig {
    pub jitter_min: f64,
    pub jitter_max: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            jitter_min: 0.85,
            jitter_max: 1.15,
        }
    }
}

impl RankingConfig {
    fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.jitter_min < self.jitter_max {
            rng.gen_range(self.jitter_min..=self.jitter_max)
        } else {
            self.jitter_min
        }
    }
}

/// Catalog, encoder and similarity index built together and never changed.
#[derive(Debug)]
pub struct Recommender {
    catalog: Catalog,
    encoder: FeatureEncoder,
    index: SimilarityIndex,
    ranking: RankingConfig,
}

impl Recommender {
    /// Encode `catalog` and build its similarity index. This is the startup
    /// barrier; it runs once before any request is served.
    #[must_use]
    pub fn build(catalog: Catalog) -> Self {
        let started = Instant::now();
        let encoder = FeatureEncoder::fit(&catalog);
        let index = SimilarityIndex::build(encoder.vectors());

        log::info!(
            "Recommender ready: {} entries, {} unique songs ({:.2?})",
            catalog.len(),
            catalog.unique_song_count(),
            started.elapsed()
        );

        Self {
            catalog,
            encoder,
            index,
            ranking: RankingConfig::default(),
        }
    }

    #[must_use]
    pub fn with_ranking(mut self, ranking: RankingConfig) -> Self {
        self.ranking = ranking;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    #[must_use]
    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    #[must_use]
    pub fn ranking(&self) -> RankingConfig {
        self.ranking
    }

    /// Recommend using a fresh thread-local RNG.
    ///
    /// # Errors
    ///
    /// Only [`RequestError`]; no matches is `Ok(vec![])`.
    pub fn recommend(&self, request: &RecommendationRequest) -> Result<Vec<SongSummary>, RequestError> {
        self.recommend_with(request, &mut rand::thread_rng())
    }

    /// Recommend using the supplied randomness source.
    ///
    /// # Errors
    ///
    /// Only [`RequestError`]; no matches is `Ok(vec![])`.
    pub fn recommend_with<R: Rng + ?Sized>(
        &self,
        request: &RecommendationRequest,
        rng: &mut R,
    ) -> Result<Vec<SongSummary>, RequestError> {
        request.validate()?;

        let candidates = request.pipeline().run(&self.catalog);
        if candidates.is_empty() {
            log::debug!("No candidates for mood '{}'", request.mood);
            return Ok(Vec::new());
        }

        let mut pool = self.unique_candidates(&candidates);
        pool.shuffle(rng);

        let selected = if pool.len() > request.result_count {
            self.rank(&pool, request.result_count, rng)
        } else {
            pool
        };

        Ok(self.assemble(&selected))
    }

    /// First occurrence of each (song name, artist), catalog order.
    fn unique_candidates(&self, candidates: &[usize]) -> Vec<usize> {
        let mut seen = HashSet::new();
        candidates
            .iter()
            .copied()
            .filter(|&idx| seen.insert(self.catalog.song(idx).key()))
            .collect()
    }

    fn rank<R: Rng + ?Sized>(&self, pool: &[usize], count: usize, rng: &mut R) -> Vec<usize> {
        let mut scored: Vec<(usize, f64)> = pool
            .iter()
            .map(|&idx| {
                let score = self.index.row_mean(idx) * self.ranking.jitter(rng);
                log::trace!("Candidate {idx} scored {score:.4}");
                (idx, score)
            })
            .collect();

        scored.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().take(count).map(|(idx, _)| idx).collect()
    }

    fn assemble(&self, selected: &[usize]) -> Vec<SongSummary> {
        let mut seen = HashSet::new();
        selected
            .iter()
            .map(|&idx| self.catalog.song(idx))
            .filter(|song| seen.insert(song.key()))
            .map(SongSummary::from)
            .collect()
    }
}

/// Process-wide handle to the current [`Recommender`].
///
/// Readers take an `Arc` snapshot and keep using it for the whole call;
/// [`SharedRecommender::replace`] swaps in a fully built replacement, so an
/// in-flight request never sees a half-reloaded catalog.
#[derive(Debug)]
pub struct SharedRecommender {
    current: RwLock<Arc<Recommender>>,
}

impl SharedRecommender {
    #[must_use]
    pub fn new(recommender: Recommender) -> Self {
        Self {
            current: RwLock::new(Arc::new(recommender)),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<Recommender> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Install `recommender`, returning the one it replaced.
    pub fn replace(&self, recommender: Recommender) -> Arc<Recommender> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        log::info!(
            "Swapping catalog: {} -> {} entries",
            guard.catalog().len(),
            recommender.catalog().len()
        );
        std::mem::replace(&mut *guard, Arc::new(recommender))
    }

    /// # Errors
    ///
    /// See [`Recommender::recommend`].
    pub fn recommend(&self, request: &RecommendationRequest) -> Result<Vec<SongSummary>, RequestError> {
        self.snapshot().recommend(request)
    }
}
