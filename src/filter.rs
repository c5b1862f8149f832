//! # Candidate Filters
//!
//! A request narrows the catalog through a fixed sequence of stages. Each
//! stage is either:
//!
//! - **hard**: its result is final, even when empty (mood), or
//! - **soft**: if it would leave nothing, the stage is skipped and the
//!   previous candidates are kept (energy, genre).
//!
//! Candidates are catalog row indexes kept in ascending (catalog) order.
//! All comparisons are case-insensitive.

use crate::catalog::{Catalog, SongRecord};
use std::collections::HashMap;

/// How a stage treats an empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Hard,
    Soft,
}

lazy_static::lazy_static! {
    /// Fine-grained moods accepted for a coarse mood when no row carries the
    /// requested sentiment label.
    static ref MOOD_FALLBACK: HashMap<&'static str, &'static [&'static str]> = {
        let mut table: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        table.insert("happy", &["joyful", "energetic"]);
        table.insert("sad", &["melancholic", "emotional"]);
        table.insert("relaxed", &["soothing", "calm"]);
        table.insert("motivated", &["energetic", "powerful"]);
        table
    };
}

/// Moods that have an entry in the fallback table, sorted.
#[must_use]
pub fn fallback_moods() -> Vec<&'static str> {
    let mut moods: Vec<_> = MOOD_FALLBACK.keys().copied().collect();
    moods.sort_unstable();
    moods
}

/// Fine-grained moods acceptable for `mood`. Unknown moods accept only themselves.
#[must_use]
pub fn acceptable_moods(mood: &str) -> Vec<String> {
    let mood = mood.to_lowercase();
    match MOOD_FALLBACK.get(mood.as_str()) {
        Some(moods) => moods.iter().map(|m| (*m).to_string()).collect(),
        None => vec![mood],
    }
}

/// Case-insensitive equality without allocating.
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// One narrowing step of the pipeline.
pub trait CandidateFilter {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn constraint(&self) -> Constraint;

    /// Subset of `candidates` this stage accepts, order preserved.
    fn narrow(&self, catalog: &Catalog, candidates: &[usize]) -> Vec<usize>;
}

fn select(
    catalog: &Catalog,
    candidates: &[usize],
    accept: impl Fn(&SongRecord) -> bool,
) -> Vec<usize> {
    candidates
        .iter()
        .copied()
        .filter(|&idx| accept(catalog.song(idx)))
        .collect()
}

/// Hard mood filter: exact sentiment label first, then the fallback mood table.
#[derive(Debug, Clone)]
pub struct MoodFilter {
    mood: String,
}

impl MoodFilter {
    #[must_use]
    pub fn new(mood: &str) -> Self {
        Self { mood: mood.to_string() }
    }
}

impl CandidateFilter for MoodFilter {
    fn name(&self) -> &'static str {
        "mood"
    }

    fn constraint(&self) -> Constraint {
        Constraint::Hard
    }

    fn narrow(&self, catalog: &Catalog, candidates: &[usize]) -> Vec<usize> {
        let by_sentiment = select(catalog, candidates, |song| {
            eq_ignore_case(&song.sentiment_label, &self.mood)
        });
        if !by_sentiment.is_empty() {
            return by_sentiment;
        }

        let accepted = acceptable_moods(&self.mood);
        log::debug!(
            "No sentiment label matches '{}', falling back to moods {:?}",
            self.mood,
            accepted
        );
        select(catalog, candidates, |song| {
            accepted.iter().any(|m| eq_ignore_case(&song.mood, m))
        })
    }
}

/// Which catalog column a [`FieldFilter`] compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongField {
    Energy,
    Genre,
}

impl SongField {
    fn value(self, song: &SongRecord) -> &str {
        match self {
            Self::Energy => &song.energy,
            Self::Genre => &song.genre,
        }
    }
}

/// Soft equality filter on a single column.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    field: SongField,
    value: String,
}

impl FieldFilter {
    #[must_use]
    pub fn new(field: SongField, value: &str) -> Self {
        Self { field, value: value.to_string() }
    }
}

impl CandidateFilter for FieldFilter {
    fn name(&self) -> &'static str {
        match self.field {
            SongField::Energy => "energy",
            SongField::Genre => "genre",
        }
    }

    fn constraint(&self) -> Constraint {
        Constraint::Soft
    }

    fn narrow(&self, catalog: &Catalog, candidates: &[usize]) -> Vec<usize> {
        select(catalog, candidates, |song| {
            eq_ignore_case(self.field.value(song), &self.value)
        })
    }
}

/// Ordered list of stages applied to the whole catalog.
#[derive(Default)]
pub struct FilterPipeline {
    stages: Vec<Box<dyn CandidateFilter + Send + Sync>>,
}

impl FilterPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stage(mut self, filter: impl CandidateFilter + Send + Sync + 'static) -> Self {
        self.stages.push(Box::new(filter));
        self
    }

    /// Run every stage over the full catalog. Empty if a hard stage empties
    /// the set; soft stages never do.
    #[must_use]
    pub fn run(&self, catalog: &Catalog) -> Vec<usize> {
        let mut candidates: Vec<usize> = (0..catalog.len()).collect();

        for stage in &self.stages {
            let narrowed = stage.narrow(catalog, &candidates);
            log::debug!(
                "Filter '{}': {} -> {} candidates",
                stage.name(),
                candidates.len(),
                narrowed.len()
            );

            match (stage.constraint(), narrowed.is_empty()) {
                (Constraint::Hard, true) => return Vec::new(),
                (Constraint::Soft, true) => {
                    log::debug!("Filter '{}' would empty the set, keeping previous candidates", stage.name());
                }
                (_, false) => candidates = narrowed,
            }
        }

        candidates
    }
}
