//! Mood-driven song recommendations from a static catalog.
//!
//! Core modules, in data-flow order:
//! - [`catalog`] - The immutable song catalog
//! - [`encoder`] - Categorical codes and tempo standardization
//! - [`similarity`] - All-pairs cosine similarity index
//! - [`filter`] - Hard and soft candidate filters
//! - [`engine`] - Filter, deduplicate, shuffle, rank, assemble
//!
//! ### Supporting Modules
//!
//! - [`loader`] - CSV and SQLite catalog ingestion
//! - [`stats`] - Catalog statistics
//! - [`config`] - Runtime configuration and data directory
//! - [`error`] - Catalog and request error types
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use moodtune::engine::{RecommendationRequest, Recommender};
//! use moodtune::loader;
//! use std::path::Path;
//!
//! // Startup: load, encode and index once.
//! let catalog = loader::load_catalog(Path::new("music_sentiment_dataset.csv"))?;
//! let recommender = Recommender::build(catalog);
//!
//! // Per request.
//! let request = RecommendationRequest::new("Happy", "High").with_result_count(5);
//! for song in recommender.recommend(&request)? {
//!     println!("{} - {}", song.artist, song.song_name);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Sharing
//!
//! A [`engine::Recommender`] is immutable once built and can be shared
//! across threads behind an `Arc`. [`engine::SharedRecommender`] adds
//! whole-catalog swapping for reloads.

pub mod catalog;
pub mod cli;
pub mod completion;
pub mod config;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod filter;
pub mod loader;
pub mod similarity;
pub mod stats;
