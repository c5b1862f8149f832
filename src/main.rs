//! # Moodtune
//!
//! Recommends songs from a static catalog for a mood, an energy level and
//! optionally a genre.
//!
//! ## Usage
//!
//! ```bash
//! # Recommend songs
//! moodtune recommend --mood happy --energy high
//!
//! # Same request, JSON output, five songs, rock preferred
//! moodtune recommend -m happy -e high -g rock -n 5 --json
//!
//! # Catalog statistics
//! moodtune stats
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use moodtune::catalog::Catalog;
use moodtune::cli::{self, Command};
use moodtune::config::RuntimeConfig;
use moodtune::engine::{RecommendationRequest, RecommendationResponse, Recommender, SongSummary};
use moodtune::stats::CatalogStats;
use moodtune::{completion, loader};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Main entry point for the Moodtune application.
///
/// Initializes logging, resolves configuration, loads the catalog and routes
/// the command. Logging is controlled via `RUST_LOG`:
/// - `RUST_LOG=debug moodtune recommend ...` - filter stage decisions
/// - `RUST_LOG=moodtune::engine=trace moodtune recommend ...` - candidate scores
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    // Commands that never need the catalog.
    if let Command::Completion { shell } = args.command {
        let mut cmd = cli::Args::command();
        completion::generate_completions(completion::shell_to_completion_shell(shell), &mut cmd);
        return Ok(());
    }

    let config = resolve_config(&args)?;

    if let Command::CompleteMoods = args.command {
        // Completion must never fail loudly; fall back to the built-in moods.
        let catalog = loader::load_catalog(&config.catalog_path).ok();
        completion::print_mood_completions(catalog.as_ref());
        return Ok(());
    }

    let catalog = loader::load_catalog(&config.catalog_path).with_context(|| {
        format!(
            "Could not load the song catalog. Pass --catalog <FILE> or place {} at {}",
            moodtune::config::CATALOG_FILE,
            config.catalog_path.display()
        )
    })?;

    match args.command {
        Command::Recommend { mood, energy, genre, count, seed, json } => {
            let recommender = Recommender::build(catalog).with_ranking(config.ranking());

            let mut request = RecommendationRequest::new(mood, energy)
                .with_result_count(count.unwrap_or(config.result_count));
            request.genre = genre;

            info!("Recommending for {request:?}");
            let results = match seed {
                Some(seed) => recommender.recommend_with(&request, &mut StdRng::seed_from_u64(seed))?,
                None => recommender.recommend(&request)?,
            };

            let response = RecommendationResponse::from(results);
            if json {
                print_json(&response)?;
            } else {
                print_recommendations(&response);
            }
        }
        Command::Stats { json } => {
            let stats = CatalogStats::collect(&catalog);
            if json {
                print_json(&stats)?;
            } else {
                print!("{stats}");
            }
        }
        Command::Info => print_info(&catalog),
        Command::Options { json } => {
            let options = FormOptions::from(&catalog);
            if json {
                print_json(&options)?;
            } else {
                println!("Moods:         {}", options.moods.join(", "));
                println!("Energy levels: {}", options.energy_levels.join(", "));
                println!("Genres:        {}", options.genres.join(", "));
            }
        }
        Command::Completion { .. } | Command::CompleteMoods => unreachable!("handled above"),
    }

    Ok(())
}

/// Config file first, then `--catalog` / `MOODTUNE_CATALOG`.
fn resolve_config(args: &cli::Args) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::load(args.config.as_deref())?;
    if let Some(path) = &args.catalog {
        config = config.with_catalog_path(path)?;
    }
    debug!("Using catalog {}", config.catalog_path.display());
    Ok(config)
}

/// Choices for the request form.
#[derive(Debug, Serialize)]
struct FormOptions<'a> {
    moods: Vec<&'a str>,
    energy_levels: Vec<&'a str>,
    genres: Vec<&'a str>,
}

impl<'a> From<&'a Catalog> for FormOptions<'a> {
    fn from(catalog: &'a Catalog) -> Self {
        Self {
            moods: catalog.sentiment_labels(),
            energy_levels: catalog.energy_levels(),
            genres: catalog.genres(),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

fn print_recommendations(response: &RecommendationResponse) {
    println!("{}", response.message);
    for (i, song) in response.recommendations.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, format_song(song));
    }
}

fn format_song(song: &SongSummary) -> String {
    format!(
        "{} - {} [{}] {} BPM, {} / {} energy / {} danceability",
        song.artist, song.song_name, song.genre, song.tempo, song.mood, song.energy, song.danceability
    )
}

fn print_info(catalog: &Catalog) {
    println!("{}", "=".repeat(60));
    println!("Total entries in dataset: {}", catalog.len());
    println!("Unique songs: {}", catalog.unique_song_count());
    println!("Available moods: {}", catalog.sentiment_labels().join(", "));
    println!("Energy levels: {}", catalog.energy_levels().join(", "));
    println!("{}", "=".repeat(60));
}
