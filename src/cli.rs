//! # Command-Line Interface Module
//!
//! Clap derive definitions for the `moodtune` binary.
//!
//! ## Commands
//!
//! - `recommend`: Songs for a mood and energy level, optionally a genre
//! - `stats`: Row counts by genre, mood and energy level
//! - `info`: Catalog summary
//! - `options`: Values accepted by `recommend`
//! - `completion`: Shell completion scripts
//!
//! ## Examples
//!
//! ```bash
//! moodtune recommend --mood happy --energy high
//! moodtune --catalog songs.csv recommend -m sad -e low -g rock -n 5 --json
//! moodtune stats --json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "moodtune")]
#[command(about = "Moodtune: song recommendations for how you feel")]
#[command(version)]
pub struct Args {
    /// Catalog file: CSV, or a SQLite database with a `songs` table
    ///
    /// Defaults to the catalog path in the config file, then to
    /// music_sentiment_dataset.csv in the Moodtune data directory.
    #[arg(short, long, global = true, env = "MOODTUNE_CATALOG", value_hint = clap::ValueHint::FilePath)]
    pub catalog: Option<PathBuf>,

    /// Config file (JSON)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recommend songs for a mood and energy level
    ///
    /// Songs whose sentiment matches the mood are preferred; if there are
    /// none, related fine-grained moods are used instead (happy: joyful or
    /// energetic, sad: melancholic or emotional, relaxed: soothing or calm,
    /// motivated: energetic or powerful). Energy and genre narrow the
    /// selection only when something still matches.
    Recommend {
        /// Mood, e.g. Happy, Sad, Relaxed, Motivated
        #[arg(short, long)]
        mood: String,

        /// Energy level, e.g. Low, Medium, High
        #[arg(short, long)]
        energy: String,

        /// Genre to prefer ("All" for any)
        #[arg(short, long)]
        genre: Option<String>,

        /// Number of songs to return
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Seed the random ordering for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show catalog statistics
    ///
    /// Total entries plus per-genre, per-mood and per-energy-level counts.
    /// Duplicate rows of the same song are counted individually.
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show a summary of the loaded catalog
    Info,

    /// List the moods, energy levels and genres the catalog offers
    Options {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// Usage: moodtune completion bash > ~/.local/share/bash-completion/completions/moodtune
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },

    /// List mood values for completion (hidden command)
    #[command(hide = true)]
    CompleteMoods,
}
