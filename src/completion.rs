//! # Shell Completion Module
//!
//! - Generation of completion scripts for various shells
//! - Dynamic completion of mood values from the catalog
//!
//! ## Usage
//!
//! ```bash
//! # Generate bash completions
//! moodtune completion bash > ~/.local/share/bash-completion/completions/moodtune
//!
//! # Generate zsh completions
//! moodtune completion zsh > ~/.config/zsh/completions/_moodtune
//! ```

use crate::catalog::Catalog;
use crate::filter;
use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};
use std::collections::BTreeSet;
use std::io;

/// Generate shell completions for the given shell
pub fn generate_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// Convert our Shell enum to `clap_complete`'s Shell enum
#[must_use]
pub fn shell_to_completion_shell(shell: crate::cli::Shell) -> CompletionShell {
    match shell {
        crate::cli::Shell::Bash => CompletionShell::Bash,
        crate::cli::Shell::Zsh => CompletionShell::Zsh,
        crate::cli::Shell::Fish => CompletionShell::Fish,
        crate::cli::Shell::PowerShell => CompletionShell::PowerShell,
        crate::cli::Shell::Elvish => CompletionShell::Elvish,
    }
}

/// Mood values worth offering: the catalog's sentiment labels plus the moods
/// the fallback table understands, without case-insensitive repeats.
#[must_use]
pub fn mood_completions(catalog: Option<&Catalog>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let labels = catalog.map(Catalog::sentiment_labels).unwrap_or_default();

    labels
        .into_iter()
        .map(str::to_string)
        .chain(filter::fallback_moods().into_iter().map(capitalize))
        .filter(|mood| seen.insert(mood.to_lowercase()))
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Print mood completions one per line, quoting values with whitespace.
pub fn print_mood_completions(catalog: Option<&Catalog>) {
    for mood in mood_completions(catalog) {
        if mood.contains(char::is_whitespace) {
            println!("\"{}\"", mood.replace('"', "\\\""));
        } else {
            println!("{mood}");
        }
    }
}
