//! Catalog statistics: row counts per genre, mood and energy level.

use crate::catalog::Catalog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Every row, duplicates included.
    pub total_songs: usize,
    pub unique_songs: usize,
    pub genres: BTreeMap<String, usize>,
    pub moods: BTreeMap<String, usize>,
    pub energy_levels: BTreeMap<String, usize>,
}

impl CatalogStats {
    #[must_use]
    pub fn collect(catalog: &Catalog) -> Self {
        let mut stats = Self {
            total_songs: catalog.len(),
            unique_songs: catalog.unique_song_count(),
            genres: BTreeMap::new(),
            moods: BTreeMap::new(),
            energy_levels: BTreeMap::new(),
        };

        for song in catalog.songs() {
            *stats.genres.entry(song.genre.clone()).or_default() += 1;
            *stats.moods.entry(song.mood.clone()).or_default() += 1;
            *stats.energy_levels.entry(song.energy.clone()).or_default() += 1;
        }

        stats
    }
}

fn write_counts(f: &mut fmt::Formatter<'_>, title: &str, counts: &BTreeMap<String, usize>) -> fmt::Result {
    writeln!(f, "{title}:")?;
    let mut rows: Vec<_> = counts.iter().collect();
    // Most common first, like a value count.
    rows.sort_by(|(a_name, a), (b_name, b)| b.cmp(a).then_with(|| a_name.cmp(b_name)));
    for (name, count) in rows {
        writeln!(f, "  {name:<20} {count}")?;
    }
    Ok(())
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total entries: {}", self.total_songs)?;
        writeln!(f, "Unique songs:  {}", self.unique_songs)?;
        write_counts(f, "Genres", &self.genres)?;
        write_counts(f, "Moods", &self.moods)?;
        write_counts(f, "Energy levels", &self.energy_levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::song;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            song("A", "X", "Happy", "Joyful", "High", "Pop", 120.0),
            song("A", "X", "Happy", "Joyful", "High", "Pop", 120.0),
            song("B", "Y", "Sad", "Melancholic", "Low", "Rock", 70.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_counts_include_duplicates() {
        let stats = CatalogStats::collect(&catalog());
        assert_eq!(stats.total_songs, 3);
        assert_eq!(stats.unique_songs, 2);
        assert_eq!(stats.genres["Pop"], 2);
        assert_eq!(stats.genres["Rock"], 1);
        assert_eq!(stats.moods["Joyful"], 2);
        assert_eq!(stats.energy_levels["Low"], 1);
    }

    #[test]
    fn test_display_orders_by_count() {
        let text = CatalogStats::collect(&catalog()).to_string();
        let pop = text.find("Pop").unwrap();
        let rock = text.find("Rock").unwrap();
        assert!(pop < rock);
        assert!(text.starts_with("Total entries: 3"));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(CatalogStats::collect(&catalog())).unwrap();
        assert_eq!(json["total_songs"], 3);
        assert_eq!(json["energy_levels"]["High"], 2);
    }
}
