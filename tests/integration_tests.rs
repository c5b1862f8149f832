//! # Integration Tests for Moodtune
//!
//! End-to-end checks through the public API: load a catalog from disk,
//! build the recommender and verify the properties callers rely on.

use anyhow::Result;
use moodtune::engine::{RecommendationRequest, Recommender, SharedRecommender};
use moodtune::error::CatalogError;
use moodtune::{encoder::FeatureEncoder, loader, stats::CatalogStats};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

const HEADER: &str =
    "User_ID,Sentiment_Label,Recommended_Song_ID,Song_Name,Artist,Genre,Tempo (BPM),Mood,Energy,Danceability";

const ROWS: &[&str] = &[
    "U1,Happy,S1,Happy,Pharrell Williams,Pop,160,Joyful,High,High",
    "U2,Happy,S1,Happy,Pharrell Williams,Pop,160,Joyful,High,High",
    "U3,Happy,S2,Uptown Funk,Bruno Mars,Funk,115,Energetic,High,High",
    "U4,Happy,S3,Walking on Sunshine,Katrina and the Waves,Rock,110,Joyful,Medium,Medium",
    "U5,Happy,S4,Shake It Off,Taylor Swift,Pop,160,Energetic,High,High",
    "U6,Happy,S5,Good as Hell,Lizzo,Hip-Hop,96,Joyful,High,High",
    "U7,Sad,S6,Someone Like You,Adele,Pop,67,Melancholic,Low,Low",
    "U8,Sad,S7,Hurt,Johnny Cash,Country,94,Emotional,Low,Low",
    "U9,Sad,S6,Someone Like You,Adele,Pop,67,Melancholic,Low,Low",
    "U10,Relaxed,S8,Weightless,Marconi Union,Ambient,60,Calm,Low,Low",
    "U11,Relaxed,S9,Clair de Lune,Debussy,Classical,66,Soothing,Low,Low",
    "U12,Motivated,S10,Lose Yourself,Eminem,Hip-Hop,171,Powerful,High,Medium",
    "U13,Motivated,S11,Eye of the Tiger,Survivor,Rock,109,Powerful,High,Medium",
    "U14,Motivated,S12,Stronger,Kanye West,Hip-Hop,104,Energetic,High,High",
];

/// Write `rows` under the standard header into a temporary CSV file.
fn write_csv(rows: &[&str]) -> Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("music_sentiment_dataset.csv");
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "{HEADER}")?;
    for row in rows {
        writeln!(file, "{row}")?;
    }
    Ok((temp_dir, path))
}

fn build(rows: &[&str]) -> Result<Recommender> {
    let (_dir, path) = write_csv(rows)?;
    Ok(Recommender::build(loader::load_catalog(&path)?))
}

#[cfg(test)]
mod loading_tests {
    use super::*;

    #[test]
    fn test_csv_catalog_keeps_duplicates() -> Result<()> {
        let (_dir, path) = write_csv(ROWS)?;
        let catalog = loader::load_catalog(&path)?;
        assert_eq!(catalog.len(), ROWS.len());
        assert_eq!(catalog.unique_song_count(), 12);
        Ok(())
    }

    #[test]
    fn test_sqlite_catalog() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("catalog.db");
        let conn = rusqlite::Connection::open(&path)?;
        conn.execute(
            "CREATE TABLE songs (
                id INTEGER PRIMARY KEY,
                song_id TEXT NOT NULL,
                song_name TEXT NOT NULL,
                artist TEXT NOT NULL,
                genre TEXT NOT NULL,
                sentiment_label TEXT NOT NULL,
                mood TEXT NOT NULL,
                energy TEXT NOT NULL,
                danceability TEXT NOT NULL,
                tempo_bpm REAL NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "INSERT INTO songs (song_id, song_name, artist, genre, sentiment_label, mood, energy, danceability, tempo_bpm)
             VALUES
             ('S1', 'Happy', 'Pharrell Williams', 'Pop', 'Happy', 'Joyful', 'High', 'High', 160),
             ('S8', 'Weightless', 'Marconi Union', 'Ambient', 'Relaxed', 'Calm', 'Low', 'Low', 60)",
            [],
        )?;
        drop(conn);

        let recommender = Recommender::build(loader::load_catalog(&path)?);
        let results = recommender.recommend(&RecommendationRequest::new("relaxed", "low"))?;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].song_name, "Weightless");
        assert_eq!(results[0].song_id, "S8");
        Ok(())
    }

    #[test]
    fn test_missing_columns_is_fatal() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("broken.csv");
        std::fs::write(&path, "Song_Name,Artist\nHappy,Pharrell\n")?;

        let err = loader::load_catalog(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::MissingColumns(_))
        ));
        Ok(())
    }

    #[test]
    fn test_empty_catalog_is_fatal() -> Result<()> {
        let (_dir, path) = write_csv(&[])?;
        let err = loader::load_catalog(&path).unwrap_err();
        assert_eq!(err.downcast_ref::<CatalogError>(), Some(&CatalogError::Empty));
        Ok(())
    }
}

#[cfg(test)]
mod encoding_tests {
    use super::*;

    #[test]
    fn test_encoding_reproducible_across_loads() -> Result<()> {
        let (_dir, path) = write_csv(ROWS)?;
        let first = FeatureEncoder::fit(&loader::load_catalog(&path)?);
        let second = FeatureEncoder::fit(&loader::load_catalog(&path)?);
        assert_eq!(first.vectors(), second.vectors());
        Ok(())
    }

    #[test]
    fn test_same_category_same_code() -> Result<()> {
        let recommender = build(ROWS)?;
        let catalog = recommender.catalog();
        let encoder = recommender.encoder();
        for (i, a) in catalog.songs().iter().enumerate() {
            for (j, b) in catalog.songs().iter().enumerate() {
                if a.genre == b.genre {
                    assert_eq!(encoder.vector(i)[0], encoder.vector(j)[0]);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod recommendation_tests {
    use super::*;

    #[test]
    fn test_results_bounded_and_unique() -> Result<()> {
        let recommender = build(ROWS)?;
        for mood in ["Happy", "sad", "RELAXED", "motivated"] {
            for energy in ["High", "Medium", "Low"] {
                for count in 1..=6 {
                    let request = RecommendationRequest::new(mood, energy).with_result_count(count);
                    let results = recommender.recommend(&request)?;
                    assert!(results.len() <= count);
                    assert!(!results.is_empty(), "{mood}/{energy} should match something");
                    let unique: HashSet<_> =
                        results.iter().map(|s| (s.song_name.clone(), s.artist.clone())).collect();
                    assert_eq!(unique.len(), results.len());
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_fallback_mood_mapping() -> Result<()> {
        // No row carries the "Happy" sentiment label; fine-grained moods do.
        let recommender = build(&[
            "U1,Neutral,S1,Happy,Pharrell Williams,Pop,160,Joyful,High,High",
            "U2,Neutral,S2,Uptown Funk,Bruno Mars,Funk,115,Energetic,High,High",
            "U3,Neutral,S3,Hurt,Johnny Cash,Country,94,Melancholic,Low,Low",
        ])?;

        let results = recommender.recommend(&RecommendationRequest::new("happy", "High"))?;
        let mut names: Vec<_> = results.iter().map(|s| s.song_name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["Happy", "Uptown Funk"]);
        assert!(results.iter().all(|s| s.mood == "Joyful" || s.mood == "Energetic"));
        Ok(())
    }

    #[test]
    fn test_soft_energy_keeps_only_match() -> Result<()> {
        let recommender = build(&[
            "U1,Happy,S1,Happy,Pharrell Williams,Pop,160,Joyful,Low,High",
            "U2,Sad,S2,Hurt,Johnny Cash,Country,94,Melancholic,High,Low",
        ])?;

        let results = recommender.recommend(&RecommendationRequest::new("happy", "High"))?;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].song_name, "Happy");
        assert_eq!(results[0].energy, "Low");
        Ok(())
    }

    #[test]
    fn test_unknown_mood_returns_empty() -> Result<()> {
        let recommender = build(ROWS)?;
        let results = recommender.recommend(&RecommendationRequest::new("Zzz", "High"))?;
        assert!(results.is_empty());
        Ok(())
    }

    #[test]
    fn test_small_pool_returns_every_song() -> Result<()> {
        let recommender = build(ROWS)?;
        // Sad rows: two unique songs (Adele twice, Johnny Cash once) plus none
        // with High energy, so the energy filter reverts.
        let request = RecommendationRequest::new("sad", "High").with_result_count(5);
        let expected: HashSet<&str> = ["Someone Like You", "Hurt"].into_iter().collect();

        for seed in 0..10 {
            let results = recommender.recommend_with(&request, &mut StdRng::seed_from_u64(seed))?;
            let names: HashSet<&str> = results.iter().map(|s| s.song_name.as_str()).collect();
            assert_eq!(results.len(), 2);
            assert_eq!(names, expected);
        }
        Ok(())
    }

    #[test]
    fn test_order_varies_between_calls() -> Result<()> {
        let recommender = build(ROWS)?;
        let request = RecommendationRequest::new("happy", "Low").with_result_count(10);
        let orders: HashSet<Vec<String>> = (0..40)
            .map(|seed| {
                recommender
                    .recommend_with(&request, &mut StdRng::seed_from_u64(seed))
                    .map(|songs| songs.into_iter().map(|s| s.song_name).collect::<Vec<String>>())
            })
            .collect::<Result<_, _>>()?;
        assert!(orders.len() > 1, "shuffle should produce different orderings");
        Ok(())
    }

    #[test]
    fn test_genre_preference() -> Result<()> {
        let recommender = build(ROWS)?;
        let request = RecommendationRequest::new("motivated", "High").with_genre("Rock");
        let results = recommender.recommend(&request)?;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].song_name, "Eye of the Tiger");

        let any = RecommendationRequest::new("motivated", "High").with_genre("All");
        assert_eq!(recommender.recommend(&any)?.len(), 3);
        Ok(())
    }

    #[test]
    fn test_shared_recommender_reload() -> Result<()> {
        let shared = SharedRecommender::new(build(ROWS)?);
        let in_flight = shared.snapshot();

        shared.replace(build(&ROWS[..3])?);

        assert_eq!(in_flight.catalog().len(), ROWS.len());
        assert_eq!(shared.snapshot().catalog().len(), 3);
        Ok(())
    }
}

#[cfg(test)]
mod stats_tests {
    use super::*;

    #[test]
    fn test_stats_counts_rows() -> Result<()> {
        let recommender = build(ROWS)?;
        let stats = CatalogStats::collect(recommender.catalog());
        assert_eq!(stats.total_songs, 14);
        assert_eq!(stats.unique_songs, 12);
        assert_eq!(stats.genres["Pop"], 5);
        assert_eq!(stats.moods["Powerful"], 2);
        assert_eq!(stats.energy_levels["Low"], 5);
        assert_eq!(stats.genres.values().sum::<usize>(), 14);
        Ok(())
    }
}
