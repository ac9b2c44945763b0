use crate::utils::ranking::RankingEntry;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Save any serializable value to a JSON cache file, creating parent directories
pub fn save_to_cache<T: Serialize + ?Sized>(value: &T, cache_file: impl AsRef<Path>) -> Result<()> {
    let cache_file = cache_file.as_ref();
    if let Some(parent) = cache_file.parent() {
        std::fs::create_dir_all(parent).context("Failed to create cache directory")?;
    }
    let json = serde_json::to_string_pretty(value).context("Failed to serialize cache data")?;
    std::fs::write(cache_file, json)
        .with_context(|| format!("Failed to write cache file {}", cache_file.display()))?;
    Ok(())
}

/// Load a value from a JSON cache file
pub fn load_from_cache<T: DeserializeOwned>(cache_file: impl AsRef<Path>) -> Result<T> {
    let cache_file = cache_file.as_ref();
    let json = std::fs::read_to_string(cache_file)
        .with_context(|| format!("Failed to read cache file {}", cache_file.display()))?;
    let value = serde_json::from_str(&json).context("Failed to deserialize cache data")?;
    Ok(value)
}

/// Save a group ranking to CSV
pub fn save_ranking_to_csv(ranking: &[RankingEntry], filename: impl AsRef<Path>) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(filename.as_ref()).context("Failed to create CSV file")?;

    writer.write_record([
        "Position",
        "Name",
        "Points",
        "Exact Scores",
        "Correct Winners",
        "Graded Predictions",
    ])?;

    for entry in ranking {
        writer.write_record([
            entry.position.to_string(),
            entry.name.clone(),
            entry.points.to_string(),
            entry.exact_hits.to_string(),
            entry.tendency_hits.to_string(),
            entry.graded.to_string(),
        ])?;
    }

    writer.flush().context("Failed to flush CSV file")?;
    Ok(())
}
