use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const SCORES_FILE: &str = "scores.json";

/// Best score per game, stored as JSON in the data directory.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoreTable
{
    #[serde(default)]
    best: BTreeMap<String, u32>,
}

pub struct ScoreStore
{
    path: PathBuf,
    table: ScoreTable,
}

impl ScoreStore
{
    pub fn open(data_dir: &Path) -> Self
    {
        let path = data_dir.join(SCORES_FILE);
        let table = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                log::warn!("ignoring unreadable score file {}: {err}", path.display());
                ScoreTable::default()
            }),
            Err(_) => ScoreTable::default(),
        };
        Self { path, table }
    }

    pub fn best(&self, game: &str) -> u32
    {
        self.table.best.get(game).copied().unwrap_or(0)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, u32)>
    {
        self.table.best.iter().map(|(name, score)| (name.as_str(), *score))
    }

    /// Stores `score` if it beats the saved best. Returns true on a new best.
    pub fn record(&mut self, game: &str, score: u32) -> Result<bool>
    {
        if score <= self.best(game) {
            return Ok(false);
        }
        self.table.best.insert(game.to_string(), score);
        self.save()?;
        log::info!("new best for {game}: {score}");
        Ok(true)
    }

    fn save(&self) -> Result<()>
    {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.table).context("Failed to encode scores")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_starts_empty()
    {
        let dir = TempDir::new().unwrap();
        let store = ScoreStore::open(dir.path());
        assert_eq!(store.best("snake"), 0);
        assert_eq!(store.entries().count(), 0);
    }

    #[test]
    fn test_record_only_keeps_improvements()
    {
        let dir = TempDir::new().unwrap();
        let mut store = ScoreStore::open(dir.path());
        assert!(store.record("snake", 40).unwrap());
        assert!(!store.record("snake", 30).unwrap());
        assert!(!store.record("snake", 40).unwrap());
        assert!(store.record("snake", 50).unwrap());

        let reopened = ScoreStore::open(dir.path());
        assert_eq!(reopened.best("snake"), 50);
        assert_eq!(reopened.best("hoops"), 0);
    }

    #[test]
    fn test_corrupt_file_is_ignored()
    {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SCORES_FILE), "{not json").unwrap();
        let mut store = ScoreStore::open(dir.path());
        assert_eq!(store.best("pi"), 0);
        assert!(store.record("pi", 2).unwrap());
        assert_eq!(ScoreStore::open(dir.path()).best("pi"), 2);
    }

    #[test]
    fn test_creates_missing_data_dir()
    {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut store = ScoreStore::open(&nested);
        store.record("hoops", 3).unwrap();
        assert!(nested.join(SCORES_FILE).exists());
    }
}
