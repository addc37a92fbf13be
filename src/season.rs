//! Season-level per-champion statistics from an external stats site.
//!
//! The site itself is scraped by a separate collaborator; this module only
//! defines the contract and the sources the CLI can plug in. An empty map
//! always means "no season data", never an error.

use crate::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonChampionStats {
    pub games: u32,
    /// Percent, 0-100.
    pub winrate: f64,
}

/// Champion display name -> season stats for one player.
pub type SeasonStats = HashMap<String, SeasonChampionStats>;

#[async_trait]
pub trait SeasonStatsSource: Send + Sync {
    async fn season_stats(&self, game_name: &str, tag_line: &str)
        -> Result<SeasonStats, AppError>;
}

#[async_trait]
impl<T: SeasonStatsSource + ?Sized> SeasonStatsSource for Box<T> {
    async fn season_stats(&self, game_name: &str, tag_line: &str) -> Result<SeasonStats, AppError> {
        (**self).season_stats(game_name, tag_line).await
    }
}

/// Used when no stats source is configured.
pub struct NoSeasonStats;

#[async_trait]
impl SeasonStatsSource for NoSeasonStats {
    async fn season_stats(&self, _game_name: &str, _tag_line: &str) -> Result<SeasonStats, AppError> {
        Ok(SeasonStats::new())
    }
}

/// Reads a JSON export of `{ "Name#TAG": { "Champion": { "games": n, "winrate": p } } }`.
pub struct FileSeasonStats {
    players: HashMap<String, SeasonStats>,
}

impl FileSeasonStats {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, AppError> {
        let raw: HashMap<String, SeasonStats> = serde_json::from_str(content)
            .map_err(|e| AppError::JsonError(format!("Invalid season stats export: {}", e)))?;

        let players = raw
            .into_iter()
            .map(|(riot_id, stats)| (riot_id.to_lowercase(), stats))
            .collect();
        Ok(FileSeasonStats { players })
    }
}

#[async_trait]
impl SeasonStatsSource for FileSeasonStats {
    async fn season_stats(&self, game_name: &str, tag_line: &str) -> Result<SeasonStats, AppError> {
        let key = format!("{}#{}", game_name, tag_line).to_lowercase();
        Ok(self.players.get(&key).cloned().unwrap_or_default())
    }
}
