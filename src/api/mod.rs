pub mod client;
pub mod data_dragon;
pub mod endpoints;
pub mod models;

use crate::error::AppError;
use async_trait::async_trait;

pub use client::RiotApiClient;
pub use data_dragon::ChampionNames;
pub use endpoints::MatchQuery;
use models::*;

/// The Riot endpoints the scout consumes. `RiotApiClient` is the live
/// implementation; rate limiting and caching are the implementor's concern.
#[async_trait]
pub trait RiotApi: Send + Sync {
    async fn account_by_riot_id(&self, game_name: &str, tag_line: &str)
        -> Result<AccountDto, AppError>;

    async fn account_by_puuid(&self, puuid: &str) -> Result<AccountDto, AppError>;

    /// Ranked entries for every queue the player is placed in.
    async fn league_entries(&self, puuid: &str) -> Result<Vec<LeagueEntryDto>, AppError>;

    async fn top_masteries(
        &self,
        puuid: &str,
        count: usize,
    ) -> Result<Vec<ChampionMasteryDto>, AppError>;

    async fn match_ids(&self, puuid: &str, query: &MatchQuery) -> Result<Vec<String>, AppError>;

    async fn match_by_id(&self, match_id: &str) -> Result<MatchDto, AppError>;

    async fn clash_players(&self, puuid: &str) -> Result<Vec<ClashPlayerDto>, AppError>;

    async fn clash_team(&self, team_id: &str) -> Result<ClashTeamDto, AppError>;
}
