pub mod fetcher;

pub use fetcher::{Fetched, PlayerDataFetcher, PlayerIdentity};

use crate::analysis::team::{compare_teams, TeamAggregator};
use crate::api::{ChampionNames, RiotApi};
use crate::config::ScoutConfig;
use crate::error::ScoutError;
use crate::model::{PlayerProfile, ScoutResult};
use crate::rate_limit::ScrapeGate;
use crate::season::SeasonStatsSource;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Largest roster a Clash team can field.
pub const MAX_TEAM_SIZE: usize = 5;

/// Entry point of a scouting run: resolves a roster, fetches every player
/// concurrently and aggregates the result.
pub struct ClashScout<A, S> {
    api: A,
    season: S,
    names: ChampionNames,
    gate: Arc<ScrapeGate>,
    config: ScoutConfig,
}

impl<A: RiotApi, S: SeasonStatsSource> ClashScout<A, S> {
    pub fn new(api: A, season: S, names: ChampionNames, gate: Arc<ScrapeGate>, config: ScoutConfig) -> Self {
        ClashScout {
            api,
            season,
            names,
            gate,
            config,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn season(&self) -> &S {
        &self.season
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    pub fn fetcher(&self) -> PlayerDataFetcher<'_, A, S> {
        PlayerDataFetcher::new(&self.api, &self.season, &self.names, self.gate.clone(), &self.config)
    }

    /// Scouts the Clash team the given player is registered with.
    pub async fn scout_clash_team(&self, player: &PlayerIdentity) -> Result<ScoutResult, ScoutError> {
        let riot_id = player.label();
        let puuid = match player {
            PlayerIdentity::Puuid(puuid) => puuid.clone(),
            PlayerIdentity::RiotId { game_name, tag_line } => self
                .api
                .account_by_riot_id(game_name, tag_line)
                .await
                .map_err(|e| {
                    warn!(player = %riot_id, error = %e, "could not resolve Riot ID");
                    ScoutError::NoRiotData {
                        riot_id: riot_id.clone(),
                    }
                })?
                .puuid,
        };

        let registrations = self.api.clash_players(&puuid).await.map_err(|e| {
            warn!(player = %riot_id, error = %e, "clash registration lookup failed");
            ScoutError::NoActiveTeam {
                riot_id: riot_id.clone(),
            }
        })?;
        let team_id = registrations
            .into_iter()
            .find_map(|registration| registration.team_id)
            .ok_or_else(|| ScoutError::NoActiveTeam {
                riot_id: riot_id.clone(),
            })?;

        let team = self.api.clash_team(&team_id).await.map_err(|e| {
            warn!(team_id = %team_id, error = %e, "clash team lookup failed");
            ScoutError::NoTeamRoster {
                team_id: team_id.clone(),
            }
        })?;

        let roster: Vec<PlayerIdentity> = team
            .players
            .iter()
            .filter_map(|p| p.puuid.clone())
            .map(PlayerIdentity::Puuid)
            .collect();
        if roster.is_empty() {
            return Err(ScoutError::NoTeamRoster { team_id });
        }

        let positions: HashMap<&str, String> = team
            .players
            .iter()
            .filter_map(|p| Some((p.puuid.as_deref()?, lobby_position(&p.position)?)))
            .collect();

        info!(team = %team.name, players = roster.len(), "scouting clash team");
        let mut players = self.fetch_all(&roster).await;
        if players.is_empty() {
            return Err(ScoutError::AllPlayersFailed);
        }
        for player in &mut players {
            player.registered_position = positions.get(player.puuid.as_str()).cloned();
        }

        let team_name = Some(team.name.clone()).filter(|name| !name.is_empty());
        Ok(TeamAggregator::new(&self.config).build_result(team_name, players))
    }

    /// Scouts an ad-hoc group of players. Only the first five are used.
    pub async fn scout_team_by_players(&self, players: &[PlayerIdentity]) -> Result<ScoutResult, ScoutError> {
        if players.len() > MAX_TEAM_SIZE {
            warn!(given = players.len(), "more than {} players given, extra ones ignored", MAX_TEAM_SIZE);
        }
        let roster = &players[..players.len().min(MAX_TEAM_SIZE)];

        let profiles = self.fetch_all(roster).await;
        if profiles.is_empty() {
            return Err(ScoutError::AllPlayersFailed);
        }
        Ok(TeamAggregator::new(&self.config).build_result(None, profiles))
    }

    /// `enemy threat / our threat`; above 1 the enemy looks stronger.
    pub fn calculate_team_comparison(&self, ours: &ScoutResult, enemy: &ScoutResult) -> f64 {
        compare_teams(&ours.players, &enemy.players)
    }

    async fn fetch_all(&self, roster: &[PlayerIdentity]) -> Vec<PlayerProfile> {
        let fetcher = self.fetcher();
        let results = join_all(roster.iter().map(|identity| fetcher.fetch_profile(identity))).await;

        let dropped = results.iter().filter(|r| r.is_none()).count();
        if dropped > 0 {
            warn!(dropped, "some players could not be scouted");
        }
        results.into_iter().flatten().collect()
    }
}

/// A concrete lane picked in the Clash lobby. `FILL` and `UNSELECTED` say
/// nothing about where the player ends up.
fn lobby_position(position: &str) -> Option<String> {
    let position = position.trim().to_uppercase();
    match position.as_str() {
        "" | "FILL" | "UNSELECTED" => None,
        _ => Some(position),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lobby_position_ignores_open_slots() {
        assert_eq!(lobby_position("utility").as_deref(), Some("UTILITY"));
        assert_eq!(lobby_position("FILL"), None);
        assert_eq!(lobby_position("UNSELECTED"), None);
        assert_eq!(lobby_position(" "), None);
    }
}
