#![allow(dead_code)]

use async_trait::async_trait;
use clash_scout::api::models::*;
use clash_scout::api::{ChampionNames, MatchQuery, RiotApi};
use clash_scout::config::ScoutConfig;
use clash_scout::error::AppError;
use clash_scout::rate_limit::ScrapeGate;
use clash_scout::season::{SeasonChampionStats, SeasonStats, SeasonStatsSource};
use clash_scout::ClashScout;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// One fake player as the mock API serves it.
#[derive(Clone, Default)]
pub struct FakePlayer {
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
    pub ranks: Vec<LeagueEntryDto>,
    pub masteries: Vec<ChampionMasteryDto>,
    /// (champion id, champion name, win, role)
    pub matches: Vec<(i64, &'static str, bool, &'static str)>,
}

impl FakePlayer {
    pub fn new(puuid: &str, game_name: &str) -> Self {
        FakePlayer {
            puuid: puuid.to_string(),
            game_name: game_name.to_string(),
            tag_line: "EUW".to_string(),
            ..FakePlayer::default()
        }
    }

    pub fn mastery(mut self, champion_id: i64, points: u64) -> Self {
        self.masteries.push(ChampionMasteryDto {
            champion_id,
            champion_points: points,
        });
        self
    }

    pub fn solo(mut self, tier: &str, rank: &str, lp: i64) -> Self {
        self.ranks.push(LeagueEntryDto {
            queue_type: SOLO_QUEUE.to_string(),
            tier: tier.to_string(),
            rank: rank.to_string(),
            league_points: lp,
            wins: 10,
            losses: 10,
        });
        self
    }

    pub fn games(mut self, champion_id: i64, name: &'static str, wins: usize, losses: usize, role: &'static str) -> Self {
        for _ in 0..wins {
            self.matches.push((champion_id, name, true, role));
        }
        for _ in 0..losses {
            self.matches.push((champion_id, name, false, role));
        }
        self
    }

    fn match_id(&self, idx: usize) -> String {
        format!("EUW1_{}_{}", self.puuid, idx)
    }
}

/// In-memory `RiotApi`. Puuids listed in `broken_accounts` fail the
/// account lookup; `broken_masteries` fail the mastery call.
#[derive(Default)]
pub struct MockRiotApi {
    pub players: HashMap<String, FakePlayer>,
    pub clash_teams: HashMap<String, ClashTeamDto>,
    /// puuid -> team id
    pub registrations: HashMap<String, String>,
    pub broken_accounts: HashSet<String>,
    pub broken_masteries: HashSet<String>,
    pub broken_matches: HashSet<String>,
}

impl MockRiotApi {
    pub fn with_players(players: Vec<FakePlayer>) -> Self {
        MockRiotApi {
            players: players.into_iter().map(|p| (p.puuid.clone(), p)).collect(),
            ..MockRiotApi::default()
        }
    }

    pub fn register_team(&mut self, team_id: &str, name: &str, puuids: &[&str]) {
        let players = puuids
            .iter()
            .map(|puuid| ClashPlayerDto {
                puuid: Some(puuid.to_string()),
                team_id: Some(team_id.to_string()),
                position: "UNSELECTED".to_string(),
            })
            .collect();
        self.clash_teams.insert(
            team_id.to_string(),
            ClashTeamDto {
                id: team_id.to_string(),
                name: name.to_string(),
                players,
            },
        );
        for puuid in puuids {
            self.registrations.insert(puuid.to_string(), team_id.to_string());
        }
    }

    pub fn set_position(&mut self, team_id: &str, puuid: &str, position: &str) {
        if let Some(team) = self.clash_teams.get_mut(team_id) {
            for player in &mut team.players {
                if player.puuid.as_deref() == Some(puuid) {
                    player.position = position.to_string();
                }
            }
        }
    }

    fn player(&self, puuid: &str) -> Result<&FakePlayer, AppError> {
        self.players
            .get(puuid)
            .ok_or_else(|| AppError::NotFound(puuid.to_string()))
    }

    fn account(player: &FakePlayer) -> AccountDto {
        AccountDto {
            puuid: player.puuid.clone(),
            game_name: player.game_name.clone(),
            tag_line: player.tag_line.clone(),
        }
    }
}

#[async_trait]
impl RiotApi for MockRiotApi {
    async fn account_by_riot_id(&self, game_name: &str, tag_line: &str) -> Result<AccountDto, AppError> {
        self.players
            .values()
            .find(|p| p.game_name.eq_ignore_ascii_case(game_name) && p.tag_line.eq_ignore_ascii_case(tag_line))
            .filter(|p| !self.broken_accounts.contains(&p.puuid))
            .map(Self::account)
            .ok_or_else(|| AppError::NotFound(format!("{}#{}", game_name, tag_line)))
    }

    async fn account_by_puuid(&self, puuid: &str) -> Result<AccountDto, AppError> {
        if self.broken_accounts.contains(puuid) {
            return Err(AppError::HttpError("connection reset".to_string()));
        }
        self.player(puuid).map(Self::account)
    }

    async fn league_entries(&self, puuid: &str) -> Result<Vec<LeagueEntryDto>, AppError> {
        Ok(self.player(puuid)?.ranks.clone())
    }

    async fn top_masteries(&self, puuid: &str, count: usize) -> Result<Vec<ChampionMasteryDto>, AppError> {
        if self.broken_masteries.contains(puuid) {
            return Err(AppError::ApiError("mastery unavailable".to_string()));
        }
        Ok(self.player(puuid)?.masteries.iter().take(count).cloned().collect())
    }

    async fn match_ids(&self, puuid: &str, query: &MatchQuery) -> Result<Vec<String>, AppError> {
        if self.broken_matches.contains(puuid) {
            return Err(AppError::ApiError("match history unavailable".to_string()));
        }
        let player = self.player(puuid)?;
        Ok((0..player.matches.len().min(query.count))
            .map(|idx| player.match_id(idx))
            .collect())
    }

    async fn match_by_id(&self, match_id: &str) -> Result<MatchDto, AppError> {
        for player in self.players.values() {
            for (idx, (champion_id, name, win, role)) in player.matches.iter().enumerate() {
                if player.match_id(idx) != match_id {
                    continue;
                }
                let participant = ParticipantDto {
                    puuid: player.puuid.clone(),
                    champion_id: *champion_id,
                    champion_name: name.to_string(),
                    win: *win,
                    kills: 5,
                    deaths: 5,
                    assists: 5,
                    team_position: role.to_string(),
                };
                return Ok(MatchDto {
                    metadata: MatchMetadata {
                        match_id: match_id.to_string(),
                    },
                    info: MatchInfo {
                        participants: vec![participant],
                    },
                });
            }
        }
        Err(AppError::NotFound(match_id.to_string()))
    }

    async fn clash_players(&self, puuid: &str) -> Result<Vec<ClashPlayerDto>, AppError> {
        Ok(self
            .registrations
            .get(puuid)
            .map(|team_id| {
                vec![ClashPlayerDto {
                    puuid: Some(puuid.to_string()),
                    team_id: Some(team_id.clone()),
                    position: "UNSELECTED".to_string(),
                }]
            })
            .unwrap_or_default())
    }

    async fn clash_team(&self, team_id: &str) -> Result<ClashTeamDto, AppError> {
        self.clash_teams
            .get(team_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(team_id.to_string()))
    }
}

/// Season source that records how many requests overlap.
#[derive(Default)]
pub struct TrackingSeasonStats {
    pub stats: HashMap<String, SeasonStats>,
    pub failing: HashSet<String>,
    pub delay: Duration,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
}

impl TrackingSeasonStats {
    pub fn with_delay(delay: Duration) -> Self {
        TrackingSeasonStats {
            delay,
            ..TrackingSeasonStats::default()
        }
    }

    pub fn insert(&mut self, game_name: &str, entries: &[(&str, u32, f64)]) {
        let stats = entries
            .iter()
            .map(|(name, games, winrate)| {
                (
                    name.to_string(),
                    SeasonChampionStats {
                        games: *games,
                        winrate: *winrate,
                    },
                )
            })
            .collect();
        self.stats.insert(game_name.to_string(), stats);
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SeasonStatsSource for TrackingSeasonStats {
    async fn season_stats(&self, game_name: &str, _tag_line: &str) -> Result<SeasonStats, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.failing.contains(game_name) {
            return Err(AppError::HttpError("blocked by stats site".to_string()));
        }
        Ok(self.stats.get(game_name).cloned().unwrap_or_default())
    }
}

pub fn champion_names() -> ChampionNames {
    ChampionNames::from_pairs([
        (1, "Annie"),
        (64, "Lee Sin"),
        (103, "Ahri"),
        (157, "Yasuo"),
        (238, "Zed"),
        (412, "Thresh"),
        (498, "Xayah"),
    ])
}

pub fn scout_with<S: SeasonStatsSource>(api: MockRiotApi, season: S) -> ClashScout<MockRiotApi, S> {
    let config = ScoutConfig::default();
    let gate = Arc::new(ScrapeGate::new(Duration::ZERO));
    ClashScout::new(api, season, champion_names(), gate, config)
}
