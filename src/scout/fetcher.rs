use crate::analysis::danger::threat_score;
use crate::analysis::match_history::{MatchHistorySummary, MatchHistoryTracker};
use crate::analysis::team::TeamAggregator;
use crate::api::models::{AccountDto, ChampionMasteryDto, LeagueEntryDto, FLEX_QUEUE, SOLO_QUEUE};
use crate::api::{ChampionNames, MatchQuery, RiotApi};
use crate::config::ScoutConfig;
use crate::error::AppError;
use crate::model::{ChampionRecord, PlayerProfile, RankRecord};
use crate::rate_limit::ScrapeGate;
use crate::season::{SeasonStats, SeasonStatsSource};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Who to fetch: a stable id, or a Riot ID still to be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerIdentity {
    Puuid(String),
    RiotId { game_name: String, tag_line: String },
}

impl PlayerIdentity {
    /// Parses `"Name#TAG"`; the name may itself contain spaces.
    pub fn parse_riot_id(raw: &str) -> Result<Self, AppError> {
        let (game_name, tag_line) = raw.rsplit_once('#').ok_or(AppError::InvalidRiotId)?;
        let game_name = game_name.trim();
        let tag_line = tag_line.trim();
        if game_name.is_empty() || tag_line.is_empty() {
            return Err(AppError::InvalidRiotId);
        }
        Ok(PlayerIdentity::RiotId {
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
        })
    }

    pub fn label(&self) -> String {
        match self {
            PlayerIdentity::Puuid(puuid) => puuid.clone(),
            PlayerIdentity::RiotId { game_name, tag_line } => format!("{}#{}", game_name, tag_line),
        }
    }
}

/// Outcome of one sub-fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Data(T),
    Empty,
    Failed(String),
}

impl<T> Fetched<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, Fetched::Failed(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Fetched::Data(data) => Some(data),
            _ => None,
        }
    }
}

impl<T> Fetched<Vec<T>> {
    fn from_list(result: Result<Vec<T>, AppError>) -> Self {
        match result {
            Ok(items) if items.is_empty() => Fetched::Empty,
            Ok(items) => Fetched::Data(items),
            Err(e) => Fetched::Failed(e.to_string()),
        }
    }
}

/// Assembles `PlayerProfile`s. Every sub-fetch degrades to an empty default
/// on failure; only an unresolvable account drops the player.
pub struct PlayerDataFetcher<'a, A, S> {
    api: &'a A,
    season: &'a S,
    names: &'a ChampionNames,
    gate: Arc<ScrapeGate>,
    config: &'a ScoutConfig,
}

impl<'a, A: RiotApi, S: SeasonStatsSource> PlayerDataFetcher<'a, A, S> {
    pub fn new(
        api: &'a A,
        season: &'a S,
        names: &'a ChampionNames,
        gate: Arc<ScrapeGate>,
        config: &'a ScoutConfig,
    ) -> Self {
        PlayerDataFetcher {
            api,
            season,
            names,
            gate,
            config,
        }
    }

    pub async fn fetch_profile(&self, identity: &PlayerIdentity) -> Option<PlayerProfile> {
        let (account, (ranks, masteries, match_ids)) = match identity {
            PlayerIdentity::Puuid(puuid) => {
                tokio::join!(self.api.account_by_puuid(puuid), self.fetch_player_data(puuid))
            }
            PlayerIdentity::RiotId { game_name, tag_line } => {
                let account = match self.api.account_by_riot_id(game_name, tag_line).await {
                    Ok(account) => account,
                    Err(e) => {
                        warn!(player = %identity.label(), error = %e, "account lookup failed");
                        return None;
                    }
                };
                let data = self.fetch_player_data(&account.puuid).await;
                (Ok(account), data)
            }
        };

        let account = match account {
            Ok(account) => account,
            Err(e) => {
                warn!(player = %identity.label(), error = %e, "account lookup failed");
                return None;
            }
        };

        let (season, history) = tokio::join!(
            self.fetch_season_stats(&account),
            self.fetch_history(&account.puuid, match_ids)
        );

        let profile = self.assemble(account, ranks, masteries, season, history);
        info!(
            player = %profile.riot_id(),
            champions = profile.champions.len(),
            recent_games = profile.recent_games,
            "profile assembled"
        );
        Some(profile)
    }

    async fn fetch_player_data(
        &self,
        puuid: &str,
    ) -> (
        Fetched<Vec<LeagueEntryDto>>,
        Fetched<Vec<ChampionMasteryDto>>,
        Fetched<Vec<String>>,
    ) {
        let query = MatchQuery {
            count: self.config.fetch.recent_match_count,
            queue: None,
            start_time: self.config.fetch.season_start,
        };
        let (ranks, masteries, match_ids) = tokio::join!(
            self.api.league_entries(puuid),
            self.api.top_masteries(puuid, self.config.fetch.mastery_count),
            self.api.match_ids(puuid, &query)
        );

        let ranks = Fetched::from_list(ranks);
        let masteries = Fetched::from_list(masteries);
        let match_ids = Fetched::from_list(match_ids);
        for (what, failure) in [
            ("ranks", failed_reason(&ranks)),
            ("masteries", failed_reason(&masteries)),
            ("match ids", failed_reason(&match_ids)),
        ] {
            if let Some(reason) = failure {
                warn!(puuid, what, reason, "sub-fetch failed, using empty data");
            }
        }
        (ranks, masteries, match_ids)
    }

    /// Serialized process-wide through the scrape gate.
    async fn fetch_season_stats(&self, account: &AccountDto) -> Fetched<SeasonStats> {
        let _permit = match self.gate.acquire().await {
            Ok(permit) => permit,
            Err(e) => return Fetched::Failed(e.to_string()),
        };

        match self.season.season_stats(&account.game_name, &account.tag_line).await {
            Ok(stats) if stats.is_empty() => Fetched::Empty,
            Ok(stats) => Fetched::Data(stats),
            Err(e) => {
                warn!(player = %account.riot_id(), error = %e, "season stats unavailable, falling back to mastery");
                Fetched::Failed(e.to_string())
            }
        }
    }

    async fn fetch_history(&self, puuid: &str, match_ids: Fetched<Vec<String>>) -> Fetched<MatchHistorySummary> {
        let ids = match match_ids {
            Fetched::Data(ids) => ids,
            Fetched::Empty => return Fetched::Empty,
            Fetched::Failed(reason) => return Fetched::Failed(reason),
        };

        let results = join_all(ids.iter().map(|id| self.api.match_by_id(id))).await;
        let mut matches = Vec::with_capacity(results.len());
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(match_data) => matches.push(match_data),
                Err(e) => debug!(match_id = %id, error = %e, "skipping match"),
            }
        }

        if matches.is_empty() {
            return Fetched::Failed("no match record could be loaded".to_string());
        }

        let summary = MatchHistoryTracker::analyze(&matches, puuid);
        if summary.is_empty() {
            Fetched::Empty
        } else {
            Fetched::Data(summary)
        }
    }

    /// Merges the sub-fetch outcomes into a profile.
    pub fn assemble(
        &self,
        account: AccountDto,
        ranks: Fetched<Vec<LeagueEntryDto>>,
        masteries: Fetched<Vec<ChampionMasteryDto>>,
        season: Fetched<SeasonStats>,
        history: Fetched<MatchHistorySummary>,
    ) -> PlayerProfile {
        let (solo_rank, flex_rank) = match &ranks {
            Fetched::Data(entries) => (queue_rank(entries, SOLO_QUEUE), queue_rank(entries, FLEX_QUEUE)),
            Fetched::Empty | Fetched::Failed(_) => (None, None),
        };

        let error = if masteries.is_failed() && history.is_failed() {
            Some("profile data unavailable".to_string())
        } else {
            None
        };

        let mastery_list: &[ChampionMasteryDto] = match &masteries {
            Fetched::Data(list) => list,
            Fetched::Empty | Fetched::Failed(_) => &[],
        };

        let (champions, season_games_total) =
            merge_champion_records(self.names, season.data(), mastery_list, history.data(), self.config.danger.season_min_games);

        let totals = history.data().map(MatchHistorySummary::totals).unwrap_or_default();
        let roles = history.data().map(|h| h.roles.clone()).unwrap_or_default();

        let mut profile = PlayerProfile {
            puuid: account.puuid,
            game_name: account.game_name,
            tag_line: account.tag_line,
            solo_rank,
            flex_rank,
            recent_games: totals.games,
            recent_winrate: totals.winrate(),
            recent_kda: totals.kda(),
            roles,
            champions,
            season_games_total,
            threat_score: 0.0,
            playstyle: String::new(),
            registered_position: None,
            error,
        };

        profile.threat_score = threat_score(
            profile.recent_winrate,
            profile.recent_kda,
            profile.rank_value(),
            &self.config.threat,
        );
        profile.playstyle = TeamAggregator::new(self.config).playstyle(&profile);
        profile
    }
}

fn failed_reason<T>(fetched: &Fetched<T>) -> Option<&str> {
    match fetched {
        Fetched::Failed(reason) => Some(reason.as_str()),
        _ => None,
    }
}

fn queue_rank(entries: &[LeagueEntryDto], queue: &str) -> Option<RankRecord> {
    entries
        .iter()
        .find(|entry| entry.queue_type == queue)
        .and_then(RankRecord::from_entry)
}

/// Builds one record per champion id out of season stats (when the season
/// sample reaches `season_min_games`), mastery and the recent-match window.
/// Returns the records and the season game total.
pub fn merge_champion_records(
    names: &ChampionNames,
    season: Option<&SeasonStats>,
    masteries: &[ChampionMasteryDto],
    history: Option<&MatchHistorySummary>,
    season_min_games: u32,
) -> (Vec<ChampionRecord>, u32) {
    let mut records: Vec<ChampionRecord> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    let season_total: u32 = season.map(|s| s.values().map(|c| c.games).sum()).unwrap_or(0);
    let use_season = season_total >= season_min_games && season_total > 0;

    if let (true, Some(season)) = (use_season, season) {
        let mut entries: Vec<_> = season.iter().collect();
        entries.sort_by(|a, b| b.1.games.cmp(&a.1.games).then_with(|| a.0.cmp(b.0)));

        for (name, stats) in entries {
            let Some(champion_id) = names.id_for(name) else {
                debug!(champion = %name, "unknown champion in season stats");
                continue;
            };
            let record = upsert(&mut records, &mut index, champion_id, || {
                names.name(champion_id).unwrap_or(name.as_str()).to_string()
            });
            // Two names can resolve to one champion; weight winrates by games
            let games = record.season_games + stats.games;
            if games > 0 {
                record.season_winrate = (record.season_winrate * record.season_games as f64
                    + stats.winrate * stats.games as f64)
                    / games as f64;
            }
            record.season_games = games;
        }
    }

    for mastery in masteries {
        let record = upsert(&mut records, &mut index, mastery.champion_id, || {
            champion_label(names, None, mastery.champion_id)
        });
        record.mastery_points = mastery.champion_points;
    }

    if let Some(history) = history {
        for (champion_id, counters) in &history.champions {
            let record = upsert(&mut records, &mut index, *champion_id, || {
                champion_label(names, history.champion_names.get(champion_id), *champion_id)
            });
            record.games += counters.games;
            record.wins += counters.wins;
            record.kills += counters.kills;
            record.deaths += counters.deaths;
            record.assists += counters.assists;
        }
    }

    (records, if use_season { season_total } else { 0 })
}

fn upsert<'r>(
    records: &'r mut Vec<ChampionRecord>,
    index: &mut HashMap<i64, usize>,
    champion_id: i64,
    name: impl FnOnce() -> String,
) -> &'r mut ChampionRecord {
    let idx = *index.entry(champion_id).or_insert_with(|| {
        records.push(ChampionRecord::new(champion_id, name()));
        records.len() - 1
    });
    &mut records[idx]
}

fn champion_label(names: &ChampionNames, reported: Option<&String>, champion_id: i64) -> String {
    names
        .name(champion_id)
        .map(str::to_string)
        .or_else(|| reported.cloned())
        .unwrap_or_else(|| format!("Champion {}", champion_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::match_history::ChampionCounters;
    use crate::season::SeasonChampionStats;

    fn names() -> ChampionNames {
        ChampionNames::from_pairs([(157, "Yasuo"), (238, "Zed"), (64, "Lee Sin")])
    }

    fn mastery(champion_id: i64, points: u64) -> ChampionMasteryDto {
        ChampionMasteryDto {
            champion_id,
            champion_points: points,
        }
    }

    fn season(entries: &[(&str, u32, f64)]) -> SeasonStats {
        entries
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
            .collect()
    }

    #[test]
    fn parses_riot_ids() {
        assert_eq!(
            PlayerIdentity::parse_riot_id("Hide on bush#KR1").unwrap(),
            PlayerIdentity::RiotId {
                game_name: "Hide on bush".to_string(),
                tag_line: "KR1".to_string()
            }
        );
        assert!(PlayerIdentity::parse_riot_id("NoTag").is_err());
        assert!(PlayerIdentity::parse_riot_id("#EUW").is_err());
        assert!(PlayerIdentity::parse_riot_id("Name# ").is_err());
    }

    #[test]
    fn sources_merge_by_champion_id() {
        let stats = season(&[("Yasuo", 30, 60.0), ("Zed", 5, 40.0), ("Unknown Champ", 3, 50.0)]);
        let masteries = vec![mastery(157, 400_000), mastery(64, 90_000)];
        let mut history = MatchHistorySummary::default();
        history.champions.insert(
            157,
            ChampionCounters {
                games: 4,
                wins: 3,
                kills: 20,
                deaths: 5,
                assists: 10,
            },
        );
        history.champions.insert(
            99,
            ChampionCounters {
                games: 1,
                wins: 1,
                ..ChampionCounters::default()
            },
        );
        history.champion_names.insert(99, "Lux".to_string());

        let (records, total) = merge_champion_records(&names(), Some(&stats), &masteries, Some(&history), 10);

        assert_eq!(total, 38);
        let ids: Vec<i64> = records.iter().map(|r| r.champion_id).collect();
        assert_eq!(ids, vec![157, 238, 64, 99]);

        let yasuo = &records[0];
        assert_eq!(yasuo.season_games, 30);
        assert_eq!(yasuo.season_winrate, 60.0);
        assert_eq!(yasuo.mastery_points, 400_000);
        assert_eq!(yasuo.games, 4);
        assert_eq!(yasuo.wins, 3);

        assert_eq!(records[3].champion_name, "Lux");
    }

    #[test]
    fn small_season_sample_falls_back_to_mastery() {
        let stats = season(&[("Yasuo", 6, 80.0)]);
        let masteries = vec![mastery(238, 120_000)];

        let (records, total) = merge_champion_records(&names(), Some(&stats), &masteries, None, 10);

        assert_eq!(total, 0);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].champion_name, "Zed");
        assert_eq!(records[0].season_games, 0);
    }

    #[test]
    fn season_aliases_of_one_champion_are_merged_by_games() {
        let stats = season(&[("Lee Sin", 30, 60.0), ("LeeSin", 10, 40.0)]);

        let (records, total) = merge_champion_records(&names(), Some(&stats), &[], None, 10);

        assert_eq!(total, 40);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].champion_name, "Lee Sin");
        assert_eq!(records[0].season_games, 40);
        assert!((records[0].season_winrate - 55.0).abs() < 1e-9);
    }

    #[test]
    fn no_sources_means_no_records() {
        let (records, total) = merge_champion_records(&names(), None, &[], None, 10);
        assert!(records.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn unknown_ids_get_placeholder_names() {
        let (records, _) = merge_champion_records(&ChampionNames::default(), None, &[mastery(901, 60_000)], None, 10);
        assert_eq!(records[0].champion_name, "Champion 901");
    }

    #[test]
    fn fetched_from_list() {
        assert_eq!(Fetched::<Vec<u8>>::from_list(Ok(vec![])), Fetched::Empty);
        assert_eq!(Fetched::from_list(Ok(vec![1u8])), Fetched::Data(vec![1u8]));
        let failed: Fetched<Vec<u8>> = Fetched::from_list(Err(AppError::RateLimited));
        assert!(failed.is_failed());
        assert!(failed.data().is_none());
    }
}
