use super::danger::DangerScorer;
use crate::config::ScoutConfig;
use crate::model::{DangerScore, PlayerProfile, ScoutResult};
use std::collections::HashMap;

/// Turns a set of scouted players into one ranked ban list and the
/// team-level summary.
pub struct TeamAggregator<'a> {
    config: &'a ScoutConfig,
}

impl<'a> TeamAggregator<'a> {
    pub fn new(config: &'a ScoutConfig) -> Self {
        TeamAggregator { config }
    }

    /// Role label attached to a player's bans. Flex players get the whole
    /// breakdown since their threats depend on the role they end up in.
    pub fn role_context(&self, player: &PlayerProfile) -> String {
        if player.roles.is_flex(self.config.bans.flex_role_threshold) {
            player.roles.breakdown()
        } else {
            player.main_role().unwrap_or("UNKNOWN").to_string()
        }
    }

    /// Scores of every qualifying champion of one player, highest first.
    pub fn player_threats(&self, player: &PlayerProfile) -> Vec<DangerScore> {
        if !player.is_scorable() {
            return Vec::new();
        }

        let scorer = DangerScorer::new(&self.config.danger);
        let role_context = self.role_context(player);
        // Bans on a flex player depend on the role they end up in
        let flex_note = player
            .roles
            .is_flex(self.config.bans.flex_role_threshold)
            .then(|| format!("Flex: {}", role_context));

        let mut scores: Vec<DangerScore> = player
            .champions
            .iter()
            .filter(|record| scorer.qualifies(record))
            .map(|record| {
                let mut score = scorer.score(record, player);
                score.role_context = role_context.clone();
                score.reasons.extend(flex_note.clone());
                score
            })
            .collect();

        scores.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        scores
    }

    /// All threats of the roster, one per champion (the highest-scoring
    /// owner wins), sorted by score. Equal scores keep roster order.
    pub fn rank_threats(&self, players: &[PlayerProfile]) -> Vec<DangerScore> {
        let mut unique: Vec<DangerScore> = Vec::new();
        let mut index_by_champion: HashMap<i64, usize> = HashMap::new();

        for player in players {
            for score in self.player_threats(player) {
                match index_by_champion.get(&score.champion_id) {
                    Some(&idx) => {
                        if score.total_score > unique[idx].total_score {
                            unique[idx] = score;
                        }
                    }
                    None => {
                        index_by_champion.insert(score.champion_id, unique.len());
                        unique.push(score);
                    }
                }
            }
        }

        unique.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        unique
    }

    /// Splits the ranked threats into optimal and alternative bans.
    pub fn recommend_bans(&self, players: &[PlayerProfile]) -> (Vec<DangerScore>, Vec<DangerScore>) {
        let mut ranked = self.rank_threats(players).into_iter();
        let optimal: Vec<DangerScore> = ranked.by_ref().take(self.config.bans.optimal_count).collect();
        let alternative: Vec<DangerScore> = ranked.take(self.config.bans.alternative_count).collect();
        (optimal, alternative)
    }

    pub fn playstyle(&self, player: &PlayerProfile) -> String {
        let threats = self.player_threats(player);
        let Some(top) = threats.first() else {
            return "No data".to_string();
        };

        if top.total_score as f64 >= self.config.danger.otp_score as f64 * 1.5 {
            return format!("OTP {}", top.champion_name);
        }
        if player.roles.is_flex(self.config.bans.flex_role_threshold) {
            return "Flex".to_string();
        }
        "Standard pool".to_string()
    }

    pub fn build_result(&self, team_name: Option<String>, players: Vec<PlayerProfile>) -> ScoutResult {
        let (optimal_bans, alternative_bans) = self.recommend_bans(&players);
        ScoutResult {
            team_name,
            team_composition: composition_label(&players),
            average_elo: average_elo(&players),
            optimal_bans,
            alternative_bans,
            players,
        }
    }
}

pub fn composition_label(players: &[PlayerProfile]) -> String {
    format!("{}-stack", players.len())
}

/// Mean solo-queue rank value, truncated. Unranked players count as the floor.
pub fn average_elo(players: &[PlayerProfile]) -> i64 {
    if players.is_empty() {
        return 0;
    }
    let total: i64 = players.iter().map(PlayerProfile::rank_value).sum();
    total / players.len() as i64
}

pub fn team_threat(players: &[PlayerProfile]) -> f64 {
    players
        .iter()
        .filter(|p| p.is_scorable())
        .map(|p| p.threat_score)
        .sum()
}

/// `enemy threat / our threat`. Above 1 the enemy looks stronger.
pub fn compare_teams(ours: &[PlayerProfile], enemy: &[PlayerProfile]) -> f64 {
    let our_threat = team_threat(ours);
    let enemy_threat = team_threat(enemy);

    if our_threat == 0.0 {
        if enemy_threat == 0.0 {
            1.0
        } else {
            f64::INFINITY
        }
    } else {
        enemy_threat / our_threat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChampionRecord, RankRecord, Tier};

    fn player(name: &str, roles: &[&str], champions: Vec<ChampionRecord>) -> PlayerProfile {
        let mut profile = PlayerProfile {
            game_name: name.to_string(),
            tag_line: "EUW".to_string(),
            champions,
            ..PlayerProfile::default()
        };
        for role in roles {
            profile.roles.record(role);
        }
        profile
    }

    fn otp(id: i64, name: &str, mastery: u64) -> ChampionRecord {
        ChampionRecord {
            mastery_points: mastery,
            ..ChampionRecord::new(id, name)
        }
    }

    fn winning(id: i64, name: &str, games: u32, wins: u32) -> ChampionRecord {
        ChampionRecord {
            mastery_points: 60_000,
            games,
            wins,
            kills: games,
            deaths: games,
            assists: games,
            ..ChampionRecord::new(id, name)
        }
    }

    fn ranked(value_tier: Tier, lp: i64) -> Option<RankRecord> {
        Some(RankRecord {
            tier: value_tier,
            division: None,
            league_points: lp,
            wins: 0,
            losses: 0,
        })
    }

    #[test]
    fn duplicate_champion_keeps_higher_score() {
        let config = ScoutConfig::default();
        let aggregator = TeamAggregator::new(&config);
        let players = vec![
            // mastery-only OTP: 50
            player("A", &["TOP"], vec![otp(157, "Yasuo", 300_000)]),
            // OTP + spam: 80
            player("B", &["MIDDLE"], vec![ChampionRecord {
                games: 5,
                wins: 2,
                ..otp(157, "Yasuo", 300_000)
            }]),
        ];

        let threats = aggregator.rank_threats(&players);
        assert_eq!(threats.len(), 1);
        assert_eq!(threats[0].champion_id, 157);
        assert_eq!(threats[0].total_score, config.danger.otp_score + config.danger.spam_score);
        assert_eq!(threats[0].player_name, "B#EUW");
        assert_eq!(threats[0].role_context, "MIDDLE");
        assert!(threats[0].reasons.iter().all(|r| !r.starts_with("Flex")));
    }

    #[test]
    fn ties_keep_roster_order() {
        let config = ScoutConfig::default();
        let aggregator = TeamAggregator::new(&config);
        let players = vec![
            player("A", &[], vec![otp(1, "Annie", 250_000)]),
            player("B", &[], vec![otp(2, "Olaf", 250_000)]),
        ];

        let threats = aggregator.rank_threats(&players);
        let ids: Vec<i64> = threats.iter().map(|t| t.champion_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn bans_are_split_into_optimal_and_alternative() {
        let config = ScoutConfig::default();
        let aggregator = TeamAggregator::new(&config);
        let champions: Vec<ChampionRecord> = (1..=12)
            .map(|id| otp(id, &format!("Champ{}", id), 200_000 + id as u64))
            .collect();
        let players = vec![player("A", &["TOP"], champions)];

        let (optimal, alternative) = aggregator.recommend_bans(&players);
        assert_eq!(optimal.len(), 5);
        assert_eq!(alternative.len(), 5);
        assert!(optimal.iter().all(|b| !alternative.iter().any(|a| a.champion_id == b.champion_id)));
    }

    #[test]
    fn unqualified_records_and_errored_players_are_ignored() {
        let config = ScoutConfig::default();
        let aggregator = TeamAggregator::new(&config);

        let low = player("A", &["TOP"], vec![otp(3, "Galio", 40_000)]);
        assert!(aggregator.player_threats(&low).is_empty());

        let mut errored = player("B", &["TOP"], vec![otp(4, "Twisted Fate", 900_000)]);
        errored.error = Some("profile unavailable".to_string());
        assert!(aggregator.player_threats(&errored).is_empty());
        assert_eq!(aggregator.playstyle(&errored), "No data");
    }

    #[test]
    fn flex_players_get_role_breakdown() {
        let config = ScoutConfig::default();
        let aggregator = TeamAggregator::new(&config);
        let flex = player(
            "Flexer",
            &["TOP", "TOP", "JUNGLE", "JUNGLE", "MIDDLE"],
            vec![winning(64, "Lee Sin", 5, 4)],
        );

        let threats = aggregator.rank_threats(&[flex.clone()]);
        assert_eq!(threats[0].role_context, "JUNGLE (40%) / TOP (40%) / MIDDLE (20%)");
        assert_eq!(
            threats[0].reasons.last().map(String::as_str),
            Some("Flex: JUNGLE (40%) / TOP (40%) / MIDDLE (20%)")
        );
        assert_eq!(aggregator.playstyle(&flex), "Flex");
    }

    #[test]
    fn playstyle_labels() {
        let config = ScoutConfig::default();
        let aggregator = TeamAggregator::new(&config);

        // OTP + spam = 80 >= 75
        let one_trick = player("A", &["MIDDLE"], vec![ChampionRecord {
            games: 5,
            wins: 2,
            ..otp(7, "LeBlanc", 500_000)
        }]);
        assert_eq!(aggregator.playstyle(&one_trick), "OTP LeBlanc");

        let standard = player("B", &["MIDDLE"], vec![otp(7, "LeBlanc", 250_000)]);
        assert_eq!(aggregator.playstyle(&standard), "Standard pool");
    }

    #[test]
    fn average_elo_truncates() {
        let mut a = player("A", &[], vec![]);
        a.solo_rank = ranked(Tier::Master, 1);
        let b = player("B", &[], vec![]);

        // (2801 + 0) / 2
        assert_eq!(average_elo(&[a, b]), 1400);
        assert_eq!(average_elo(&[]), 0);
    }

    #[test]
    fn comparison_edge_cases() {
        let mut strong = player("A", &[], vec![]);
        strong.threat_score = 30.0;
        let mut weak = player("B", &[], vec![]);
        weak.threat_score = 10.0;
        let zero = player("C", &[], vec![]);

        assert_eq!(compare_teams(&[weak.clone()], &[strong.clone()]), 3.0);
        assert_eq!(compare_teams(&[zero.clone()], &[zero.clone()]), 1.0);
        assert_eq!(compare_teams(&[], &[]), 1.0);
        assert!(compare_teams(&[zero], &[strong]).is_infinite());
    }

    #[test]
    fn build_result_summarizes_roster() {
        let config = ScoutConfig::default();
        let aggregator = TeamAggregator::new(&config);
        let players = vec![
            player("A", &["TOP"], vec![otp(1, "Annie", 300_000)]),
            player("B", &["JUNGLE"], vec![]),
        ];

        let result = aggregator.build_result(Some("Wolves".to_string()), players);
        assert_eq!(result.team_composition, "2-stack");
        assert_eq!(result.optimal_bans.len(), 1);
        assert!(result.alternative_bans.is_empty());
        assert!(result.has_danger_data());
        assert_eq!(result.team_name.as_deref(), Some("Wolves"));
    }
}
