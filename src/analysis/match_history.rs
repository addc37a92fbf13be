use crate::api::models::MatchDto;
use crate::model::kda;
use std::collections::{BTreeMap, HashMap};

/// Per-champion counters over the analyzed match window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChampionCounters {
    pub games: u32,
    pub wins: u32,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

impl ChampionCounters {
    pub fn winrate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64 * 100.0
        }
    }

    pub fn kda(&self) -> f64 {
        kda(self.kills, self.deaths, self.assists)
    }

    fn absorb(&mut self, other: &ChampionCounters) {
        self.games += other.games;
        self.wins += other.wins;
        self.kills += other.kills;
        self.deaths += other.deaths;
        self.assists += other.assists;
    }
}

/// How often a player appeared in each role.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleDistribution {
    counts: BTreeMap<String, u32>,
    total: u32,
}

impl RoleDistribution {
    /// Empty roles (remakes, unranked modes) are not counted.
    pub fn record(&mut self, role: &str) {
        let role = role.trim();
        if role.is_empty() {
            return;
        }
        *self.counts.entry(role.to_uppercase()).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn total_games(&self) -> u32 {
        self.total
    }

    pub fn role_count(&self) -> usize {
        self.counts.len()
    }

    /// Role -> percent of games with a recorded role.
    pub fn percentages(&self) -> BTreeMap<String, f64> {
        if self.total == 0 {
            return BTreeMap::new();
        }
        self.counts
            .iter()
            .map(|(role, count)| (role.clone(), *count as f64 / self.total as f64 * 100.0))
            .collect()
    }

    /// Percentages, most played first.
    pub fn ranked(&self) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self.percentages().into_iter().collect();
        // stable: ties stay in role-name order
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    pub fn main_role(&self) -> Option<&str> {
        let mut best: Option<(&str, u32)> = None;
        for (role, count) in &self.counts {
            if best.map_or(true, |(_, c)| *count > c) {
                best = Some((role.as_str(), *count));
            }
        }
        best.map(|(role, _)| role)
    }

    /// Percent of games in the main role.
    pub fn main_share(&self) -> f64 {
        match self.main_role() {
            Some(role) => self.counts[role] as f64 / self.total as f64 * 100.0,
            None => 0.0,
        }
    }

    /// Several roles and none of them reaches `threshold` percent.
    pub fn is_flex(&self, threshold: f64) -> bool {
        self.counts.len() > 1 && self.main_share() < threshold
    }

    /// `"TOP (40%) / JUNGLE (35%) / MIDDLE (25%)"`
    pub fn breakdown(&self) -> String {
        self.ranked()
            .iter()
            .map(|(role, pct)| format!("{} ({}%)", role, pct.round() as i64))
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Result of reducing one player's matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchHistorySummary {
    pub champions: BTreeMap<i64, ChampionCounters>,
    /// Champion names as reported by the match records.
    pub champion_names: HashMap<i64, String>,
    pub roles: RoleDistribution,
    pub matches_analyzed: u32,
}

impl MatchHistorySummary {
    pub fn totals(&self) -> ChampionCounters {
        let mut totals = ChampionCounters::default();
        for counters in self.champions.values() {
            totals.absorb(counters);
        }
        totals
    }

    pub fn is_empty(&self) -> bool {
        self.matches_analyzed == 0
    }
}

pub struct MatchHistoryTracker {
    puuid: String,
    summary: MatchHistorySummary,
}

impl MatchHistoryTracker {
    pub fn new(puuid: &str) -> Self {
        MatchHistoryTracker {
            puuid: puuid.to_string(),
            summary: MatchHistorySummary::default(),
        }
    }

    /// Counts the tracked player's line of one match. Returns `false` and
    /// leaves every counter untouched when the player is not in it.
    pub fn add_match(&mut self, match_data: &MatchDto) -> bool {
        let Some(player) = match_data
            .info
            .participants
            .iter()
            .find(|p| p.puuid == self.puuid)
        else {
            return false;
        };

        let entry = self.summary.champions.entry(player.champion_id).or_default();
        entry.games += 1;
        if player.win {
            entry.wins += 1;
        }
        entry.kills += player.kills;
        entry.deaths += player.deaths;
        entry.assists += player.assists;

        if !player.champion_name.is_empty() {
            self.summary
                .champion_names
                .entry(player.champion_id)
                .or_insert_with(|| player.champion_name.clone());
        }

        self.summary.roles.record(&player.team_position);
        self.summary.matches_analyzed += 1;
        true
    }

    pub fn finish(self) -> MatchHistorySummary {
        self.summary
    }

    pub fn analyze<'a>(matches: impl IntoIterator<Item = &'a MatchDto>, puuid: &str) -> MatchHistorySummary {
        let mut tracker = MatchHistoryTracker::new(puuid);
        for match_data in matches {
            tracker.add_match(match_data);
        }
        tracker.finish()
    }
}
