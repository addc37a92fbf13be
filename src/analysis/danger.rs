use crate::config::{DangerConfig, ThreatConfig};
use crate::model::{ChampionRecord, DangerScore, PlayerProfile};

/// Points and explanation of one heuristic that fired.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub points: i64,
    pub reason: String,
}

/// Which numbers fed the winrate heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WinrateSource {
    Season,
    Recent,
}

pub struct DangerScorer<'a> {
    config: &'a DangerConfig,
}

impl<'a> DangerScorer<'a> {
    pub fn new(config: &'a DangerConfig) -> Self {
        DangerScorer { config }
    }

    /// Records with no games in either window and little mastery are not
    /// worth evaluating.
    pub fn qualifies(&self, record: &ChampionRecord) -> bool {
        record.games > 0
            || record.season_games > 0
            || record.mastery_points > self.config.qualify_mastery_floor
    }

    /// Fires on high mastery or a large share of the player's season games.
    pub fn one_trick(&self, record: &ChampionRecord, season_games_total: u32) -> Option<Contribution> {
        let reason = if record.mastery_points >= self.config.otp_mastery_threshold {
            format!("OTP ({} pts)", group_thousands(record.mastery_points))
        } else {
            let share = season_share(record.season_games, season_games_total)?;
            if share < self.config.otp_season_share {
                return None;
            }
            format!("OTP ({:.0}% of season games)", share)
        };

        Some(Contribution {
            points: self.config.otp_score,
            reason,
        })
    }

    pub fn recent_spam(&self, record: &ChampionRecord) -> Option<Contribution> {
        if record.games < self.config.spam_games_threshold {
            return None;
        }
        Some(Contribution {
            points: self.config.spam_score,
            reason: format!("Recent spam ({} games)", record.games),
        })
    }

    /// Winrate and sample size to judge the champion on: season numbers when
    /// the season sample is large enough, else the recent window.
    pub fn effective_winrate(&self, record: &ChampionRecord) -> Option<(f64, u32, WinrateSource)> {
        if record.season_games >= self.config.season_min_games {
            Some((record.season_winrate, record.season_games, WinrateSource::Season))
        } else if record.games >= self.config.recent_min_games {
            Some((record.winrate(), record.games, WinrateSource::Recent))
        } else {
            None
        }
    }

    /// `floor((winrate - baseline) * coefficient * sqrt(games))`, never negative.
    pub fn winrate_points(&self, winrate: f64, games: u32) -> i64 {
        let above = winrate - self.config.winrate_baseline;
        if above <= 0.0 {
            return 0;
        }
        let points = (above * self.config.winrate_points_per_percent * (games as f64).sqrt()).floor();
        (points as i64).max(0)
    }

    pub fn winrate_bonus(&self, record: &ChampionRecord) -> Option<Contribution> {
        let (winrate, games, source) = self.effective_winrate(record)?;
        let points = self.winrate_points(winrate, games);
        if points <= 0 {
            return None;
        }

        let window = match source {
            WinrateSource::Season => "season",
            WinrateSource::Recent => "recent",
        };
        Some(Contribution {
            points,
            reason: format!("{:.0}% WR over {} {} games", winrate, games, window),
        })
    }

    /// Low mastery but dominant recent results.
    pub fn smurf(&self, record: &ChampionRecord) -> Option<Contribution> {
        let suspicious = record.mastery_points < self.config.smurf_mastery_ceiling
            && record.games >= self.config.recent_min_games
            && record.winrate() >= self.config.smurf_winrate_threshold
            && record.kda() >= self.config.smurf_kda_threshold;
        if !suspicious {
            return None;
        }
        Some(Contribution {
            points: self.config.smurf_score,
            reason: format!("Possible smurf ({:.1} KDA)", record.kda()),
        })
    }

    /// Sums every heuristic that fires, in evaluation order.
    pub fn score(&self, record: &ChampionRecord, player: &PlayerProfile) -> DangerScore {
        let contributions = [
            self.one_trick(record, player.season_games_total),
            self.recent_spam(record),
            self.winrate_bonus(record),
            self.smurf(record),
        ];

        let mut total_score = 0;
        let mut reasons = Vec::new();
        for contribution in contributions.into_iter().flatten() {
            total_score += contribution.points;
            reasons.push(contribution.reason);
        }

        let (winrate, games_played) = match self.effective_winrate(record) {
            Some((winrate, games, _)) => (winrate, games),
            None => (record.winrate(), record.games),
        };

        DangerScore {
            champion_id: record.champion_id,
            champion_name: record.champion_name.clone(),
            total_score,
            reasons,
            player_name: player.riot_id(),
            role_context: player.main_role().unwrap_or("UNKNOWN").to_string(),
            mastery_points: record.mastery_points,
            games_played,
            winrate,
        }
    }
}

/// Per-player strength used only to compare two rosters.
pub fn threat_score(recent_winrate: f64, recent_kda: f64, rank_value: i64, config: &ThreatConfig) -> f64 {
    let winrate_part = (recent_winrate - 50.0).max(0.0) * config.winrate_weight;
    let kda_part = (recent_kda - config.kda_baseline).max(0.0) * config.kda_weight * 10.0;
    let rank_part = rank_value as f64 / 100.0 * config.rank_weight;
    winrate_part + kda_part + rank_part
}

fn season_share(champion_games: u32, total: u32) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(champion_games as f64 / total as f64 * 100.0)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
