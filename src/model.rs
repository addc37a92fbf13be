use crate::analysis::match_history::RoleDistribution;
use crate::api::models::LeagueEntryDto;

/// Ordinal value of a player with no placement in the queue.
pub const UNRANKED_VALUE: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

impl Tier {
    pub const ALL: [Tier; 10] = [
        Tier::Iron,
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Emerald,
        Tier::Diamond,
        Tier::Master,
        Tier::Grandmaster,
        Tier::Challenger,
    ];

    pub fn parse(raw: &str) -> Option<Tier> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.label().eq_ignore_ascii_case(raw.trim()))
    }

    pub fn weight(self) -> i64 {
        self as i64
    }

    /// Master and above have no divisions.
    pub fn is_apex(self) -> bool {
        self >= Tier::Master
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Iron => "Iron",
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Platinum => "Platinum",
            Tier::Emerald => "Emerald",
            Tier::Diamond => "Diamond",
            Tier::Master => "Master",
            Tier::Grandmaster => "Grandmaster",
            Tier::Challenger => "Challenger",
        }
    }

    /// Tier whose band contains an ordinal rank value.
    pub fn from_rank_value(value: i64) -> Tier {
        let index = (value.max(0) / 400) as usize;
        Tier::ALL[index.min(Tier::ALL.len() - 1)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Division {
    Four,
    Three,
    Two,
    One,
}

impl Division {
    pub fn parse(raw: &str) -> Option<Division> {
        match raw.trim() {
            "IV" | "4" => Some(Division::Four),
            "III" | "3" => Some(Division::Three),
            "II" | "2" => Some(Division::Two),
            "I" | "1" => Some(Division::One),
            _ => None,
        }
    }

    pub fn weight(self) -> i64 {
        self as i64
    }

    pub fn roman(self) -> &'static str {
        match self {
            Division::Four => "IV",
            Division::Three => "III",
            Division::Two => "II",
            Division::One => "I",
        }
    }
}

/// Standing in one ranked queue.
#[derive(Debug, Clone, PartialEq)]
pub struct RankRecord {
    pub tier: Tier,
    pub division: Option<Division>,
    pub league_points: i64,
    pub wins: u32,
    pub losses: u32,
}

impl RankRecord {
    pub fn from_entry(entry: &LeagueEntryDto) -> Option<RankRecord> {
        let tier = Tier::parse(&entry.tier)?;
        let division = if tier.is_apex() {
            None
        } else {
            Division::parse(&entry.rank)
        };
        Some(RankRecord {
            tier,
            division,
            league_points: entry.league_points,
            wins: entry.wins,
            losses: entry.losses,
        })
    }

    /// `tier * 400 + division * 100 + LP`, comparable across tiers.
    pub fn value(&self) -> i64 {
        let division = self.division.map(Division::weight).unwrap_or(0);
        self.tier.weight() * 400 + division * 100 + self.league_points
    }

    pub fn winrate(&self) -> f64 {
        let games = self.wins + self.losses;
        if games == 0 {
            0.0
        } else {
            self.wins as f64 / games as f64 * 100.0
        }
    }

    pub fn label(&self) -> String {
        match self.division {
            Some(division) => format!(
                "{} {} {} LP",
                self.tier.label(),
                division.roman(),
                self.league_points
            ),
            None => format!("{} {} LP", self.tier.label(), self.league_points),
        }
    }
}

pub fn rank_value(rank: Option<&RankRecord>) -> i64 {
    rank.map(RankRecord::value).unwrap_or(UNRANKED_VALUE)
}

/// `(kills + assists) / deaths`, with zero deaths counted as one.
pub fn kda(kills: u32, deaths: u32, assists: u32) -> f64 {
    (kills + assists) as f64 / deaths.max(1) as f64
}

/// One player's history with one champion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChampionRecord {
    pub champion_id: i64,
    pub champion_name: String,
    pub mastery_points: u64,
    pub games: u32,
    pub wins: u32,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub season_games: u32,
    /// Percent, 0-100.
    pub season_winrate: f64,
}

impl ChampionRecord {
    pub fn new(champion_id: i64, champion_name: impl Into<String>) -> Self {
        ChampionRecord {
            champion_id,
            champion_name: champion_name.into(),
            ..ChampionRecord::default()
        }
    }

    pub fn losses(&self) -> u32 {
        self.games.saturating_sub(self.wins)
    }

    /// Recent-window winrate in percent.
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
}

/// Everything known about one scouted player.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerProfile {
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
    pub solo_rank: Option<RankRecord>,
    pub flex_rank: Option<RankRecord>,
    pub recent_games: u32,
    pub recent_winrate: f64,
    pub recent_kda: f64,
    pub roles: RoleDistribution,
    pub champions: Vec<ChampionRecord>,
    /// Sum of season games across all champions, 0 without season data.
    pub season_games_total: u32,
    pub threat_score: f64,
    pub playstyle: String,
    /// Position picked in the Clash lobby, used when no match shows a role.
    pub registered_position: Option<String>,
    /// Set when the profile's data could not be loaded; such profiles are
    /// shown but never scored.
    pub error: Option<String>,
}

impl PlayerProfile {
    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }

    pub fn main_role(&self) -> Option<&str> {
        self.roles
            .main_role()
            .or(self.registered_position.as_deref())
    }

    pub fn rank_value(&self) -> i64 {
        rank_value(self.solo_rank.as_ref())
    }

    pub fn is_scorable(&self) -> bool {
        self.error.is_none()
    }
}

/// A ban recommendation for one champion in one player's hands.
#[derive(Debug, Clone, PartialEq)]
pub struct DangerScore {
    pub champion_id: i64,
    pub champion_name: String,
    pub total_score: i64,
    pub reasons: Vec<String>,
    pub player_name: String,
    /// Main role, or the full role breakdown for flex players.
    pub role_context: String,
    pub mastery_points: u64,
    pub games_played: u32,
    pub winrate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoutResult {
    pub team_name: Option<String>,
    pub players: Vec<PlayerProfile>,
    pub optimal_bans: Vec<DangerScore>,
    pub alternative_bans: Vec<DangerScore>,
    pub team_composition: String,
    pub average_elo: i64,
}

impl ScoutResult {
    pub fn has_danger_data(&self) -> bool {
        !self.optimal_bans.is_empty()
    }
}
