use crate::error::AppError;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub region: String,
    pub http_timeout: Duration,
    pub cache_path: Option<PathBuf>,
    pub settings_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("RIOT_API_KEY").map_err(|_| {
            AppError::ConfigError(
                "RIOT_API_KEY not found in .env file".to_string(),
            )
        })?;

        let region = env::var("RIOT_REGION").unwrap_or_else(|_| "na1".to_string());

        let http_timeout = match env::var("RIOT_HTTP_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    AppError::ConfigError(format!("RIOT_HTTP_TIMEOUT_SECS is not a number: {}", raw))
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(10),
        };

        let cache_path = env::var("CLASH_SCOUT_CACHE").ok().map(PathBuf::from);
        let settings_path = env::var("CLASH_SCOUT_SETTINGS").ok().map(PathBuf::from);

        Ok(Config {
            api_key,
            region: region.to_lowercase(),
            http_timeout,
            cache_path,
            settings_path,
        })
    }

    /// Regional cluster serving account-v1 and match-v5 for this platform.
    pub fn regional_routing(&self) -> &'static str {
        match self.region.as_str() {
            "na1" | "br1" | "la1" | "la2" => "americas",
            "euw1" | "eun1" | "tr1" | "ru" | "me1" => "europe",
            "kr" | "jp1" => "asia",
            "oc1" | "ph2" | "sg2" | "th2" | "tw2" | "vn2" => "sea",
            _ => "americas", // default
        }
    }

    /// Scoring settings from `CLASH_SCOUT_SETTINGS`, or the defaults.
    pub fn load_scout_config(&self) -> Result<ScoutConfig, AppError> {
        match &self.settings_path {
            Some(path) => ScoutConfig::load(path),
            None => Ok(ScoutConfig::default()),
        }
    }
}

/// Every tunable of the scouting engine. Missing keys in a settings file
/// fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub danger: DangerConfig,
    pub threat: ThreatConfig,
    pub fetch: FetchConfig,
    pub bans: BanConfig,
}

impl ScoutConfig {
    pub fn load(path: &std::path::Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, AppError> {
        serde_json::from_str(content)
            .map_err(|e| AppError::ConfigError(format!("Invalid scout settings: {}", e)))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DangerConfig {
    pub otp_mastery_threshold: u64,
    /// Percent of the player's season games on one champion.
    pub otp_season_share: f64,
    pub otp_score: i64,
    pub spam_games_threshold: u32,
    pub spam_score: i64,
    pub winrate_baseline: f64,
    pub winrate_points_per_percent: f64,
    pub season_min_games: u32,
    pub recent_min_games: u32,
    pub smurf_mastery_ceiling: u64,
    pub smurf_winrate_threshold: f64,
    pub smurf_kda_threshold: f64,
    pub smurf_score: i64,
    pub qualify_mastery_floor: u64,
}

impl Default for DangerConfig {
    fn default() -> Self {
        DangerConfig {
            otp_mastery_threshold: 200_000,
            otp_season_share: 40.0,
            otp_score: 50,
            spam_games_threshold: 5,
            spam_score: 30,
            winrate_baseline: 50.0,
            winrate_points_per_percent: 0.5,
            season_min_games: 10,
            recent_min_games: 3,
            smurf_mastery_ceiling: 50_000,
            smurf_winrate_threshold: 70.0,
            smurf_kda_threshold: 4.0,
            smurf_score: 40,
            qualify_mastery_floor: 50_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThreatConfig {
    pub winrate_weight: f64,
    pub kda_weight: f64,
    pub rank_weight: f64,
    pub kda_baseline: f64,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        ThreatConfig {
            winrate_weight: 1.0,
            kda_weight: 1.0,
            rank_weight: 1.0,
            kda_baseline: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub recent_match_count: usize,
    pub mastery_count: usize,
    /// Epoch seconds; only matches after this point are analyzed.
    pub season_start: Option<i64>,
    pub scrape_min_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            recent_match_count: 20,
            mastery_count: 10,
            season_start: None,
            scrape_min_delay_ms: 2000,
        }
    }
}

impl FetchConfig {
    pub fn scrape_min_delay(&self) -> Duration {
        Duration::from_millis(self.scrape_min_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BanConfig {
    pub optimal_count: usize,
    pub alternative_count: usize,
    /// Percent of games a role needs before the player counts as a one-role player.
    pub flex_role_threshold: f64,
}

impl Default for BanConfig {
    fn default() -> Self {
        BanConfig {
            optimal_count: 5,
            alternative_count: 5,
            flex_role_threshold: 60.0,
        }
    }
}
