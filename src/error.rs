use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded, please try again later")]
    RateLimited,

    #[error("Invalid Riot ID format. Use format: Name#TAG")]
    InvalidRiotId,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}

/// Why a whole scout request could not produce a result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoutError {
    #[error("No Riot account found for {riot_id}")]
    NoRiotData { riot_id: String },

    #[error("{riot_id} is not registered in an active Clash team")]
    NoActiveTeam { riot_id: String },

    #[error("Could not load the roster of Clash team {team_id}")]
    NoTeamRoster { team_id: String },

    #[error("None of the players could be resolved")]
    AllPlayersFailed,
}
