//! Clash scouting: fetches the five players of an enemy Clash team, scores
//! how dangerous each of their champions is and recommends bans.

pub mod analysis;
pub mod api;
pub mod cache;
pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod rate_limit;
pub mod scout;
pub mod season;

pub use error::{AppError, ScoutError};
pub use model::{DangerScore, PlayerProfile, ScoutResult};
pub use scout::{ClashScout, PlayerIdentity};
