use crate::cache::{CachePolicy, ResponseCache};
use crate::config::Config;
use crate::error::AppError;
use async_trait::async_trait;
use governor::{clock::DefaultClock, state::{InMemoryState, NotKeyed}, Quota, RateLimiter};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use super::data_dragon::ChampionNames;
use super::endpoints::{self, MatchQuery};
use super::models::*;
use super::RiotApi;

const MAX_RETRIES: u32 = 3;
const USER_AGENT: &str = concat!("clash_scout/", env!("CARGO_PKG_VERSION"));

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

pub struct RiotApiClient {
    config: Config,
    per_second: DirectLimiter,
    per_two_minutes: DirectLimiter,
    cache: Arc<ResponseCache>,
}

fn nonzero(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN)
}

/// Development key: 20 requests per second.
fn per_second_quota() -> Quota {
    Quota::per_second(nonzero(20))
}

/// Development key: 100 requests per 2 minutes. A burst of 50 plus one
/// token every 2.4s never admits more than 100 in any 2 minute window.
fn two_minute_quota() -> Quota {
    Quota::with_period(Duration::from_millis(2400))
        .unwrap_or_else(|| Quota::per_minute(nonzero(25)))
        .allow_burst(nonzero(50))
}

impl RiotApiClient {
    pub fn new(config: Config, cache: Arc<ResponseCache>) -> Self {
        let per_second = RateLimiter::direct(per_second_quota());
        let per_two_minutes = RateLimiter::direct(two_minute_quota());
        RiotApiClient {
            config,
            per_second,
            per_two_minutes,
            cache,
        }
    }

    pub fn region(&self) -> &str {
        &self.config.region
    }

    fn routing(&self) -> &'static str {
        self.config.regional_routing()
    }

    /// Performs one GET on the blocking pool once both quotas allow it.
    async fn fetch(&self, url: &str, authenticated: bool) -> Result<String, AppError> {
        if authenticated {
            self.per_second.until_ready().await;
            self.per_two_minutes.until_ready().await;
        }

        let api_key = authenticated.then(|| self.config.api_key.clone());
        let timeout = self.config.http_timeout;
        let request_url = url.to_string();

        tokio::task::spawn_blocking(move || execute_request(&request_url, api_key.as_deref(), timeout))
            .await
            .map_err(|e| AppError::HttpError(format!("request task failed: {}", e)))?
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        policy: CachePolicy,
        authenticated: bool,
    ) -> Result<T, AppError> {
        let body = match self.cache.get(url) {
            Some(body) => {
                debug!(url, "cache hit");
                body
            }
            None => {
                let body = self.fetch(url, authenticated).await?;
                self.cache.put(url, &body, policy);
                body
            }
        };

        serde_json::from_str(&body).map_err(|e| AppError::JsonError(format!("{}: {}", url, e)))
    }

    /// Loads the champion id/name table of the latest Data Dragon release.
    pub async fn champion_names(&self) -> Result<ChampionNames, AppError> {
        let versions: Vec<String> = self
            .get_json(&endpoints::data_dragon_versions(), CachePolicy::VERSIONS, false)
            .await?;
        let version = versions
            .first()
            .ok_or_else(|| AppError::ApiError("Data Dragon returned no versions".to_string()))?;

        let champions: DataDragonChampions = self
            .get_json(
                &endpoints::data_dragon_champions(version),
                CachePolicy::STATIC_DATA,
                false,
            )
            .await?;

        Ok(ChampionNames::from_data_dragon(&champions))
    }
}

fn execute_request(url: &str, api_key: Option<&str>, timeout: Duration) -> Result<String, AppError> {
    let mut retry_count = 0;

    loop {
        let mut request = ureq::get(url).set("User-Agent", USER_AGENT).timeout(timeout);
        if let Some(key) = api_key {
            request = request.set("X-Riot-Token", key);
        }

        match request.call() {
            Ok(resp) => {
                return resp.into_string().map_err(|e| AppError::HttpError(e.to_string()));
            }
            Err(ureq::Error::Status(429, resp)) => {
                // Rate limited - wait and retry
                if retry_count >= MAX_RETRIES {
                    return Err(AppError::RateLimited);
                }
                let wait = resp
                    .header("Retry-After")
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| Duration::from_millis(2000 * (retry_count + 1) as u64));
                warn!(url, wait_ms = wait.as_millis() as u64, "rate limited, retrying");
                thread::sleep(wait);
                retry_count += 1;
            }
            Err(ureq::Error::Status(404, _)) => {
                return Err(AppError::NotFound(url.to_string()));
            }
            Err(ureq::Error::Status(code, _)) => {
                return Err(AppError::ApiError(format!("{} returned status {}", url, code)));
            }
            Err(e) => {
                return Err(AppError::HttpError(e.to_string()));
            }
        }
    }
}

#[async_trait]
impl RiotApi for RiotApiClient {
    async fn account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto, AppError> {
        let url = endpoints::account_by_riot_id(self.routing(), game_name, tag_line);
        self.get_json(&url, CachePolicy::ACCOUNT, true)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound(format!("{}#{}", game_name, tag_line)),
                other => other,
            })
    }

    async fn account_by_puuid(&self, puuid: &str) -> Result<AccountDto, AppError> {
        let url = endpoints::account_by_puuid(self.routing(), puuid);
        self.get_json(&url, CachePolicy::ACCOUNT, true).await
    }

    async fn league_entries(&self, puuid: &str) -> Result<Vec<LeagueEntryDto>, AppError> {
        let url = endpoints::league_entries(&self.config.region, puuid);
        if let Some(body) = self.cache.get(&url) {
            return serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()));
        }

        let body = self.fetch(&url, true).await?;
        let entries: Vec<LeagueEntryDto> =
            serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))?;

        // An unranked answer may change after the next placement game
        if !entries.is_empty() {
            self.cache.put(&url, &body, CachePolicy::RANK);
        }
        Ok(entries)
    }

    async fn top_masteries(
        &self,
        puuid: &str,
        count: usize,
    ) -> Result<Vec<ChampionMasteryDto>, AppError> {
        let url = endpoints::top_masteries(&self.config.region, puuid, count);
        self.get_json(&url, CachePolicy::MASTERY, true).await
    }

    async fn match_ids(&self, puuid: &str, query: &MatchQuery) -> Result<Vec<String>, AppError> {
        let url = endpoints::match_ids(self.routing(), puuid, query);
        self.get_json(&url, CachePolicy::MATCH_IDS, true).await
    }

    async fn match_by_id(&self, match_id: &str) -> Result<MatchDto, AppError> {
        let url = endpoints::match_by_id(self.routing(), match_id);
        self.get_json(&url, CachePolicy::MATCH, true).await
    }

    async fn clash_players(&self, puuid: &str) -> Result<Vec<ClashPlayerDto>, AppError> {
        let url = endpoints::clash_players(&self.config.region, puuid);
        match self.get_json(&url, CachePolicy::CLASH, true).await {
            // Not registered in any tournament
            Err(AppError::NotFound(_)) => Ok(Vec::new()),
            other => other,
        }
    }

    async fn clash_team(&self, team_id: &str) -> Result<ClashTeamDto, AppError> {
        let url = endpoints::clash_team(&self.config.region, team_id);
        self.get_json(&url, CachePolicy::CLASH, true).await
    }
}
