use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// How long a response from one endpoint may be served from cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    Never,
    Permanent,
    Minutes(i64),
}

impl CachePolicy {
    pub const ACCOUNT: CachePolicy = CachePolicy::Permanent;
    pub const RANK: CachePolicy = CachePolicy::Minutes(30);
    pub const MASTERY: CachePolicy = CachePolicy::Minutes(60);
    pub const MATCH_IDS: CachePolicy = CachePolicy::Minutes(5);
    pub const MATCH: CachePolicy = CachePolicy::Permanent;
    pub const CLASH: CachePolicy = CachePolicy::Never;
    pub const STATIC_DATA: CachePolicy = CachePolicy::Permanent;
    pub const VERSIONS: CachePolicy = CachePolicy::Minutes(24 * 60);
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedResponse {
    pub body: String,
    pub cached_at: DateTime<Utc>,
    /// `None` never expires.
    pub ttl_minutes: Option<i64>,
}

impl CachedResponse {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.ttl_minutes {
            None => true,
            Some(ttl) => now.signed_duration_since(self.cached_at) < Duration::minutes(ttl),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    last_updated: Option<DateTime<Utc>>,
    entries: HashMap<String, CachedResponse>,
}

/// Raw response bodies keyed by request URL, shared by every concurrent
/// request of one client and optionally persisted between runs.
pub struct ResponseCache {
    path: Option<PathBuf>,
    entries: Mutex<HashMap<String, CachedResponse>>,
}

impl ResponseCache {
    pub fn in_memory() -> Self {
        ResponseCache {
            path: None,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".clash_scout")
            .join("responses.json")
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let entries = match fs::read_to_string(path) {
            Ok(content) => {
                let file: CacheFile = serde_json::from_str(&content).map_err(|e| {
                    AppError::CacheError(format!("Failed to parse cache: {}", e))
                })?;
                file.entries
            }
            // Cache doesn't exist yet
            Err(_) => HashMap::new(),
        };

        Ok(ResponseCache {
            path: Some(path.to_path_buf()),
            entries: Mutex::new(entries),
        })
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CachedResponse>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let now = Utc::now();
        self.entries()
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.body.clone())
    }

    pub fn put(&self, key: &str, body: &str, policy: CachePolicy) {
        let ttl_minutes = match policy {
            CachePolicy::Never => return,
            CachePolicy::Permanent => None,
            CachePolicy::Minutes(m) => Some(m),
        };
        self.entries().insert(
            key.to_string(),
            CachedResponse {
                body: body.to_string(),
                cached_at: Utc::now(),
                ttl_minutes,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Drops expired entries and writes the rest to disk. No-op for an
    /// in-memory cache.
    pub fn save(&self) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let now = Utc::now();
        let entries: HashMap<String, CachedResponse> = {
            let mut guard = self.entries();
            guard.retain(|_, entry| entry.is_fresh(now));
            guard.clone()
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                AppError::CacheError(format!("Failed to create cache directory: {}", e))
            })?;
        }

        let file = CacheFile {
            last_updated: Some(now),
            entries,
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| {
            AppError::CacheError(format!("Failed to serialize cache: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| AppError::CacheError(format!("Failed to write cache: {}", e)))?;

        Ok(())
    }

    /// Saves, then hands back `outcome` untouched. Responses fetched before
    /// a failed run are kept; a failed save is only logged.
    pub fn save_after<T, E>(&self, outcome: Result<T, E>) -> Result<T, E> {
        if let Err(e) = self.save() {
            warn!(error = %e, "could not save the response cache");
        }
        outcome
    }
}
