use crate::error::AppError;
use governor::{clock::DefaultClock, state::{InMemoryState, NotKeyed}, Quota, RateLimiter};
use std::time::Duration;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::debug;

/// Process-wide gate for the season-stats source: at most one request in
/// flight, and consecutive requests start at least `min_delay` apart.
///
/// One instance is shared (behind an `Arc`) by every concurrent player fetch.
pub struct ScrapeGate {
    slot: Semaphore,
    pacing: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    min_delay: Duration,
}

/// Held for the duration of one scrape; dropping it frees the slot.
pub struct ScrapePermit<'a> {
    _slot: SemaphorePermit<'a>,
}

impl ScrapeGate {
    pub fn new(min_delay: Duration) -> Self {
        // A zero delay yields no quota, only the single slot applies
        let pacing = Quota::with_period(min_delay).map(RateLimiter::direct);
        ScrapeGate {
            slot: Semaphore::new(1),
            pacing,
            min_delay,
        }
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    pub async fn acquire(&self) -> Result<ScrapePermit<'_>, AppError> {
        let slot = self
            .slot
            .acquire()
            .await
            .map_err(|e| AppError::ApiError(format!("scrape gate closed: {}", e)))?;

        if let Some(pacing) = &self.pacing {
            pacing.until_ready().await;
        }
        debug!("scrape slot acquired");

        Ok(ScrapePermit { _slot: slot })
    }
}
