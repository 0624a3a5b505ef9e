//! Provider quota tracking and request admission

use crate::error::SearchError;
use chrono::Utc;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Snapshot of a provider's search quota.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitState {
    /// Search calls left in the current window
    pub remaining: u64,
    /// Epoch seconds at which the quota is restored. Unset until the
    /// first request completes; unset means unconsumed quota.
    pub reset_at: Option<i64>,
}

impl RateLimitState {
    pub fn new(remaining: u64, reset_at: i64) -> Self {
        Self {
            remaining,
            reset_at: Some(reset_at),
        }
    }

    /// Seconds until the quota window resets. Non-positive once the
    /// reset instant has passed, zero when no request has been issued.
    pub fn seconds_until_reset(&self) -> i64 {
        match self.reset_at {
            Some(at) => at - Utc::now().timestamp(),
            None => 0,
        }
    }
}

/// Gates outgoing search requests against the provider's quota.
///
/// The snapshot is only ever set from a completed response or an explicit
/// probe, never decremented speculatively by the client.
#[derive(Debug, Default)]
pub struct RateLimitGuard {
    state: Mutex<RateLimitState>,
}

impl RateLimitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh quota snapshot from a response or probe.
    pub fn record(&self, state: RateLimitState) {
        debug!(
            "rate limit snapshot: {} remaining, resets in {}s",
            state.remaining,
            state.seconds_until_reset()
        );
        *self.state.lock().unwrap() = state;
    }

    pub fn snapshot(&self) -> RateLimitState {
        *self.state.lock().unwrap()
    }

    /// Admit one search request, suspending the calling task until the
    /// quota allows it.
    ///
    /// `probe` refreshes the quota out of band without consuming search
    /// quota; it is only invoked when the reset instant has passed but no
    /// response has refreshed the cached state. When the quota is truly
    /// exhausted the task waits until the reset instant and then proceeds
    /// on the assumption that the window has been restored; the next
    /// response refreshes the snapshot.
    pub async fn admit<F, Fut>(&self, probe: F) -> Result<(), SearchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RateLimitState, SearchError>>,
    {
        let current = self.snapshot();
        if current.reset_at.is_none() {
            // No requests issued yet
            return Ok(());
        }
        if current.remaining > 0 {
            return Ok(());
        }

        if current.seconds_until_reset() <= 0 {
            let refreshed = probe().await?;
            self.record(refreshed);
            if refreshed.remaining > 0 {
                return Ok(());
            }
        }

        let wait = self.snapshot().seconds_until_reset();
        if wait > 0 {
            info!("search rate limit hit, waiting {}s for the reset window", wait);
            sleep(Duration::from_secs(wait as u64)).await;
        }

        Ok(())
    }
}
