use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::HeaderMap;

use crate::error::{Error, Result};

/// Tracks the REST quota GitHub reports back so an exhausted quota fails
/// fast instead of burning a request that will be rejected.
pub struct RateLimiter {
    state: Mutex<RateLimitState>,
}

#[derive(Default)]
struct RateLimitState {
    remaining: Option<u32>,
    reset_at: Option<DateTime<Utc>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RateLimitState::default()),
        }
    }

    pub fn check(&self) -> Result<()> {
        self.check_at(Utc::now())
    }

    pub fn check_at(&self, now: DateTime<Utc>) -> Result<()> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if state.remaining == Some(0) {
            if let Some(reset_at) = state.reset_at {
                if reset_at > now {
                    let wait_secs = (reset_at - now).num_seconds().max(1) as u64;
                    tracing::warn!("GitHub rate limit exhausted, resets in {}s", wait_secs);
                    return Err(Error::RateLimited(wait_secs));
                }
            }
        }

        Ok(())
    }

    pub fn update_from_headers(&self, headers: &HeaderMap) {
        let remaining = headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u32>().ok());

        let Some(remaining) = remaining else {
            return;
        };

        let reset_at = headers
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single());

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.remaining = Some(remaining);
        state.reset_at = reset_at;
        tracing::debug!("GitHub rate limit remaining: {}", remaining);
    }

    pub fn remaining(&self) -> Option<u32> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remaining
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use reqwest::header::HeaderValue;

    fn headers(remaining: &str, reset: i64) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_str(remaining).unwrap());
        headers.insert("x-ratelimit-reset", HeaderValue::from_str(&reset.to_string()).unwrap());
        headers
    }

    #[test]
    fn test_fresh_limiter_allows_requests() {
        let limiter = RateLimiter::new();
        assert!(limiter.check().is_ok());
        assert_eq!(limiter.remaining(), None);
    }

    #[test]
    fn test_exhausted_quota_fails_fast_until_reset() {
        let limiter = RateLimiter::new();
        let now = Utc::now();
        let reset = now + Duration::minutes(10);
        limiter.update_from_headers(&headers("0", reset.timestamp()));

        match limiter.check_at(now) {
            Err(Error::RateLimited(secs)) => assert!(secs > 500 && secs <= 600),
            other => panic!("expected rate limit error, got {:?}", other),
        }
        assert!(limiter.check_at(reset + Duration::seconds(1)).is_ok());
    }

    #[test]
    fn test_remaining_quota_allows_requests() {
        let limiter = RateLimiter::new();
        limiter.update_from_headers(&headers("59", Utc::now().timestamp() + 3600));
        assert_eq!(limiter.remaining(), Some(59));
        assert!(limiter.check().is_ok());
    }

    #[test]
    fn test_missing_headers_leave_state_untouched() {
        let limiter = RateLimiter::new();
        limiter.update_from_headers(&HeaderMap::new());
        assert_eq!(limiter.remaining(), None);
    }
}
