//! Retry policy for store requests.
//!
//! # Responsibilities
//! - Decide whether a failed request is worth repeating
//! - Produce the delay before each retry
//!
//! # Design Decisions
//! - Connection errors and timeouts are always retryable
//! - 429, 502, 503 and 504 are retryable; every other status is final

use std::time::Duration;

use reqwest::StatusCode;

use crate::config::StoreConfig;
use crate::resilience::backoff::calculate_backoff;
use crate::sink::SinkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    /// Delay before retry number `attempt`, or `None` once the budget is spent.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_retries {
            return None;
        }
        Some(calculate_backoff(attempt, self.base_delay_ms, self.max_delay_ms))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}

pub fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Whether a sink error is transient.
pub fn is_retryable(error: &SinkError) -> bool {
    match error {
        SinkError::Transport(e) => e.is_connect() || e.is_timeout(),
        SinkError::Status { status, .. } => is_retryable_status(*status),
        _ => false,
    }
}
