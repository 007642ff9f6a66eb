//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Store request:
//!     → retries.rs (classify the failure, decide whether to try again)
//!     → backoff.rs (sleep before the next attempt)
//!     → exhausted: error surfaces to write-with-fallback
//! ```
//!
//! # Design Decisions
//! - Only transport failures and overload statuses are retried
//! - A rejected document (4xx) is never retried here; the fallback index handles it
//! - Jittered backoff, capped

pub mod backoff;
pub mod retries;

pub use backoff::calculate_backoff;
pub use retries::RetryPolicy;
