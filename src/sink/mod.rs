//! Emission sinks.
//!
//! # Data Flow
//! ```text
//! Generator
//!     → fallback.rs (primary index, then one legacy alternate for trace documents)
//!     → DocumentSink::write
//!         → elasticsearch.rs (HTTP, retried per resilience::RetryPolicy)
//!         → memory.rs (bounded buffer for dry runs and tests)
//! ```
//!
//! # Design Decisions
//! - The sink is a trait object so a run never knows which store it feeds
//! - Write failures are values; the caller decides whether a tick failed

pub mod cloud_id;
pub mod elasticsearch;
pub mod fallback;
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub use elasticsearch::{ClusterInfo, ElasticsearchSink};
pub use fallback::{write_with_fallback, IndexTarget, WriteOutcome};
pub use memory::MemorySink;

/// Errors raised while writing documents or talking to the store.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("invalid cloud id: {0}")]
    InvalidCloudId(String),

    #[error("either a cloud id or an endpoint is required, together with an api key")]
    MissingCredentials,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected store response: {0}")]
    Decode(String),

    #[error("document rejected by index '{index}'")]
    Rejected { index: String },

    #[error("sink is full ({capacity} documents)")]
    Full { capacity: usize },
}

/// Destination for generated documents.
#[async_trait]
pub trait DocumentSink: Send + Sync + fmt::Debug {
    /// Store one document in `index`.
    async fn write(&self, index: &str, document: &Value) -> Result<(), SinkError>;
}
