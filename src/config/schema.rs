//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the generator service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the telemetry generator.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SynthConfig {
    /// Control surface listener.
    pub listener: ListenerConfig,

    /// Timeout configuration for the control surface.
    pub timeouts: TimeoutConfig,

    /// Document store client settings.
    pub store: StoreConfig,

    /// Index names documents are written to.
    pub indices: IndexConfig,

    /// Generation run defaults and limits.
    pub generation: GenerationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration for control requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Document store client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Transport-level retries for a single request (connection errors, 429, 5xx gateway).
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Probe write permission on connect.
    pub verify_write: bool,

    /// Index the write probe document goes to.
    pub probe_index: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
            verify_write: true,
            probe_index: "traces-apm-test".to_string(),
        }
    }
}

/// Index naming.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Primary index for transactions and spans.
    pub traces: String,

    /// Legacy index a rejected transaction is retried against.
    pub transaction_fallback: String,

    /// Legacy index a rejected span is retried against.
    pub span_fallback: String,

    /// Log index prefix; the industry key is appended (`logs-gaming`).
    pub logs_prefix: String,

    /// Synthetic check index prefix (`synthetics-gaming`).
    pub synthetics_prefix: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            traces: "traces-apm-default".to_string(),
            transaction_fallback: "apm-8.0.0-transaction".to_string(),
            span_fallback: "apm-8.0.0-span".to_string(),
            logs_prefix: "logs".to_string(),
            synthetics_prefix: "synthetics".to_string(),
        }
    }
}

impl IndexConfig {
    pub fn logs_index(&self, industry: &str) -> String {
        format!("{}-{}", self.logs_prefix, industry)
    }

    pub fn synthetics_index(&self, industry: &str) -> String {
        format!("{}-{}", self.synthetics_prefix, industry)
    }
}

/// Generation run configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Run length when the start request does not name one.
    pub default_duration_minutes: u64,

    /// Longest run a start request may ask for.
    pub max_duration_minutes: u64,

    /// Event rate when the start request does not name one.
    pub default_events_per_second: u32,

    /// Upper bound accepted for `events_per_second`.
    pub max_events_per_second: u32,

    /// Scheduler tick in milliseconds.
    pub tick_interval_ms: u64,

    /// A run aborts once consecutive failed ticks exceed this.
    pub max_consecutive_failures: u32,

    /// Log a progress line every N batches.
    pub progress_every_batches: u64,

    /// Documents retained by a dry-run connection.
    pub dry_run_capacity: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: 10,
            max_duration_minutes: 24 * 60,
            default_events_per_second: 17,
            max_events_per_second: 10_000,
            tick_interval_ms: 1000,
            max_consecutive_failures: 10,
            progress_every_batches: 30,
            dry_run_capacity: 10_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024, // 64KB
        }
    }
}
