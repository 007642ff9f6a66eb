//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, rates sane, addresses parse)
//! - Check index names are usable by the document store
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SynthConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::SynthConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &SynthConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.store.request_timeout_secs == 0 {
        errors.push(ValidationError::new("store.request_timeout_secs", "must be > 0"));
    }
    if config.store.base_delay_ms > config.store.max_delay_ms {
        errors.push(ValidationError::new(
            "store.base_delay_ms",
            "must not exceed store.max_delay_ms",
        ));
    }

    let store_budget = store_request_budget_ms(config);
    if store_budget > config.timeouts.request_secs.saturating_mul(1000) {
        errors.push(ValidationError::new(
            "store.request_timeout_secs",
            format!(
                "with {} retries a store call may take {}ms, longer than timeouts.request_secs",
                config.store.max_retries, store_budget
            ),
        ));
    }

    let indices = [
        ("indices.traces", &config.indices.traces),
        ("indices.transaction_fallback", &config.indices.transaction_fallback),
        ("indices.span_fallback", &config.indices.span_fallback),
        ("indices.logs_prefix", &config.indices.logs_prefix),
        ("indices.synthetics_prefix", &config.indices.synthetics_prefix),
        ("store.probe_index", &config.store.probe_index),
    ];
    for (field, name) in indices {
        if let Err(message) = check_index_name(name) {
            errors.push(ValidationError::new(field, message));
        }
    }

    let generation = &config.generation;
    if generation.max_duration_minutes == 0 || generation.max_duration_minutes > MAX_RUN_MINUTES {
        errors.push(ValidationError::new(
            "generation.max_duration_minutes",
            format!("must be in 1..={}", MAX_RUN_MINUTES),
        ));
    } else if generation.default_duration_minutes > generation.max_duration_minutes {
        errors.push(ValidationError::new(
            "generation.default_duration_minutes",
            "must not exceed generation.max_duration_minutes",
        ));
    }
    if generation.tick_interval_ms == 0 {
        errors.push(ValidationError::new("generation.tick_interval_ms", "must be > 0"));
    }
    if generation.default_duration_minutes == 0 {
        errors.push(ValidationError::new(
            "generation.default_duration_minutes",
            "must be > 0",
        ));
    }
    if generation.default_events_per_second == 0
        || generation.default_events_per_second > generation.max_events_per_second
    {
        errors.push(ValidationError::new(
            "generation.default_events_per_second",
            format!("must be in 1..={}", generation.max_events_per_second),
        ));
    }
    if generation.progress_every_batches == 0 {
        errors.push(ValidationError::new(
            "generation.progress_every_batches",
            "must be > 0",
        ));
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::new(
            "observability.log_format",
            format!("unknown format '{}', expected pretty or json", other),
        )),
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "is not a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// One year.
const MAX_RUN_MINUTES: u64 = 365 * 24 * 60;

/// Worst case for one store call: every attempt times out and every backoff is at its cap.
fn store_request_budget_ms(config: &SynthConfig) -> u64 {
    let store = &config.store;
    let attempts = u64::from(store.max_retries) + 1;
    store
        .request_timeout_secs
        .saturating_mul(1000)
        .saturating_mul(attempts)
        .saturating_add(store.max_delay_ms.saturating_mul(u64::from(store.max_retries)))
}

/// Elasticsearch index names: lowercase, no spaces or path separators, not empty.
fn check_index_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("must not be empty".to_string());
    }
    if name.starts_with(['-', '_', '+']) {
        return Err(format!("'{}' must not start with '-', '_' or '+'", name));
    }
    if name
        .chars()
        .any(|c| c.is_ascii_uppercase() || matches!(c, ' ' | '/' | '\\' | '*' | '?' | '"' | '<' | '>' | '|' | ',' | '#' | ':'))
    {
        return Err(format!("'{}' is not a valid index name", name));
    }
    Ok(())
}
