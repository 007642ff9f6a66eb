//! Application log events.

use chrono::{DateTime, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use serde_json::{json, Value};

use crate::catalog::{IndustryProfile, Perturbation};
use crate::synth::document::{iso_timestamp, DocumentLabels};
use crate::synth::trace::random_uuid;

/// Scenario runs raise the chance of the WARN/ERROR-only mix by this factor.
const INCIDENT_LEVEL_FACTOR: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

const NORMAL_MIX: &[(LogLevel, u32)] = &[
    (LogLevel::Info, 70),
    (LogLevel::Warn, 15),
    (LogLevel::Error, 5),
    (LogLevel::Debug, 10),
];

const INCIDENT_MIX: &[(LogLevel, u32)] = &[(LogLevel::Warn, 60), (LogLevel::Error, 40)];

/// One generated log line.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
    pub level: LogLevel,
    pub message: String,
}

impl LogEvent {
    pub fn to_document(&self, labels: &DocumentLabels) -> Value {
        json!({
            "@timestamp": iso_timestamp(self.timestamp),
            "service.name": self.service,
            "log.level": self.level.as_str(),
            "message": self.message,
            "labels": labels.to_value(),
        })
    }
}

/// Draw a log event for a random service of the industry.
pub fn generate_log<R: Rng + ?Sized>(
    topology: &IndustryProfile,
    perturbation: &Perturbation,
    timestamp: DateTime<Utc>,
    rng: &mut R,
) -> LogEvent {
    let service = topology.services.choose(rng).copied().unwrap_or(topology.key);

    let incident = perturbation.is_active()
        && rng.gen::<f64>() < perturbation.error_rate * INCIDENT_LEVEL_FACTOR;
    let level = draw_level(if incident { INCIDENT_MIX } else { NORMAL_MIX }, rng);

    LogEvent {
        timestamp,
        service,
        level,
        message: log_message(level, service, rng),
    }
}

fn draw_level<R: Rng + ?Sized>(mix: &[(LogLevel, u32)], rng: &mut R) -> LogLevel {
    match WeightedIndex::new(mix.iter().map(|(_, w)| *w)) {
        Ok(dist) => mix[dist.sample(rng)].0,
        Err(_) => LogLevel::Info,
    }
}

fn log_message<R: Rng + ?Sized>(level: LogLevel, service: &str, rng: &mut R) -> String {
    let templates: &[&str] = match level {
        LogLevel::Info => &[
            "Request processed successfully in 45ms",
            "Cache hit rate: 87%",
            "Health check passed",
            "Connected to downstream service",
        ],
        LogLevel::Warn => &[
            "High latency detected: 250ms (threshold: 200ms)",
            "Retry attempt 2/3 for downstream call",
            "Cache miss rate elevated: 25%",
            "Memory usage at 78% of limit",
        ],
        LogLevel::Error => &[
            "Connection pool exhausted (max: 50)",
            "Database query timeout after 30s",
            "Failed to connect to downstream service after 3 retries",
            "Uncaught exception: NullPointerException in request handler",
        ],
        LogLevel::Debug => &[
            "Processing request ID: {id}",
            "Executing database query",
            "Validating request payload",
        ],
    };

    let template = templates.choose(rng).copied().unwrap_or("Health check passed");
    let body = if template.contains("{id}") {
        template.replace("{id}", &random_uuid(rng).to_string())
    } else {
        template.to_string()
    };
    format!("{}: {}", service, body)
}
