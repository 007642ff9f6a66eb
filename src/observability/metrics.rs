//! Metrics collection and exposition.
//!
//! # Metrics
//! - `synth_documents_total` (counter): documents by kind and outcome
//! - `synth_fallback_writes_total` (counter): writes that landed in a fallback index
//! - `synth_batches_total` (counter): ticks by outcome
//! - `synth_batch_duration_seconds` (histogram): time to emit one batch
//! - `synth_run_active` (gauge): 1 while a generation run is active

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus listener and install it as the global recorder.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Prometheus metrics exporter started");
    Ok(())
}

/// Document kinds as metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Transaction,
    Span,
    Log,
    Synthetic,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Transaction => "transaction",
            DocumentKind::Span => "span",
            DocumentKind::Log => "log",
            DocumentKind::Synthetic => "synthetic",
        }
    }
}

pub fn record_document(kind: DocumentKind, written: bool) {
    let outcome = if written { "written" } else { "failed" };
    counter!("synth_documents_total", "kind" => kind.as_str(), "outcome" => outcome).increment(1);
}

pub fn record_fallback_write(index: &str) {
    counter!("synth_fallback_writes_total", "index" => index.to_string()).increment(1);
}

pub fn record_batch(success: bool, started: Instant) {
    let outcome = if success { "ok" } else { "failed" };
    counter!("synth_batches_total", "outcome" => outcome).increment(1);
    histogram!("synth_batch_duration_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_run_active(active: bool) {
    gauge!("synth_run_active").set(if active { 1.0 } else { 0.0 });
}
