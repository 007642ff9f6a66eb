//! Emits synthesized telemetry for one industry into a sink.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::catalog::{IndustryProfile, Perturbation};
use crate::config::IndexConfig;
use crate::observability::metrics::{self, DocumentKind};
use crate::scheduler::{BatchPlan, GenerationCounters};
use crate::sink::{write_with_fallback, DocumentSink, IndexTarget, SinkError};
use crate::synth::clock::{Clock, SystemClock};
use crate::synth::document::{span_document, transaction_document, DocumentLabels};
use crate::synth::logs::generate_log;
use crate::synth::synthetics::generate_check;
use crate::synth::trace::{Trace, TraceSynthesizer};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("transaction write failed: {0}")]
    Transaction(#[source] SinkError),

    #[error("span write failed: {0}")]
    Span(#[source] SinkError),

    #[error("log write failed: {0}")]
    Log(#[source] SinkError),

    #[error("synthetic check write failed: {0}")]
    Synthetic(#[source] SinkError),
}

/// One industry, one perturbation, one sink.
pub struct Generator {
    industry: &'static IndustryProfile,
    perturbation: Perturbation,
    labels: DocumentLabels,
    sink: Arc<dyn DocumentSink>,
    indices: IndexConfig,
    logs_index: String,
    synthetics_index: String,
    counters: Arc<GenerationCounters>,
    clock: Arc<dyn Clock>,
    rng: StdRng,
}

impl Generator {
    pub fn new(
        industry: &'static IndustryProfile,
        perturbation: Perturbation,
        sink: Arc<dyn DocumentSink>,
        indices: IndexConfig,
        counters: Arc<GenerationCounters>,
    ) -> Self {
        let labels = DocumentLabels {
            industry: industry.key.to_string(),
            scenario: perturbation.scenario.clone(),
        };

        Self {
            industry,
            labels,
            perturbation,
            sink,
            logs_index: indices.logs_index(industry.key),
            synthetics_index: indices.synthetics_index(industry.key),
            indices,
            counters,
            clock: Arc::new(SystemClock),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Reproducible output for a given seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn counters(&self) -> &Arc<GenerationCounters> {
        &self.counters
    }

    pub fn industry(&self) -> &'static IndustryProfile {
        self.industry
    }

    /// Synthesize a trace without emitting it.
    pub fn next_trace(&mut self) -> Trace {
        let start = self.clock.now();
        TraceSynthesizer::new(self.industry, &self.perturbation).synthesize(start, &mut self.rng)
    }

    /// Emit one trace: the transaction first, then spans in offset order.
    ///
    /// Stops at the first document that neither index accepts. The trace counter
    /// moves only when every document was stored.
    pub async fn emit_trace(&mut self) -> Result<(), GenerateError> {
        let trace = self.next_trace();
        let tx = &trace.transaction;

        let doc = transaction_document(tx, &self.labels, &mut self.rng);
        let target = IndexTarget::new(&self.indices.traces, &self.indices.transaction_fallback);
        let outcome = write_with_fallback(self.sink.as_ref(), target, &doc).await;
        metrics::record_document(DocumentKind::Transaction, outcome.is_written());
        outcome.into_result().map_err(GenerateError::Transaction)?;

        for span in &trace.spans {
            let doc = span_document(span, tx.timestamp, &self.labels, &mut self.rng);
            let target = IndexTarget::new(&self.indices.traces, &self.indices.span_fallback);
            let outcome = write_with_fallback(self.sink.as_ref(), target, &doc).await;
            metrics::record_document(DocumentKind::Span, outcome.is_written());
            outcome.into_result().map_err(GenerateError::Span)?;
        }

        self.counters.record_trace();
        Ok(())
    }

    pub async fn emit_log(&mut self) -> Result<(), GenerateError> {
        let event = generate_log(self.industry, &self.perturbation, self.clock.now(), &mut self.rng);
        let doc = event.to_document(&self.labels);

        let result = self.sink.write(&self.logs_index, &doc).await;
        metrics::record_document(DocumentKind::Log, result.is_ok());
        result.map_err(GenerateError::Log)?;

        self.counters.record_log();
        Ok(())
    }

    pub async fn emit_synthetic(&mut self) -> Result<(), GenerateError> {
        let check = generate_check(self.industry, &self.perturbation, self.clock.now(), &mut self.rng);
        let doc = check.to_document(&self.labels);

        let result = self.sink.write(&self.synthetics_index, &doc).await;
        metrics::record_document(DocumentKind::Synthetic, result.is_ok());
        result.map_err(GenerateError::Synthetic)?;

        self.counters.record_synthetic();
        Ok(())
    }

    /// Emit one tick's worth: traces, then logs, then checks. Fails at the first error.
    pub async fn generate_batch(&mut self, plan: &BatchPlan) -> Result<(), GenerateError> {
        for _ in 0..plan.traces {
            self.emit_trace().await?;
        }
        for _ in 0..plan.logs {
            self.emit_log().await?;
        }
        for _ in 0..plan.synthetics {
            self.emit_synthetic().await?;
        }
        Ok(())
    }
}
