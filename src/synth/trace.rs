//! Trace synthesis engine.
//!
//! Builds one root transaction for an entry service plus one child span per
//! direct dependency. Construction guarantees:
//!
//! - every span shares the transaction's trace id and has it as parent
//! - span offsets start at [`FIRST_SPAN_OFFSET_MS`] and strictly increase
//! - the transaction outlasts the last span's end, so it also outlasts the sum
//!   of child durations
//! - a span can only fail when the transaction failed, and then only with
//!   probability [`SPAN_ERROR_PROPAGATION`]

use std::ops::RangeInclusive;

use chrono::{DateTime, TimeDelta, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::catalog::{IndustryProfile, Perturbation};
use crate::synth::operations::{pick_operation, Operation};
use crate::synth::timing::{classify, sample_duration_ms, ServiceKind};

/// Name fragments that mark a front-door service.
pub const FRONT_DOOR_MARKERS: &[&str] = &["frontend", "app", "portal", "gateway", "client"];

/// Offset of the first child span from the transaction start.
pub const FIRST_SPAN_OFFSET_MS: u64 = 5;

/// Conditional probability that a child fails given a failed transaction.
pub const SPAN_ERROR_PROPAGATION: f64 = 0.3;

const TRANSACTION_BASE_MS: RangeInclusive<u64> = 100..=800;
const INTER_SPAN_GAP_MS: RangeInclusive<u64> = 1..=5;
const TRAILING_GAP_MS: RangeInclusive<u64> = 10..=50;

/// Root unit of work of a trace.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Uuid,
    pub trace_id: Uuid,
    pub service: String,
    pub operation: Operation,
    pub timestamp: DateTime<Utc>,
    pub duration_us: u64,
    pub is_error: bool,
    /// Number of direct child spans.
    pub span_count: usize,
}

/// Work done by one dependency on behalf of the transaction.
#[derive(Debug, Clone)]
pub struct Span {
    pub id: Uuid,
    pub trace_id: Uuid,
    pub parent_id: Uuid,
    pub service: String,
    pub kind: ServiceKind,
    /// Start, relative to the transaction start.
    pub offset_ms: u64,
    pub duration_us: u64,
    pub is_error: bool,
}

impl Span {
    /// End of the span relative to the transaction start.
    pub fn end_us(&self) -> u64 {
        self.offset_ms * 1000 + self.duration_us
    }

    /// Absolute start given the owning transaction's start.
    pub fn timestamp(&self, transaction_start: DateTime<Utc>) -> DateTime<Utc> {
        transaction_start + TimeDelta::milliseconds(self.offset_ms as i64)
    }
}

/// A transaction and its direct children, spans in offset order.
#[derive(Debug, Clone)]
pub struct Trace {
    pub transaction: Transaction,
    pub spans: Vec<Span>,
}

impl Trace {
    pub fn children_duration_us(&self) -> u64 {
        self.spans.iter().map(|s| s.duration_us).sum()
    }
}

/// Synthesizes traces for one industry under one perturbation.
#[derive(Debug, Clone, Copy)]
pub struct TraceSynthesizer<'a> {
    topology: &'a IndustryProfile,
    perturbation: &'a Perturbation,
}

impl<'a> TraceSynthesizer<'a> {
    pub fn new(topology: &'a IndustryProfile, perturbation: &'a Perturbation) -> Self {
        Self {
            topology,
            perturbation,
        }
    }

    /// Pick a front-door service uniformly, falling back to the first declared one.
    pub fn pick_entry<R: Rng + ?Sized>(&self, rng: &mut R) -> &'a str {
        let candidates: Vec<&'static str> = self
            .topology
            .services
            .iter()
            .copied()
            .filter(|s| is_front_door(s))
            .collect();

        candidates
            .choose(rng)
            .copied()
            .or_else(|| self.topology.services.first().copied())
            .unwrap_or(self.topology.key)
    }

    /// Synthesize a trace rooted at a randomly chosen entry service.
    pub fn synthesize<R: Rng + ?Sized>(&self, start: DateTime<Utc>, rng: &mut R) -> Trace {
        let entry = self.pick_entry(rng);
        self.synthesize_from(entry, start, rng)
    }

    /// Synthesize a trace rooted at `entry`.
    pub fn synthesize_from<R: Rng + ?Sized>(
        &self,
        entry: &str,
        start: DateTime<Utc>,
        rng: &mut R,
    ) -> Trace {
        let trace_id = random_uuid(rng);
        let transaction_id = random_uuid(rng);
        let operation = pick_operation(entry, rng);

        let base_ms = rng.gen_range(TRANSACTION_BASE_MS);
        let base_us = (base_ms as f64 * self.perturbation.multiplier_for(entry) * 1000.0) as u64;

        // Lay out children back to back, each after a small gap.
        let mut planned = Vec::new();
        let mut offset_ms = FIRST_SPAN_OFFSET_MS;
        let mut envelope_end_ms = 0;
        for &dependency in self.topology.dependencies_of(entry) {
            let kind = classify(dependency);
            let multiplier = self.perturbation.multiplier_for(dependency);
            let duration_ms = sample_duration_ms(kind.category, multiplier, rng);

            planned.push((dependency, kind, offset_ms, duration_ms));
            envelope_end_ms = offset_ms + duration_ms;
            offset_ms = envelope_end_ms + rng.gen_range(INTER_SPAN_GAP_MS);
        }

        let duration_us = if planned.is_empty() {
            base_us
        } else {
            let envelope_us = (envelope_end_ms + rng.gen_range(TRAILING_GAP_MS)) * 1000;
            base_us.max(envelope_us)
        };

        let is_error = rng.gen::<f64>() < self.perturbation.error_rate;

        let spans = planned
            .into_iter()
            .map(|(service, kind, offset_ms, duration_ms)| Span {
                id: random_uuid(rng),
                trace_id,
                parent_id: transaction_id,
                service: service.to_string(),
                kind,
                offset_ms,
                duration_us: duration_ms * 1000,
                is_error: is_error && rng.gen::<f64>() < SPAN_ERROR_PROPAGATION,
            })
            .collect::<Vec<_>>();

        Trace {
            transaction: Transaction {
                id: transaction_id,
                trace_id,
                service: entry.to_string(),
                operation,
                timestamp: start,
                duration_us,
                is_error,
                span_count: spans.len(),
            },
            spans,
        }
    }
}

/// Whether a service name looks like a front door (frontend, gateway, client app).
pub fn is_front_door(service: &str) -> bool {
    let name = service.to_ascii_lowercase();
    FRONT_DOOR_MARKERS.iter().any(|m| name.contains(m))
}

/// Version 4 UUID drawn from `rng`, so seeded runs are reproducible.
pub(crate) fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}
