//! Generation counters shared between a run and the stats query.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use serde::Serialize;
use tokio::time::Instant;

/// Monotonic success counters for one run.
#[derive(Debug)]
pub struct GenerationCounters {
    traces: AtomicU64,
    logs: AtomicU64,
    synthetics: AtomicU64,
    started_at: Instant,
    finished_at: OnceLock<Instant>,
}

/// Point-in-time view served by `GET /api/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct GenerationStats {
    pub traces: u64,
    pub logs: u64,
    pub synthetics: u64,
    pub elapsed_seconds: u64,
    pub traces_per_second: f64,
}

impl GenerationCounters {
    pub fn new() -> Self {
        Self {
            traces: AtomicU64::new(0),
            logs: AtomicU64::new(0),
            synthetics: AtomicU64::new(0),
            started_at: Instant::now(),
            finished_at: OnceLock::new(),
        }
    }

    pub fn record_trace(&self) {
        self.traces.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_log(&self) {
        self.logs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_synthetic(&self) {
        self.synthetics.fetch_add(1, Ordering::Relaxed);
    }

    /// Freeze the elapsed clock. Later calls are ignored.
    pub fn finish(&self) {
        let _ = self.finished_at.set(Instant::now());
    }

    pub fn snapshot(&self) -> GenerationStats {
        let end = self.finished_at.get().copied().unwrap_or_else(Instant::now);
        let elapsed = end.saturating_duration_since(self.started_at).as_secs_f64();
        let traces = self.traces.load(Ordering::Relaxed);

        let traces_per_second = if elapsed > 0.0 {
            (traces as f64 / elapsed * 100.0).round() / 100.0
        } else {
            0.0
        };

        GenerationStats {
            traces,
            logs: self.logs.load(Ordering::Relaxed),
            synthetics: self.synthetics.load(Ordering::Relaxed),
            elapsed_seconds: elapsed as u64,
            traces_per_second,
        }
    }
}

impl Default for GenerationCounters {
    fn default() -> Self {
        Self::new()
    }
}
