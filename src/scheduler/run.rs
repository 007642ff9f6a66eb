//! The cancellable generation loop.

use std::time::Duration;

use serde::Serialize;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::GenerationConfig;
use crate::lifecycle::StopToken;
use crate::observability::metrics;
use crate::scheduler::BatchPlan;
use crate::synth::Generator;

/// Pacing and limits for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    pub plan: BatchPlan,
    pub duration: Duration,
    pub tick: Duration,
    pub max_consecutive_failures: u32,
    pub progress_every_batches: u64,
}

impl RunSettings {
    pub fn new(events_per_second: u32, duration: Duration, config: &GenerationConfig) -> Self {
        Self {
            plan: BatchPlan::for_rate(events_per_second),
            duration,
            tick: Duration::from_millis(config.tick_interval_ms),
            max_consecutive_failures: config.max_consecutive_failures,
            progress_every_batches: config.progress_every_batches,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Cancelled,
    DeadlineElapsed,
    TooManyFailures,
}

/// Summary returned when a run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Ticks whose whole batch was written.
    pub batches: u64,
    pub failed_ticks: u64,
    pub stop_reason: StopReason,
}

/// Consecutive-failure bookkeeping. A successful tick resets the streak.
#[derive(Debug, Clone, Copy)]
struct FailureStreak {
    current: u32,
    limit: u32,
}

impl FailureStreak {
    fn new(limit: u32) -> Self {
        Self { current: 0, limit }
    }

    fn succeeded(&mut self) {
        self.current = 0;
    }

    /// Record a failure; true once the streak exceeds the limit.
    fn failed(&mut self) -> bool {
        self.current = self.current.saturating_add(1);
        self.current > self.limit
    }
}

pub struct GenerationRun {
    generator: Generator,
    settings: RunSettings,
    stop: StopToken,
}

impl GenerationRun {
    pub fn new(generator: Generator, settings: RunSettings, stop: StopToken) -> Self {
        Self {
            generator,
            settings,
            stop,
        }
    }

    /// Generate one batch per tick until stopped, the deadline passes, or too many
    /// ticks in a row fail. A batch in flight is never interrupted.
    pub async fn run(mut self) -> RunReport {
        let settings = self.settings;
        let industry = self.generator.industry().key;
        // An unrepresentable deadline never elapses; only stop ends such a run.
        let deadline = Instant::now().checked_add(settings.duration);

        let mut ticker = time::interval(settings.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut batches = 0u64;
        let mut failed_ticks = 0u64;
        let mut streak = FailureStreak::new(settings.max_consecutive_failures);

        tracing::info!(
            industry,
            traces = settings.plan.traces,
            logs = settings.plan.logs,
            synthetics = settings.plan.synthetics,
            duration_secs = settings.duration.as_secs(),
            "Generation run started"
        );
        metrics::record_run_active(true);

        let stop_reason = loop {
            tokio::select! {
                biased;
                _ = self.stop.cancelled() => break StopReason::Cancelled,
                _ = sleep_until_deadline(deadline) => break StopReason::DeadlineElapsed,
                _ = ticker.tick() => {}
            }

            let started = std::time::Instant::now();
            match self.generator.generate_batch(&settings.plan).await {
                Ok(()) => {
                    metrics::record_batch(true, started);
                    streak.succeeded();
                    batches += 1;

                    if settings.progress_every_batches > 0 && batches % settings.progress_every_batches == 0 {
                        let stats = self.generator.counters().snapshot();
                        tracing::info!(
                            industry,
                            batches,
                            traces = stats.traces,
                            logs = stats.logs,
                            synthetics = stats.synthetics,
                            "Generation progress"
                        );
                    }
                }
                Err(e) => {
                    metrics::record_batch(false, started);
                    failed_ticks += 1;
                    tracing::warn!(industry, batch = batches + failed_ticks, error = %e, "Batch failed");

                    if streak.failed() {
                        tracing::error!(
                            industry,
                            consecutive = streak.current,
                            "Too many consecutive failed batches, stopping run"
                        );
                        break StopReason::TooManyFailures;
                    }
                }
            }
        };

        self.generator.counters().finish();
        metrics::record_run_active(false);

        let stats = self.generator.counters().snapshot();
        tracing::info!(
            industry,
            batches,
            failed_ticks,
            reason = ?stop_reason,
            traces = stats.traces,
            logs = stats.logs,
            synthetics = stats.synthetics,
            "Generation run finished"
        );

        RunReport {
            batches,
            failed_ticks,
            stop_reason,
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::catalog::{self, Perturbation};
    use crate::config::IndexConfig;
    use crate::scheduler::GenerationCounters;
    use crate::sink::MemorySink;

    fn run_with(sink: Arc<MemorySink>, secs: u64, stop: StopToken) -> (GenerationRun, Arc<GenerationCounters>) {
        let counters = Arc::new(GenerationCounters::new());
        let generator = Generator::new(
            catalog::industry("gaming").unwrap(),
            Perturbation::baseline(),
            sink,
            IndexConfig::default(),
            counters.clone(),
        )
        .with_seed(1);
        let settings = RunSettings::new(17, Duration::from_secs(secs), &GenerationConfig::default());
        (GenerationRun::new(generator, settings, stop), counters)
    }

    #[test]
    fn test_failure_streak_resets() {
        let mut streak = FailureStreak::new(2);
        assert!(!streak.failed());
        assert!(!streak.failed());
        streak.succeeded();
        assert!(!streak.failed());
        assert!(!streak.failed());
        assert!(streak.failed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_ends_run() {
        let sink = Arc::new(MemorySink::new(100_000));
        let (run, counters) = run_with(sink, 5, StopToken::new());
        let report = run.run().await;

        assert_eq!(report.stop_reason, StopReason::DeadlineElapsed);
        assert_eq!(report.batches, 5);
        assert_eq!(report.failed_ticks, 0);
        let stats = counters.snapshot();
        assert_eq!((stats.traces, stats.logs, stats.synthetics), (50, 25, 5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_duration_runs_until_stopped() {
        let sink = Arc::new(MemorySink::new(100_000));
        let stop = StopToken::new();
        let (run, _) = run_with(sink, u64::MAX, stop.clone());
        let handle = tokio::spawn(run.run());

        time::sleep(Duration::from_millis(1_500)).await;
        stop.cancel();
        let report = handle.await.unwrap();
        assert_eq!(report.stop_reason, StopReason::Cancelled);
        assert_eq!(report.batches, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_token_ends_run() {
        let sink = Arc::new(MemorySink::new(100_000));
        let stop = StopToken::new();
        let (run, _) = run_with(sink, 600, stop.clone());
        let handle = tokio::spawn(run.run());

        time::sleep(Duration::from_millis(2_500)).await;
        stop.cancel();
        let report = handle.await.unwrap();
        assert_eq!(report.stop_reason, StopReason::Cancelled);
        assert_eq!(report.batches, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_start() {
        let stop = StopToken::new();
        stop.cancel();
        let sink = Arc::new(MemorySink::new(100));
        let (run, _) = run_with(sink.clone(), 600, stop);
        let report = run.run().await;
        assert_eq!(report.stop_reason, StopReason::Cancelled);
        assert_eq!(report.batches, 0);
        assert!(sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_failures_abort_run() {
        let sink = Arc::new(MemorySink::new(100));
        sink.reject_all(true);
        let (run, counters) = run_with(sink, 600, StopToken::new());
        let report = run.run().await;

        assert_eq!(report.stop_reason, StopReason::TooManyFailures);
        assert_eq!(report.failed_ticks, 11);
        assert_eq!(report.batches, 0);
        assert_eq!(counters.snapshot().traces, 0);
    }
}
