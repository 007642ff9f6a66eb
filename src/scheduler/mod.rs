//! Batch scheduling.
//!
//! # Data Flow
//! ```text
//! POST /api/generate
//!     → batch.rs (events/s → traces/logs/checks per tick)
//!     → run.rs (tick loop on a spawned task, watches the StopToken)
//!         → Generator::generate_batch
//!         → counters.rs (read concurrently by GET /api/stats)
//! ```
//!
//! # Design Decisions
//! - One run at a time, sequential inside the run
//! - The stop token is checked once per tick; a batch is never cut short
//! - Counters outlive the run so a finished run's numbers stay visible

pub mod batch;
pub mod counters;
pub mod run;

pub use batch::BatchPlan;
pub use counters::{GenerationCounters, GenerationStats};
pub use run::{GenerationRun, RunReport, RunSettings, StopReason};
