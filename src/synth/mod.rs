//! Telemetry synthesis.
//!
//! # Data Flow
//! ```text
//! catalog (topology + perturbation)
//!     → timing.rs (category-based span durations)
//!     → trace.rs (transaction + direct child spans, invariants enforced here)
//!     → document.rs (APM JSON documents)
//!     → logs.rs / synthetics.rs (log lines and uptime checks)
//!     → generator.rs (writes everything to a sink, counts successes)
//! ```
//!
//! # Design Decisions
//! - Everything random takes an explicit `Rng`, so seeded runs reproduce exactly
//! - Timestamps come from a [`Clock`] so documents can be pinned in tests
//! - Synthesis is pure; only the generator performs I/O

pub mod clock;
pub mod document;
pub mod generator;
pub mod logs;
pub mod operations;
pub mod synthetics;
pub mod timing;
pub mod trace;

pub use clock::{Clock, FixedClock, SystemClock};
pub use generator::{GenerateError, Generator};
pub use timing::{classify, Category, ServiceKind};
pub use trace::{Span, Trace, TraceSynthesizer, Transaction};
