//! Control plane.
//!
//! # Data Flow
//! ```text
//! HTTP handler / CLI request
//!     → session.rs (validate, touch store handle or active run)
//!         connect  → sink::ElasticsearchSink | sink::MemorySink → ArcSwapOption
//!         start    → scheduler::GenerationRun on a spawned task
//!         stop     → StopToken::cancel
//!         stats    → GenerationCounters::snapshot
//!     → types.rs (JSON bodies)
//!     → error.rs (mapped to HTTP status by the http layer)
//! ```
//!
//! # Design Decisions
//! - No globals: one `ControlSession` is shared through axum state
//! - The store handle is swapped atomically; a running batch keeps the sink it started with
//! - At most one run at a time

pub mod error;
pub mod session;
pub mod types;

pub use error::ControlError;
pub use session::{ControlSession, StoreHandle};
pub use types::*;
