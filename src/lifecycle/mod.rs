//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → HTTP server stops accepting → active run is stopped → exit
//!
//! Runs (cancel.rs):
//!     POST /api/stop or shutdown → StopToken::cancel → run loop exits at its next tick
//! ```
//!
//! # Design Decisions
//! - A run never observes the server's broadcast directly; it gets its own token
//! - Cancelling is idempotent and never blocks

pub mod cancel;
pub mod shutdown;
pub mod signals;

pub use cancel::StopToken;
pub use shutdown::Shutdown;
