//! Synthetic observability telemetry generator.
//!
//! Produces distributed traces, application logs and synthetic uptime checks
//! for a catalog of industries, optionally perturbed by incident scenarios, and
//! writes them to an Elasticsearch-compatible store.

pub mod catalog;
pub mod config;
pub mod control;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod scheduler;
pub mod sink;
pub mod synth;

pub use config::schema::SynthConfig;
pub use control::ControlSession;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
