//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SynthConfig (validated, immutable)
//!     → cloned into the control session and each run
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::SynthConfig;
pub use schema::{
    GenerationConfig, IndexConfig, ListenerConfig, ObservabilityConfig, StoreConfig,
};
