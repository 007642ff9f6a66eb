//! Industry and scenario catalogs.
//!
//! # Data Flow
//! ```text
//! topology.rs (static service graphs)   scenario.rs (static incident profiles)
//!           \                               /
//!            → lookups below (pure, read-only)
//!            → Perturbation handed to a generation run
//! ```
//!
//! # Design Decisions
//! - Unknown industry is an explicit not-found for every lookup
//! - Unknown scenario key degrades to the baseline perturbation

pub mod scenario;
pub mod topology;

use thiserror::Error;

pub use scenario::{Perturbation, Scenario, BASELINE_ERROR_RATE, BASELINE_LATENCY_MULTIPLIER};
pub use topology::IndustryProfile;

/// Errors from catalog lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown industry '{0}'")]
    UnknownIndustry(String),
}

/// All industries in display order.
pub fn industries() -> &'static [IndustryProfile] {
    topology::INDUSTRIES
}

/// Topology for one industry.
pub fn industry(key: &str) -> Option<&'static IndustryProfile> {
    topology::INDUSTRIES.iter().find(|p| p.key == key)
}

/// Scenarios offered for an industry, `None` when the industry is unknown.
pub fn scenarios_for(industry: &str) -> Option<&'static [Scenario]> {
    scenario::SCENARIOS
        .iter()
        .find(|(key, _)| *key == industry)
        .map(|(_, scenarios)| *scenarios)
}

/// A single scenario by key.
pub fn scenario(industry: &str, key: &str) -> Option<&'static Scenario> {
    scenarios_for(industry)?.iter().find(|s| s.key == key)
}

/// Resolve the perturbation a run should use.
///
/// Unknown industries are an error. A missing or unknown scenario key yields the
/// baseline.
pub fn resolve_perturbation(
    industry_key: &str,
    scenario_key: Option<&str>,
) -> Result<Perturbation, CatalogError> {
    if industry(industry_key).is_none() {
        return Err(CatalogError::UnknownIndustry(industry_key.to_string()));
    }

    let resolved = scenario_key.and_then(|key| scenario(industry_key, key));
    match (scenario_key, resolved) {
        (_, Some(s)) => Ok(Perturbation::from(s)),
        (Some(key), None) => {
            tracing::warn!(industry = industry_key, scenario = key, "Unknown scenario, using baseline");
            Ok(Perturbation::baseline())
        }
        (None, None) => Ok(Perturbation::baseline()),
    }
}
