//! Request and response bodies of the control API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConnectRequest {
    #[serde(default)]
    pub cloud_id: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Keep documents in memory instead of talking to a store.
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConnectResponse {
    pub success: bool,
    pub cluster_name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IndustrySummary {
    pub name: String,
    pub icon: String,
    pub service_count: usize,
    pub has_dependencies: bool,
}

pub type IndustryListing = BTreeMap<String, IndustrySummary>;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub description: String,
    pub story: String,
    pub error_rate: f64,
    pub latency_multiplier: f64,
}

pub type ScenarioListing = BTreeMap<String, ScenarioSummary>;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScenarioQuery {
    pub industry: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub scenario: Option<String>,
    /// Minutes.
    #[serde(default)]
    pub duration: Option<u64>,
    /// Events per second.
    #[serde(default)]
    pub rate: Option<u32>,
    #[serde(default)]
    pub use_llm: bool,
    #[serde(default)]
    pub llm_provider: Option<String>,
    #[serde(default)]
    pub llm_api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StopResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub es_connected: bool,
    pub generating: bool,
}
