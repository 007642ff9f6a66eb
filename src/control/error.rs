//! Control-plane errors.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::sink::SinkError;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("Not connected to Elasticsearch")]
    NotConnected,

    #[error("A cloud id or endpoint and an API key are required")]
    MissingCredentials,

    #[error("Industry parameter required")]
    MissingIndustry,

    #[error("Invalid industry: {0}")]
    UnknownIndustry(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("A generation run is already active")]
    AlreadyRunning,

    #[error("Connection failed: {0}")]
    ConnectionFailed(#[source] SinkError),
}

impl From<CatalogError> for ControlError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::UnknownIndustry(key) => ControlError::UnknownIndustry(key),
        }
    }
}

impl From<SinkError> for ControlError {
    fn from(e: SinkError) -> Self {
        match e {
            SinkError::MissingCredentials => ControlError::MissingCredentials,
            SinkError::InvalidCloudId(_) | SinkError::InvalidEndpoint { .. } => {
                ControlError::InvalidRequest(e.to_string())
            }
            other => ControlError::ConnectionFailed(other),
        }
    }
}
