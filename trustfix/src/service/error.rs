//! Service error types.

use thiserror::Error;

use crate::config::ConfigError;
use crate::platform::SourceError;

/// Errors that can occur constructing or operating the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The acquisition configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The location source failed outside a session trigger.
    #[error("location source failure: {0}")]
    Source(#[from] SourceError),
}
