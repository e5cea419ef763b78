//! Deployment error types
//!
//! These cover setup only (configuration loading, client construction).
//! Per-document deployment failures are never errors; they are reported
//! as data in the deploy report.

use thiserror::Error;

/// Deployment setup error
#[derive(Error, Debug)]
pub enum DeployError {
    /// I/O error reading the deploy configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error in the deploy configuration
    #[error("Failed to parse deploy config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client construction failed
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

/// Result type for deployment setup
pub type Result<T> = std::result::Result<T, DeployError>;
