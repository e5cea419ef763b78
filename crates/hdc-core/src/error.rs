//! Error types for HDC Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown content type: {0}")]
    UnknownContentType(String),

    #[error("Unknown request method: {0}")]
    UnknownRequestMethod(String),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("Unknown application type: {0}")]
    UnknownAppType(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
