//! Session error types

use crate::facts::FactKind;
use hdc_compiler::CompileError;
use thiserror::Error;

/// Session error type
#[derive(Error, Debug)]
pub enum SessionError {
    /// Generation was requested before every required fact was collected
    #[error("Missing required fact: {0}")]
    MissingFact(FactKind),

    /// An operation that is not legal in the current state
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    /// Connection generation requested for a platform other than the two
    /// supported ones
    #[error(
        "Unsupported platform '{0}': connections can only be generated for Athena and Cerner. \
         Create the Connection and Application manually in your HDC configuration, then confirm \
         manual setup to continue with the workflow."
    )]
    UnsupportedPlatform(String),

    /// A generation attempt failed inside the compiler
    #[error("Generation failed: {0}")]
    Compile(#[from] CompileError),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
