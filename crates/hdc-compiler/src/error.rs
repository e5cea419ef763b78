//! Compiler error types

use thiserror::Error;

/// Compiler error
#[derive(Error, Debug)]
pub enum CompileError {
    /// Malformed path or template input; carries the offending substring
    #[error("Parse error at '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// Explicitly supplied content type that is not supported; never
    /// silently defaulted
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// Caller-supplied format type rejected; generated transforms always
    /// use FirstItem
    #[error("Invalid format type: {0}")]
    InvalidFormatType(String),

    /// A target field with no structural match in the source sample
    #[error("No source match for target field '{field}'")]
    NoSourceMatch { field: String },

    /// A desired output field that resolves to no HL7 field-path entry
    #[error("Unknown HL7 output field: {0}")]
    UnknownHl7Field(String),

    /// A sample document with the wrong shape
    #[error("Invalid sample: {0}")]
    InvalidSample(String),

    /// A required generation input that was not supplied
    #[error("Missing input for generation: {0}")]
    MissingInput(&'static str),

    /// A workflow step chain that violates the chaining contract
    #[error("Step chain violation: {0}")]
    ChainViolation(String),
}

impl CompileError {
    pub(crate) fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        CompileError::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;
