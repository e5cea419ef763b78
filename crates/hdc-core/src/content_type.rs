//! Supported request content types
//!
//! Each content type maps to exactly one escaping/token policy; that
//! mapping lives in the compiler's `ContentCodec`. This module only
//! knows the wire names.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content type of a request body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "application/json")]
    Json,
    #[serde(rename = "application/x-www-form-urlencoded")]
    FormUrlEncoded,
    #[serde(rename = "application/xml")]
    Xml,
    #[serde(rename = "application/fhir+json")]
    FhirJson,
}

impl ContentType {
    /// The MIME string used on the wire
    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::FormUrlEncoded => "application/x-www-form-urlencoded",
            ContentType::Xml => "application/xml",
            ContentType::FhirJson => "application/fhir+json",
        }
    }

    /// Parse an explicit MIME string. Unknown values are an error,
    /// never silently defaulted.
    pub fn from_mime(mime: &str) -> Result<Self, CoreError> {
        match mime.trim() {
            "application/json" => Ok(ContentType::Json),
            "application/x-www-form-urlencoded" => Ok(ContentType::FormUrlEncoded),
            "application/xml" => Ok(ContentType::Xml),
            "application/fhir+json" => Ok(ContentType::FhirJson),
            other => Err(CoreError::UnknownContentType(other.to_string())),
        }
    }
}

impl Default for ContentType {
    fn default() -> Self {
        ContentType::Json
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}
