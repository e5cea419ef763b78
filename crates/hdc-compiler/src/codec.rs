//! Content type codec
//!
//! Each supported content type maps to exactly one escaping mode and
//! token-exception policy. The mapping is fixed; callers cannot pick an
//! escape mode independently of the content type.

use crate::error::{CompileError, Result};
use hdc_core::documents::EscapeMode;
use hdc_core::ContentType;

/// Serialization rules for one content type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    pub content_type: ContentType,
    pub escape_mode: EscapeMode,
    pub throw_on_missing_token: bool,
}

pub struct ContentCodec;

impl ContentCodec {
    /// Resolve the codec for an optionally supplied content type string.
    ///
    /// An absent value defaults to `application/json`; an explicit unknown
    /// value is an error, never a silent default.
    pub fn resolve(content_type: Option<&str>) -> Result<Codec> {
        let content_type = match content_type {
            None => ContentType::default(),
            Some(value) => ContentType::from_mime(value)
                .map_err(|_| CompileError::UnsupportedContentType(value.trim().to_string()))?,
        };
        Ok(Self::for_type(content_type))
    }

    /// The fixed codec for a known content type
    pub fn for_type(content_type: ContentType) -> Codec {
        let (escape_mode, throw_on_missing_token) = match content_type {
            ContentType::Json | ContentType::FhirJson => (EscapeMode::Json, false),
            ContentType::FormUrlEncoded => (EscapeMode::None, true),
            ContentType::Xml => (EscapeMode::Xml, false),
        };
        Codec {
            content_type,
            escape_mode,
            throw_on_missing_token,
        }
    }
}
