//! API configuration document
//!
//! `apiPath` holds only the first path segment; every remaining segment,
//! literal or dynamic, lives in `pathParameters` in positional order.

use crate::content_type::ContentType;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// HTTP request method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    /// Parse a method name, case-insensitively
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(RequestMethod::Get),
            "POST" => Ok(RequestMethod::Post),
            "PUT" => Ok(RequestMethod::Put),
            "DELETE" => Ok(RequestMethod::Delete),
            other => Err(CoreError::UnknownRequestMethod(other.to_string())),
        }
    }

    /// Whether requests with this method carry a body (and therefore a
    /// body template)
    pub fn has_body(&self) -> bool {
        matches!(self, RequestMethod::Post | RequestMethod::Put)
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// Whether a path segment is a fixed word or a runtime value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Literal,
    Value,
}

/// One segment of the URL path after `apiPath`
///
/// A dynamic segment whose name repeats a preceding literal segment is
/// still two entries; the parser never merges them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub value: String,
    #[serde(rename = "valueType")]
    pub kind: SegmentKind,
}

impl PathSegment {
    /// A fixed path word
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: SegmentKind::Literal,
        }
    }

    /// A dynamic path value, filled in at runtime
    pub fn value(name: impl Into<String>) -> Self {
        Self {
            value: name.into(),
            kind: SegmentKind::Value,
        }
    }
}

/// A dynamic query parameter
///
/// `value` always equals `key` for dynamic parameters, never blank and
/// never a different literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameter {
    pub key: String,
    pub value: String,
    pub operator: String,
    pub optional: bool,
    pub value_type: SegmentKind,
}

impl QueryParameter {
    /// Build a dynamic query parameter from its URL key
    pub fn dynamic(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            value: key.clone(),
            key,
            operator: String::new(),
            optional: false,
            value_type: SegmentKind::Value,
        }
    }
}

/// API configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub api_id: String,
    pub name: String,
    pub header_parameters: BTreeMap<String, String>,
    pub data_format: String,
    pub api_path: String,
    pub request_method: RequestMethod,
    pub query_parameters: Vec<QueryParameter>,
    pub body_template_id: String,
    pub content_type: ContentType,
    pub accept_content_type: ContentType,
    pub page_json_path: String,
    pub custom_headers: Vec<serde_json::Value>,
    pub path_parameters: Vec<PathSegment>,
    pub should_url_encode_parameters: bool,
}

impl ApiConfig {
    /// Create an API configuration with the fixed defaults in place
    pub fn new(api_id: impl Into<String>, name: impl Into<String>, method: RequestMethod) -> Self {
        Self {
            api_id: api_id.into(),
            name: name.into(),
            header_parameters: BTreeMap::new(),
            data_format: "Json".to_string(),
            api_path: String::new(),
            request_method: method,
            query_parameters: Vec::new(),
            body_template_id: String::new(),
            content_type: ContentType::default(),
            accept_content_type: ContentType::default(),
            page_json_path: String::new(),
            custom_headers: Vec::new(),
            path_parameters: Vec::new(),
            should_url_encode_parameters: false,
        }
    }
}
