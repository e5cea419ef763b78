//! Endpoint path template parser
//!
//! Splits a template like `/patients/{patientid}/referralauths?status={status}`
//! into the standalone base path, the ordered typed path segments after it,
//! and the dynamic query parameters.

use crate::error::{CompileError, Result};
use hdc_core::documents::{PathSegment, QueryParameter};

/// Result of parsing an endpoint path template
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPath {
    /// The first path segment, with no leading slash
    pub api_path: String,
    /// Every remaining segment, literal or dynamic, in positional order
    pub path_parameters: Vec<PathSegment>,
    /// Dynamic query parameters from the `?key={value}` suffix
    pub query_parameters: Vec<QueryParameter>,
}

/// One classified path token
enum Token {
    Literal(String),
    Value(String),
}

pub struct PathParser;

impl PathParser {
    /// Parse an endpoint path template
    ///
    /// A dynamic segment whose name repeats the preceding literal segment
    /// stays two distinct entries; the parser never merges a literal word
    /// with a same-named placeholder.
    pub fn parse(template: &str) -> Result<ParsedPath> {
        let template = template.trim();
        if template.is_empty() {
            return Err(CompileError::parse(template, "empty path template"));
        }

        let (path_part, query_part) = match template.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (template, None),
        };

        let path_part = path_part.strip_prefix('/').unwrap_or(path_part);
        if path_part.is_empty() {
            return Err(CompileError::parse(template, "path has no segments"));
        }

        let mut tokens = path_part.split('/');

        // First segment is the standalone apiPath; it must be a fixed word
        // because the generated documents cannot express a dynamic base.
        let first = tokens.next().unwrap_or_default();
        let api_path = match Self::classify(first)? {
            Token::Literal(value) => value,
            Token::Value(name) => {
                return Err(CompileError::parse(
                    format!("{{{name}}}"),
                    "path must begin with a literal base segment",
                ));
            }
        };

        let mut path_parameters = Vec::new();
        for token in tokens {
            match Self::classify(token)? {
                Token::Literal(value) => path_parameters.push(PathSegment::literal(value)),
                Token::Value(name) => path_parameters.push(PathSegment::value(name)),
            }
        }

        let mut query_parameters = Vec::new();
        if let Some(query) = query_part {
            for pair in query.split('&') {
                query_parameters.push(Self::parse_query_pair(pair)?);
            }
        }

        Ok(ParsedPath {
            api_path,
            path_parameters,
            query_parameters,
        })
    }

    /// Classify one path token as a fixed word or a `{name}` placeholder
    fn classify(token: &str) -> Result<Token> {
        if token.is_empty() {
            return Err(CompileError::parse(token, "empty path segment"));
        }

        if let Some(inner) = token.strip_prefix('{') {
            let name = inner
                .strip_suffix('}')
                .ok_or_else(|| CompileError::parse(token, "unbalanced braces in path segment"))?;
            if name.is_empty() {
                return Err(CompileError::parse(token, "empty placeholder name"));
            }
            if name.contains('{') || name.contains('}') {
                return Err(CompileError::parse(token, "nested braces in path segment"));
            }
            return Ok(Token::Value(name.to_string()));
        }

        if token.contains('{') || token.contains('}') {
            return Err(CompileError::parse(token, "unbalanced braces in path segment"));
        }

        Ok(Token::Literal(token.to_string()))
    }

    /// Parse one `key={value}` query pair. The emitted parameter's value
    /// always equals its key, whatever name sits inside the braces.
    fn parse_query_pair(pair: &str) -> Result<QueryParameter> {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| CompileError::parse(pair, "query parameter is not key={value}"))?;

        if key.is_empty() {
            return Err(CompileError::parse(pair, "empty query parameter name"));
        }

        let inner = value
            .strip_prefix('{')
            .and_then(|v| v.strip_suffix('}'))
            .ok_or_else(|| CompileError::parse(pair, "query parameter value must be {name}"))?;
        if inner.is_empty() {
            return Err(CompileError::parse(pair, "empty query placeholder name"));
        }

        Ok(QueryParameter::dynamic(key))
    }
}
