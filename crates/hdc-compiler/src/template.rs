//! Request body template builder
//!
//! Renders the `templateBody` string for each content type. The body is
//! the *source text* of the document (a single-line JSON literal, a
//! `key=value&...` form string, or single-line XML), with `%name%`
//! placeholders for token fields. Fields are emitted in sorted name
//! order so regeneration is deterministic.

use crate::codec::Codec;
use crate::error::{CompileError, Result};
use hdc_core::documents::Template;
use hdc_core::ContentType;
use serde_json::Value;

/// How one body field renders
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A runtime token, rendered as `"%name%"` (quoted in JSON bodies)
    Token,
    /// A reference-style token, rendered bare as `%name%` even in JSON
    RawToken,
    /// A fixed literal value
    Literal(String),
}

/// Ordered body fields for template rendering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateFields {
    fields: Vec<(String, FieldValue)>,
}

impl TemplateFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token field
    pub fn token(mut self, name: impl Into<String>) -> Self {
        self.fields.push((name.into(), FieldValue::Token));
        self
    }

    /// Add a literal field
    pub fn literal(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), FieldValue::Literal(value.into())));
        self
    }

    /// Add a reference-style token field
    pub fn raw_token(mut self, name: impl Into<String>) -> Self {
        self.fields.push((name.into(), FieldValue::RawToken));
        self
    }

    /// Derive an all-token field list from a JSON body sample. Nested
    /// objects contribute their leaf keys.
    pub fn from_sample(sample: &Value) -> Result<Self> {
        let object = sample
            .as_object()
            .ok_or_else(|| CompileError::InvalidSample("body sample must be a JSON object".to_string()))?;
        if object.is_empty() {
            return Err(CompileError::InvalidSample("body sample has no fields".to_string()));
        }

        let mut fields = Self::new();
        Self::collect_leaf_keys(object, &mut fields);
        Ok(fields)
    }

    fn collect_leaf_keys(object: &serde_json::Map<String, Value>, fields: &mut Self) {
        for (key, value) in object {
            match value {
                Value::Object(nested) => Self::collect_leaf_keys(nested, fields),
                _ => fields.fields.push((key.clone(), FieldValue::Token)),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in sorted name order, the order they are rendered in
    fn sorted(&self) -> Vec<&(String, FieldValue)> {
        let mut fields: Vec<&(String, FieldValue)> = self.fields.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        fields
    }
}

pub struct TemplateBuilder;

impl TemplateBuilder {
    /// Render a template document for the given codec and fields
    pub fn build(template_id: &str, codec: &Codec, fields: &TemplateFields) -> Template {
        let body = match codec.content_type {
            ContentType::FormUrlEncoded => Self::form_body(fields),
            ContentType::Json | ContentType::FhirJson => Self::json_body(fields),
            ContentType::Xml => Self::xml_body(fields),
        };
        Template::new(template_id, body, codec.escape_mode, codec.throw_on_missing_token)
    }

    fn form_body(fields: &TemplateFields) -> String {
        fields
            .sorted()
            .iter()
            .map(|(name, value)| match value {
                FieldValue::Token | FieldValue::RawToken => format!("{name}=%{name}%"),
                FieldValue::Literal(literal) => format!("{name}={literal}"),
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    fn json_body(fields: &TemplateFields) -> String {
        let entries = fields
            .sorted()
            .iter()
            .map(|(name, value)| {
                let rendered = match value {
                    FieldValue::Token => format!("\"%{name}%\""),
                    FieldValue::RawToken => format!("%{name}%"),
                    // Literal strings go through serde so quoting and
                    // escaping stay correct JSON
                    FieldValue::Literal(literal) => Value::String(literal.clone()).to_string(),
                };
                format!("\"{name}\": {rendered}")
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{{entries}}}")
    }

    fn xml_body(fields: &TemplateFields) -> String {
        let elements = fields
            .sorted()
            .iter()
            .map(|(name, value)| match value {
                FieldValue::Token | FieldValue::RawToken => format!("<{name}>%{name}%</{name}>"),
                FieldValue::Literal(literal) => format!("<{name}>{literal}</{name}>"),
            })
            .collect::<String>();
        format!("<Root>{elements}</Root>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ContentCodec;
    use hdc_core::documents::EscapeMode;
    use serde_json::json;

    #[test]
    fn test_form_body_sorted_with_literal() {
        let codec = ContentCodec::resolve(Some("application/x-www-form-urlencoded")).unwrap();
        let fields = TemplateFields::new()
            .token("firstname")
            .literal("departmentid", "180");

        let template = TemplateBuilder::build("Demo-Tem", &codec, &fields);
        assert_eq!(template.template_body, "departmentid=180&firstname=%firstname%");
        assert_eq!(template.escape_tokens, EscapeMode::None);
        assert!(template.throw_token_exception);
        assert_eq!(template.default_token_value, "");
    }

    #[test]
    fn test_json_body_single_line() {
        let codec = ContentCodec::resolve(None).unwrap();
        let fields = TemplateFields::new().token("lastname").token("firstname");

        let template = TemplateBuilder::build("Demo-Tem", &codec, &fields);
        assert_eq!(
            template.template_body,
            "{\"firstname\": \"%firstname%\", \"lastname\": \"%lastname%\"}"
        );
        assert_eq!(template.escape_tokens, EscapeMode::Json);
        assert!(!template.throw_token_exception);
        assert!(!template.template_body.contains('\n'));
    }

    #[test]
    fn test_json_raw_token_is_unquoted() {
        let codec = ContentCodec::resolve(None).unwrap();
        let fields = TemplateFields::new().raw_token("payload");

        let template = TemplateBuilder::build("Demo-Tem", &codec, &fields);
        assert_eq!(template.template_body, "{\"payload\": %payload%}");
    }

    #[test]
    fn test_xml_body() {
        let codec = ContentCodec::resolve(Some("application/xml")).unwrap();
        let fields = TemplateFields::new().token("field2").token("field1");

        let template = TemplateBuilder::build("Demo-Tem", &codec, &fields);
        assert_eq!(
            template.template_body,
            "<Root><field1>%field1%</field1><field2>%field2%</field2></Root>"
        );
        assert_eq!(template.escape_tokens, EscapeMode::Xml);
    }

    #[test]
    fn test_fhir_json_body() {
        let codec = ContentCodec::resolve(Some("application/fhir+json")).unwrap();
        let fields = TemplateFields::new().token("resourceType");

        let template = TemplateBuilder::build("Demo-Tem", &codec, &fields);
        assert_eq!(template.template_body, "{\"resourceType\": \"%resourceType%\"}");
        assert_eq!(template.escape_tokens, EscapeMode::Json);
    }

    #[test]
    fn test_fields_from_sample() {
        let sample = json!({
            "firstname": "John",
            "address": {"city": "Boston", "zipcode": "02101"}
        });
        let fields = TemplateFields::from_sample(&sample).unwrap();
        let codec = ContentCodec::resolve(None).unwrap();

        let template = TemplateBuilder::build("Demo-Tem", &codec, &fields);
        assert_eq!(
            template.template_body,
            "{\"city\": \"%city%\", \"firstname\": \"%firstname%\", \"zipcode\": \"%zipcode%\"}"
        );
    }

    #[test]
    fn test_from_sample_rejects_non_object() {
        assert!(TemplateFields::from_sample(&json!([1, 2])).is_err());
        assert!(TemplateFields::from_sample(&json!({})).is_err());
    }
}
