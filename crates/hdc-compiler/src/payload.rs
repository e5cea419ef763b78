//! Runtime test payload derivation
//!
//! After generation, every dynamic input the workflow expects at runtime
//! is enumerated as a flat `paramName -> sampleValue` mapping: dynamic
//! path segments, dynamic query parameters, template tokens, and (for
//! transform-only workflows) the source fields the transform reads from
//! the runtime body. Sample values come from a deterministic
//! name-heuristic table.

use hdc_core::documents::{DataTransform, PropertyGroup, SegmentKind};
use hdc_core::{Document, DocumentKind, DocumentSet};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Flat sample payload for exercising a generated workflow
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PayloadParams {
    #[serde(rename = "payloadParams")]
    params: BTreeMap<String, String>,
}

impl PayloadParams {
    /// Derive the payload parameters from a generated document set
    pub fn derive(documents: &DocumentSet) -> Self {
        let mut params = BTreeMap::new();

        if let Some(Document::Api(api)) = documents.get(DocumentKind::Api) {
            for segment in &api.path_parameters {
                if segment.kind == SegmentKind::Value {
                    Self::add(&mut params, &segment.value);
                }
            }
            for query in &api.query_parameters {
                Self::add(&mut params, &query.key);
            }
        }

        if let Some(Document::Template(template)) = documents.get(DocumentKind::Template) {
            let token = Regex::new(r"%([A-Za-z0-9_]+)%").unwrap();
            for capture in token.captures_iter(&template.template_body) {
                Self::add(&mut params, &capture[1]);
            }
        }

        // Transform-only workflows read their input from the runtime
        // body; enumerate the fields the transform expects there
        if !documents.contains(DocumentKind::Api) {
            if let Some(Document::Transform(transform)) = documents.get(DocumentKind::Transform) {
                Self::add_transform_inputs(&mut params, transform);
            }
        }

        Self { params }
    }

    /// The flat parameter mapping
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    fn add(params: &mut BTreeMap<String, String>, name: &str) {
        params
            .entry(name.to_string())
            .or_insert_with(|| sample_value(name));
    }

    fn add_transform_inputs(params: &mut BTreeMap<String, String>, transform: &DataTransform) {
        fn walk(params: &mut BTreeMap<String, String>, group: &PropertyGroup) {
            for (output_field, property) in &group.properties {
                // HL7 paths end in numeric components; fall back to the
                // output field name there
                let name = leaf_key(&property.path).unwrap_or_else(|| output_field.clone());
                PayloadParams::add(params, &name);
            }
            for nested in &group.property_groups {
                walk(params, nested);
            }
        }

        for group in &transform.property_groups {
            walk(params, group);
        }
    }
}

/// The trailing named key of a JSONPath, if any. `$.patient.name` yields
/// `name`; `$.PID[0].8[0]` yields nothing.
fn leaf_key(path: &str) -> Option<String> {
    let last = path.rsplit('.').next()?;
    let name = match last.find('[') {
        Some(bracket) => &last[..bracket],
        None => last,
    };
    if name.is_empty() || name == "$" || name.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(name.to_string())
}

/// Deterministic realistic sample value for a parameter name
fn sample_value(name: &str) -> String {
    let normalized: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    let value = match normalized.as_str() {
        "patientid" | "patient" => "12345",
        "appointmentid" => "67890",
        "departmentid" => "180",
        "practitionerid" | "providerid" => "p-100",
        "firstname" | "givenname" => "John",
        "lastname" | "familyname" | "surname" => "Doe",
        "middlename" | "middleinitial" => "A",
        "name" | "fullname" => "John Doe",
        "dob" | "dateofbirth" | "birthdate" => "1990-01-01",
        "gender" | "sex" => "M",
        "ssn" | "socialsecuritynumber" => "123-45-6789",
        "email" | "emailaddress" => "john.doe@example.com",
        "phone" | "phonenumber" | "homephone" | "mobilephone" | "workphone" => "555-0100",
        "address1" | "street" | "streetaddress" => "123 Main St",
        "address2" => "Apt 4",
        "city" => "Boston",
        "state" => "MA",
        "zip" | "zipcode" | "postalcode" => "02101",
        "status" => "active",
        _ => return format!("sample-{name}"),
    };
    value.to_string()
}
