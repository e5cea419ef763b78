//! Data transform builder
//!
//! Two construction modes share the document type:
//! - sample-diff: structurally match a desired output sample against a
//!   source JSON sample, recording each match as a JSONPath
//! - fixed-path: emit mappings straight from the HL7 field-path table,
//!   with no structural inference
//!
//! Array handling is the load-bearing rule: a source array becomes one
//! iterating group whose property paths are relative to a single array
//! element. Per-index groups are never emitted.

use crate::error::{CompileError, Result};
use hdc_core::documents::{DataTransform, FormatType, PropertyGroup, TransformProperty};
use serde_json::{Map, Value};
use std::fmt;

/// An ambiguous source match that was resolved to the shallowest path.
/// Generation proceeds; the ambiguity is surfaced alongside the result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionWarning {
    pub output_field: String,
    pub chosen_path: String,
    pub candidates: Vec<String>,
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ambiguous match for '{}': chose {} out of [{}]",
            self.output_field,
            self.chosen_path,
            self.candidates.join(", ")
        )
    }
}

/// A built transform together with any resolution warnings
#[derive(Debug, Clone)]
pub struct BuiltTransform {
    pub transform: DataTransform,
    pub warnings: Vec<ResolutionWarning>,
}

/// One component of an internal JSONPath
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathStep {
    Key(String),
    Index(usize),
}

fn render_path(steps: &[PathStep]) -> String {
    let mut out = String::from("$");
    for step in steps {
        match step {
            PathStep::Key(key) => {
                out.push('.');
                out.push_str(key);
            }
            PathStep::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
        }
    }
    out
}

/// Collect every scalar leaf of `value` with its path
fn collect_leaves(value: &Value, prefix: &mut Vec<PathStep>, out: &mut Vec<(Vec<PathStep>, Value)>) {
    match value {
        Value::Object(object) => {
            for (key, nested) in object {
                prefix.push(PathStep::Key(key.clone()));
                collect_leaves(nested, prefix, out);
                prefix.pop();
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                prefix.push(PathStep::Index(index));
                collect_leaves(item, prefix, out);
                prefix.pop();
            }
        }
        scalar => out.push((prefix.clone(), scalar.clone())),
    }
}

/// Collect every array of `value` with its path
fn collect_arrays(
    value: &Value,
    prefix: &mut Vec<PathStep>,
    out: &mut Vec<(Vec<PathStep>, Vec<Value>)>,
) {
    match value {
        Value::Object(object) => {
            for (key, nested) in object {
                prefix.push(PathStep::Key(key.clone()));
                collect_arrays(nested, prefix, out);
                prefix.pop();
            }
        }
        Value::Array(items) => {
            out.push((prefix.clone(), items.clone()));
            for (index, item) in items.iter().enumerate() {
                prefix.push(PathStep::Index(index));
                collect_arrays(item, prefix, out);
                prefix.pop();
            }
        }
        _ => {}
    }
}

pub struct TransformBuilder;

impl TransformBuilder {
    /// Build a transform by diffing a desired output sample against a
    /// source sample
    pub fn from_samples(transform_id: &str, source: &Value, target: &Value) -> Result<BuiltTransform> {
        Self::from_samples_with_format(transform_id, source, target, FormatType::FirstItem)
    }

    /// Like [`from_samples`](Self::from_samples), with an explicit format
    /// type. `Array` is rejected: generated mappings always use
    /// `FirstItem`.
    pub fn from_samples_with_format(
        transform_id: &str,
        source: &Value,
        target: &Value,
        format_type: FormatType,
    ) -> Result<BuiltTransform> {
        if format_type == FormatType::Array {
            return Err(CompileError::InvalidFormatType("Array".to_string()));
        }

        let target_object = target
            .as_object()
            .ok_or_else(|| CompileError::InvalidSample("target sample must be a JSON object".to_string()))?;
        if target_object.is_empty() {
            return Err(CompileError::InvalidSample("target sample has no fields".to_string()));
        }

        let mut leaves = Vec::new();
        collect_leaves(source, &mut Vec::new(), &mut leaves);
        let mut arrays = Vec::new();
        collect_arrays(source, &mut Vec::new(), &mut arrays);

        let mut warnings = Vec::new();
        let mut root = PropertyGroup::root();
        let mut groups = Vec::new();

        for (field, value) in target_object {
            match value {
                Value::Array(items) => {
                    groups.push(Self::build_array_group(field, items, &arrays, field, &mut warnings)?);
                }
                Value::Object(object) => {
                    groups.push(Self::build_object_group(
                        field,
                        object,
                        &leaves,
                        &arrays,
                        field,
                        &mut warnings,
                    )?);
                }
                scalar => {
                    let path = Self::match_scalar(field, scalar, &leaves, &mut warnings)?;
                    root.properties
                        .insert(field.clone(), TransformProperty::from_path(path));
                }
            }
        }

        let mut transform = DataTransform::new(transform_id);
        if !root.properties.is_empty() {
            transform.property_groups.push(root);
        }
        transform.property_groups.extend(groups);

        tracing::debug!(
            transform_id,
            groups = transform.property_groups.len(),
            warnings = warnings.len(),
            "built sample-diff transform"
        );
        Ok(BuiltTransform { transform, warnings })
    }

    /// A nested (non-array) target object: a group with the field as key
    /// and no locator
    fn build_object_group(
        key: &str,
        object: &Map<String, Value>,
        leaves: &[(Vec<PathStep>, Value)],
        arrays: &[(Vec<PathStep>, Vec<Value>)],
        label: &str,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> Result<PropertyGroup> {
        let mut group = PropertyGroup::keyed(key);

        for (field, value) in object {
            let field_label = format!("{label}.{field}");
            match value {
                Value::Array(items) => {
                    group
                        .property_groups
                        .push(Self::build_array_group(field, items, arrays, &field_label, warnings)?);
                }
                Value::Object(nested) => {
                    group.property_groups.push(Self::build_object_group(
                        field,
                        nested,
                        leaves,
                        arrays,
                        &field_label,
                        warnings,
                    )?);
                }
                scalar => {
                    let path = Self::match_scalar(&field_label, scalar, leaves, warnings)?;
                    group
                        .properties
                        .insert(field.clone(), TransformProperty::from_path(path));
                }
            }
        }

        Ok(group)
    }

    /// A target array collapses to one iterating group: the locator points
    /// at the matched source array and every property path is relative to
    /// a single element
    fn build_array_group(
        key: &str,
        target_items: &[Value],
        source_arrays: &[(Vec<PathStep>, Vec<Value>)],
        label: &str,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> Result<PropertyGroup> {
        let element = target_items
            .first()
            .ok_or_else(|| CompileError::InvalidSample(format!("target array '{label}' is empty")))?;
        let element = element.as_object().ok_or_else(|| {
            CompileError::InvalidSample(format!("target array '{label}' must contain objects"))
        })?;

        for (field, value) in element {
            if value.is_object() || value.is_array() {
                return Err(CompileError::InvalidSample(format!(
                    "nested structure at '{label}.{field}' inside an array element is not supported"
                )));
            }
        }

        // Candidate arrays: those whose first element structurally
        // contains every target element value
        let mut candidates = Vec::new();
        for (prefix, items) in source_arrays {
            let first = match items.first() {
                Some(first) if first.is_object() => first,
                _ => continue,
            };

            let mut element_leaves = Vec::new();
            collect_leaves(first, &mut Vec::new(), &mut element_leaves);

            let covers_all = element
                .iter()
                .all(|(_, value)| element_leaves.iter().any(|(_, leaf)| leaf == value));
            if covers_all {
                candidates.push((prefix.clone(), element_leaves));
            }
        }

        if candidates.is_empty() {
            return Err(CompileError::NoSourceMatch {
                field: label.to_string(),
            });
        }

        candidates.sort_by(|a, b| {
            a.0.len()
                .cmp(&b.0.len())
                .then_with(|| render_path(&a.0).cmp(&render_path(&b.0)))
        });
        let locator = render_path(&candidates[0].0);
        if candidates.len() > 1 {
            warnings.push(ResolutionWarning {
                output_field: label.to_string(),
                chosen_path: locator.clone(),
                candidates: candidates.iter().map(|(p, _)| render_path(p)).collect(),
            });
        }

        let element_leaves = &candidates[0].1;
        let mut group = PropertyGroup::iterating(key, locator);
        for (field, value) in element {
            let path = Self::match_scalar(&format!("{label}.{field}"), value, element_leaves, warnings)?;
            group
                .properties
                .insert(field.clone(), TransformProperty::from_path(path));
        }

        Ok(group)
    }

    /// Find the source path whose leaf equals the target value. The
    /// shallowest path wins; ties break on the rendered path, and any
    /// ambiguity is surfaced as a warning.
    fn match_scalar(
        label: &str,
        target: &Value,
        leaves: &[(Vec<PathStep>, Value)],
        warnings: &mut Vec<ResolutionWarning>,
    ) -> Result<String> {
        let mut candidates: Vec<&(Vec<PathStep>, Value)> =
            leaves.iter().filter(|(_, leaf)| leaf == target).collect();

        if candidates.is_empty() {
            return Err(CompileError::NoSourceMatch {
                field: label.to_string(),
            });
        }

        candidates.sort_by(|a, b| {
            a.0.len()
                .cmp(&b.0.len())
                .then_with(|| render_path(&a.0).cmp(&render_path(&b.0)))
        });
        let chosen = render_path(&candidates[0].0);

        if candidates.len() > 1 {
            warnings.push(ResolutionWarning {
                output_field: label.to_string(),
                chosen_path: chosen.clone(),
                candidates: candidates.iter().map(|(p, _)| render_path(p)).collect(),
            });
        }

        Ok(chosen)
    }

    /// Build a transform from resolved HL7 logical fields; pure table
    /// lookup, no inference
    pub fn from_hl7_fields(transform_id: &str, fields: &[(String, Hl7Field)]) -> DataTransform {
        let mut root = PropertyGroup::root();
        for (output_field, field) in fields {
            root.properties
                .insert(output_field.clone(), TransformProperty::from_path(field.json_path()));
        }

        let mut transform = DataTransform::new(transform_id);
        transform.property_groups.push(root);
        transform
    }

    /// Resolve a desired-output sample's field names against the HL7
    /// field-path table
    pub fn resolve_hl7_fields(target: &Value) -> Result<Vec<(String, Hl7Field)>> {
        let object = target
            .as_object()
            .ok_or_else(|| CompileError::InvalidSample("desired output must be a JSON object".to_string()))?;
        if object.is_empty() {
            return Err(CompileError::InvalidSample("desired output has no fields".to_string()));
        }

        object
            .keys()
            .map(|name| {
                Hl7Field::from_output_name(name)
                    .map(|field| (name.clone(), field))
                    .ok_or_else(|| CompileError::UnknownHl7Field(name.clone()))
            })
            .collect()
    }
}

/// Logical HL7 fields with fixed extraction paths, rooted at the parsed
/// message wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hl7Field {
    SendingApplication,
    SendingFacility,
    ReceivingApplication,
    MessageTimestamp,
    MessageType,
    TriggerEvent,
    PatientId,
    LastName,
    FirstName,
    MiddleName,
    DateOfBirth,
    Gender,
    Ssn,
    Street,
    City,
    State,
    Zip,
    Phone,
    Email,
}

impl Hl7Field {
    /// The fixed JSONPath for this field
    pub fn json_path(&self) -> &'static str {
        match self {
            Hl7Field::SendingApplication => "$.GenericMessageWrapper.MSH[0].3[0]",
            Hl7Field::SendingFacility => "$.GenericMessageWrapper.MSH[0].4[0]",
            Hl7Field::ReceivingApplication => "$.GenericMessageWrapper.MSH[0].5[0]",
            Hl7Field::MessageTimestamp => "$.GenericMessageWrapper.MSH[0].7[0].1",
            Hl7Field::MessageType => "$.GenericMessageWrapper.MSH[0].9[0].1",
            Hl7Field::TriggerEvent => "$.GenericMessageWrapper.MSH[0].9[0].2",
            Hl7Field::PatientId => "$.GenericMessageWrapper.PID[0].3[0].1",
            Hl7Field::LastName => "$.GenericMessageWrapper.PID[0].5[0].1.1",
            Hl7Field::FirstName => "$.GenericMessageWrapper.PID[0].5[0].2",
            Hl7Field::MiddleName => "$.GenericMessageWrapper.PID[0].5[0].3",
            Hl7Field::DateOfBirth => "$.GenericMessageWrapper.PID[0].7[0].1",
            Hl7Field::Gender => "$.GenericMessageWrapper.PID[0].8[0]",
            Hl7Field::Ssn => "$.GenericMessageWrapper.PID[0].19[0]",
            Hl7Field::Street => "$.GenericMessageWrapper.PID[0].11[0].1.1",
            Hl7Field::City => "$.GenericMessageWrapper.PID[0].11[0].3",
            Hl7Field::State => "$.GenericMessageWrapper.PID[0].11[0].4",
            Hl7Field::Zip => "$.GenericMessageWrapper.PID[0].11[0].5",
            Hl7Field::Phone => "$.GenericMessageWrapper.PID[0].13[0].1",
            Hl7Field::Email => "$.GenericMessageWrapper.PID[0].13[0].4",
        }
    }

    /// Resolve an output field name against the table, normalizing case
    /// and punctuation and accepting common synonyms
    pub fn from_output_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        let field = match normalized.as_str() {
            "sendingapplication" | "sendingapp" => Hl7Field::SendingApplication,
            "sendingfacility" => Hl7Field::SendingFacility,
            "receivingapplication" | "receivingapp" => Hl7Field::ReceivingApplication,
            "messagetimestamp" | "messagedatetime" | "timestamp" => Hl7Field::MessageTimestamp,
            "messagetype" | "messagetypecode" => Hl7Field::MessageType,
            "triggerevent" | "eventtype" => Hl7Field::TriggerEvent,
            "patientid" | "mrn" => Hl7Field::PatientId,
            "lastname" | "familyname" | "surname" => Hl7Field::LastName,
            "firstname" | "givenname" => Hl7Field::FirstName,
            "middlename" | "middleinitial" => Hl7Field::MiddleName,
            "dob" | "dateofbirth" | "birthdate" => Hl7Field::DateOfBirth,
            "gender" | "sex" => Hl7Field::Gender,
            "ssn" | "socialsecuritynumber" => Hl7Field::Ssn,
            "street" | "streetaddress" | "address" | "address1" | "addressline1" => Hl7Field::Street,
            "city" => Hl7Field::City,
            "state" => Hl7Field::State,
            "zip" | "zipcode" | "postalcode" => Hl7Field::Zip,
            "phone" | "phonenumber" | "homephone" => Hl7Field::Phone,
            "email" | "emailaddress" => Hl7Field::Email,
            _ => return None,
        };
        Some(field)
    }
}
