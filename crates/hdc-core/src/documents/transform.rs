//! Data transform document
//!
//! A transform is a tree of property groups. A group with a non-empty
//! `locator` iterates a source array; every property path inside it is
//! relative to one array element. Per-index groups are forbidden.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a property resolves its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueSource {
    /// Read from the JSONPath in `path`
    Path,
    /// Use the literal in `value`
    Value,
}

/// Output formatting for a resolved property
///
/// Generated documents always use `FirstItem`; `Array` exists on the
/// wire but is rejected by the transform builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatType {
    FirstItem,
    Array,
}

/// Date reformatting options, unused by generated documents but part of
/// the wire shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFormat {
    pub input_format: String,
    pub output_format: String,
    pub throw_exceptions: bool,
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            input_format: String::new(),
            output_format: String::new(),
            throw_exceptions: false,
        }
    }
}

/// String mapping/regex options, unused by generated documents but part
/// of the wire shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringFormat {
    pub mappings: BTreeMap<String, String>,
    pub regular_expression: String,
    pub replacement: String,
    pub default_mapping: String,
    pub throw_exceptions: bool,
}

impl Default for StringFormat {
    fn default() -> Self {
        Self {
            mappings: BTreeMap::new(),
            regular_expression: String::new(),
            replacement: String::new(),
            default_mapping: String::new(),
            throw_exceptions: false,
        }
    }
}

/// One output property, mapping a source path to an output field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformProperty {
    pub path: String,
    pub value: String,
    pub map: String,
    pub map_default: String,
    pub value_type: ValueSource,
    pub format_type: FormatType,
    pub date_format: DateFormat,
    pub string_format: StringFormat,
    pub property_groups: Vec<PropertyGroup>,
    pub properties: BTreeMap<String, TransformProperty>,
    pub delimiter: String,
}

impl TransformProperty {
    /// A path-sourced property with every other field at its fixed default
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: String::new(),
            map: String::new(),
            map_default: String::new(),
            value_type: ValueSource::Path,
            format_type: FormatType::FirstItem,
            date_format: DateFormat::default(),
            string_format: StringFormat::default(),
            property_groups: Vec::new(),
            properties: BTreeMap::new(),
            delimiter: String::new(),
        }
    }
}

/// A group of output properties sharing a source scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyGroup {
    pub key: String,
    pub locator: String,
    pub property_groups: Vec<PropertyGroup>,
    pub properties: BTreeMap<String, TransformProperty>,
}

impl PropertyGroup {
    /// The flat root group: empty key and locator
    pub fn root() -> Self {
        Self {
            key: String::new(),
            locator: String::new(),
            property_groups: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    /// A named nested group with no source scope of its own
    pub fn keyed(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            locator: String::new(),
            property_groups: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    /// A group that iterates the source array at `locator`, emitting
    /// one output object per element under `key`
    pub fn iterating(key: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            locator: locator.into(),
            property_groups: Vec::new(),
            properties: BTreeMap::new(),
        }
    }
}

/// Data transform document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTransform {
    pub transform_id: String,
    pub property_groups: Vec<PropertyGroup>,
}

impl DataTransform {
    pub fn new(transform_id: impl Into<String>) -> Self {
        Self {
            transform_id: transform_id.into(),
            property_groups: Vec::new(),
        }
    }
}
