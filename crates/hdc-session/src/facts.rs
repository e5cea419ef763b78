//! Collected facts and per-archetype requirements
//!
//! A fact is a single structured answer (method, path, body sample, ...)
//! the session tracks as required or collected. Which facts are required
//! depends on the active archetype and, for body facts, on the request
//! method.

use hdc_compiler::{ConnectionFacts, WorkflowFacts};
use hdc_core::documents::RequestMethod;
use hdc_core::Archetype;
use serde_json::Value;
use std::fmt;

/// The facts the session can track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactKind {
    WorkflowName,
    RequestMethod,
    EndpointPath,
    BodySample,
    ContentType,
    ResponseSample,
    DesiredOutput,
    SourceSample,
    Hl7Sample,
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FactKind::WorkflowName => "workflow name",
            FactKind::RequestMethod => "request method",
            FactKind::EndpointPath => "endpoint path",
            FactKind::BodySample => "request body sample",
            FactKind::ContentType => "request content type",
            FactKind::ResponseSample => "response sample",
            FactKind::DesiredOutput => "desired output format",
            FactKind::SourceSample => "source JSON sample",
            FactKind::Hl7Sample => "HL7 sample message",
        };
        f.write_str(name)
    }
}

/// All facts collected so far in one conversation
#[derive(Debug, Clone, Default)]
pub struct FactSet {
    pub workflow_name: Option<String>,
    pub method: Option<RequestMethod>,
    pub path: Option<String>,
    pub content_type: Option<String>,
    pub accept_content_type: Option<String>,
    pub body_sample: Option<Value>,
    pub response_sample: Option<Value>,
    pub desired_output: Option<Value>,
    pub source_sample: Option<Value>,
    pub hl7_sample: Option<String>,
    pub connection: Option<ConnectionFacts>,
}

impl FactSet {
    /// The facts still required before generation may proceed for the
    /// given archetype, in question order
    pub fn missing(&self, archetype: Archetype) -> Vec<FactKind> {
        let mut missing = Vec::new();

        if self.workflow_name.is_none() {
            missing.push(FactKind::WorkflowName);
        }

        match archetype {
            Archetype::RawApiCall | Archetype::ApiCallWithTransform => {
                if self.method.is_none() {
                    missing.push(FactKind::RequestMethod);
                }
                if self.path.is_none() {
                    missing.push(FactKind::EndpointPath);
                }
                // Body facts only matter for methods that carry a body
                if self.method.map(|m| m.has_body()).unwrap_or(false) {
                    if self.body_sample.is_none() {
                        missing.push(FactKind::BodySample);
                    }
                    if self.content_type.is_none() {
                        missing.push(FactKind::ContentType);
                    }
                }
                if archetype == Archetype::ApiCallWithTransform {
                    if self.response_sample.is_none() {
                        missing.push(FactKind::ResponseSample);
                    }
                    if self.desired_output.is_none() {
                        missing.push(FactKind::DesiredOutput);
                    }
                }
            }
            Archetype::JsonToJson => {
                if self.source_sample.is_none() {
                    missing.push(FactKind::SourceSample);
                }
                if self.desired_output.is_none() {
                    missing.push(FactKind::DesiredOutput);
                }
            }
            Archetype::Hl7ToJson => {
                if self.hl7_sample.is_none() {
                    missing.push(FactKind::Hl7Sample);
                }
                if self.desired_output.is_none() {
                    missing.push(FactKind::DesiredOutput);
                }
            }
        }

        missing
    }

    /// Assemble the compiler input once the gate is satisfied
    pub fn to_workflow_facts(&self, archetype: Archetype) -> WorkflowFacts {
        WorkflowFacts {
            name: self.workflow_name.clone().unwrap_or_default(),
            archetype: Some(archetype),
            method: self.method,
            path: self.path.clone(),
            content_type: self.content_type.clone(),
            accept_content_type: self.accept_content_type.clone(),
            body_sample: self.body_sample.clone(),
            response_sample: self.response_sample.clone(),
            desired_output: self.desired_output.clone(),
            source_sample: self.source_sample.clone(),
            hl7_sample: self.hl7_sample.clone(),
            connection: self.connection.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_does_not_require_body_facts() {
        let facts = FactSet {
            workflow_name: Some("Demo".to_string()),
            method: Some(RequestMethod::Get),
            path: Some("/appointments".to_string()),
            ..FactSet::default()
        };
        assert!(facts.missing(Archetype::RawApiCall).is_empty());
    }

    #[test]
    fn test_post_requires_body_and_content_type() {
        let facts = FactSet {
            workflow_name: Some("Demo".to_string()),
            method: Some(RequestMethod::Post),
            path: Some("/patients".to_string()),
            ..FactSet::default()
        };
        assert_eq!(
            facts.missing(Archetype::RawApiCall),
            vec![FactKind::BodySample, FactKind::ContentType]
        );
    }

    #[test]
    fn test_transform_archetype_requires_samples() {
        let facts = FactSet {
            workflow_name: Some("Demo".to_string()),
            method: Some(RequestMethod::Get),
            path: Some("/patients".to_string()),
            ..FactSet::default()
        };
        assert_eq!(
            facts.missing(Archetype::ApiCallWithTransform),
            vec![FactKind::ResponseSample, FactKind::DesiredOutput]
        );
    }

    #[test]
    fn test_hl7_requirements() {
        let facts = FactSet {
            workflow_name: Some("Demo".to_string()),
            desired_output: Some(json!({"gender": "M"})),
            ..FactSet::default()
        };
        assert_eq!(facts.missing(Archetype::Hl7ToJson), vec![FactKind::Hl7Sample]);
    }

    #[test]
    fn test_missing_order_is_question_order() {
        let facts = FactSet::default();
        let missing = facts.missing(Archetype::RawApiCall);
        assert_eq!(
            missing,
            vec![FactKind::WorkflowName, FactKind::RequestMethod, FactKind::EndpointPath]
        );
    }
}
