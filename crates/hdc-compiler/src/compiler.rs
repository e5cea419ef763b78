//! Workflow compiler facade
//!
//! Runs the full generation pipeline for one fact set: path parsing,
//! codec resolution, template rendering, transform building, step
//! chaining, and payload derivation. The result is the complete document
//! set for the archetype; partial sets are never returned.

use crate::codec::ContentCodec;
use crate::connection::{ConnectionBuilder, ConnectionFacts};
use crate::error::{CompileError, Result};
use crate::path::PathParser;
use crate::payload::PayloadParams;
use crate::steps::{StepChainer, StepRefs};
use crate::template::{TemplateBuilder, TemplateFields};
use crate::transform::{ResolutionWarning, TransformBuilder};
use hdc_core::documents::{ApiConfig, RequestMethod};
use hdc_core::{Archetype, DocumentSet};
use serde_json::Value;

/// The facts a generation run starts from. The session gates which of
/// the optional fields must be present for the chosen archetype; the
/// compiler re-validates and fails closed on anything missing.
#[derive(Debug, Clone, Default)]
pub struct WorkflowFacts {
    pub name: String,
    pub archetype: Option<Archetype>,
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

/// Everything one generation run produces
#[derive(Debug, Clone)]
pub struct GeneratedBundle {
    pub documents: DocumentSet,
    pub warnings: Vec<ResolutionWarning>,
    pub payload_params: PayloadParams,
}

pub struct WorkflowCompiler;

impl WorkflowCompiler {
    /// Compile a fact set into the full document bundle for its archetype
    pub fn compile(facts: &WorkflowFacts) -> Result<GeneratedBundle> {
        let name = facts.name.trim();
        if name.is_empty() {
            return Err(CompileError::MissingInput("workflow name"));
        }
        let archetype = facts
            .archetype
            .ok_or(CompileError::MissingInput("workflow archetype"))?;

        let mut documents = DocumentSet::new();
        let mut warnings = Vec::new();
        let mut refs = StepRefs::default();

        if let Some(connection_facts) = &facts.connection {
            let (application, connection) = ConnectionBuilder::build(connection_facts);
            documents.insert(application);
            documents.insert(connection);
        }

        if archetype.needs_api() {
            let api = Self::compile_api(name, facts, &mut documents)?;
            refs.api_id = Some(api.api_id.clone());
            documents.insert(api);
        }

        match archetype {
            Archetype::RawApiCall => {}
            Archetype::ApiCallWithTransform => {
                let source = facts
                    .response_sample
                    .as_ref()
                    .ok_or(CompileError::MissingInput("response sample"))?;
                let target = facts
                    .desired_output
                    .as_ref()
                    .ok_or(CompileError::MissingInput("desired output"))?;

                let built =
                    TransformBuilder::from_samples(&format!("{name}-Response-DT"), source, target)?;
                warnings.extend(built.warnings);
                refs.transform_id = Some(built.transform.transform_id.clone());
                documents.insert(built.transform);
            }
            Archetype::JsonToJson => {
                let source = facts
                    .source_sample
                    .as_ref()
                    .ok_or(CompileError::MissingInput("source sample"))?;
                let target = facts
                    .desired_output
                    .as_ref()
                    .ok_or(CompileError::MissingInput("desired output"))?;

                let built = TransformBuilder::from_samples(&format!("{name}-DT"), source, target)?;
                warnings.extend(built.warnings);
                refs.transform_id = Some(built.transform.transform_id.clone());
                documents.insert(built.transform);
            }
            Archetype::Hl7ToJson => {
                if facts.hl7_sample.is_none() {
                    return Err(CompileError::MissingInput("HL7 sample"));
                }
                let target = facts
                    .desired_output
                    .as_ref()
                    .ok_or(CompileError::MissingInput("desired output"))?;

                // Fixed-path mode: the field table decides every path,
                // so the sample message itself needs no inspection
                let fields = TransformBuilder::resolve_hl7_fields(target)?;
                let transform = TransformBuilder::from_hl7_fields(&format!("{name}-HL7-DT"), &fields);
                refs.transform_id = Some(transform.transform_id.clone());
                documents.insert(transform);
            }
        }

        let workflow = StepChainer::chain(name, archetype, &refs)?;
        documents.insert(workflow);

        for warning in &warnings {
            tracing::warn!(field = %warning.output_field, chosen = %warning.chosen_path, "ambiguous source match");
        }

        let payload_params = PayloadParams::derive(&documents);
        Ok(GeneratedBundle {
            documents,
            warnings,
            payload_params,
        })
    }

    fn compile_api(name: &str, facts: &WorkflowFacts, documents: &mut DocumentSet) -> Result<ApiConfig> {
        let method = facts
            .method
            .ok_or(CompileError::MissingInput("request method"))?;
        let path = facts
            .path
            .as_deref()
            .ok_or(CompileError::MissingInput("endpoint path"))?;

        let parsed = PathParser::parse(path)?;
        let codec = ContentCodec::resolve(facts.content_type.as_deref())?;
        let accept = ContentCodec::resolve(facts.accept_content_type.as_deref())?;

        let mut api = ApiConfig::new(format!("{name}-API"), format!("{name} API"), method);
        api.api_path = parsed.api_path;
        api.path_parameters = parsed.path_parameters;
        api.query_parameters = parsed.query_parameters;
        api.content_type = codec.content_type;
        api.accept_content_type = accept.content_type;

        if method.has_body() {
            let sample = facts
                .body_sample
                .as_ref()
                .ok_or(CompileError::MissingInput("request body sample"))?;
            let fields = TemplateFields::from_sample(sample)?;
            let template = TemplateBuilder::build(&format!("{name}-Tem"), &codec, &fields);
            api.body_template_id = template.template_id.clone();
            documents.insert(template);
        }

        Ok(api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdc_core::{Document, DocumentKind};
    use serde_json::json;

    fn raw_call_facts() -> WorkflowFacts {
        WorkflowFacts {
            name: "Appointments".to_string(),
            archetype: Some(Archetype::RawApiCall),
            method: Some(RequestMethod::Get),
            path: Some("/appointments".to_string()),
            ..WorkflowFacts::default()
        }
    }

    #[test]
    fn test_raw_get_has_no_template() {
        let bundle = WorkflowCompiler::compile(&raw_call_facts()).unwrap();

        assert!(!bundle.documents.contains(DocumentKind::Template));
        match bundle.documents.get(DocumentKind::Api) {
            Some(Document::Api(api)) => {
                assert_eq!(api.api_path, "appointments");
                assert!(api.path_parameters.is_empty());
                assert_eq!(api.body_template_id, "");
            }
            other => panic!("Expected API document, got {:?}", other),
        }
        assert!(bundle.documents.contains(DocumentKind::Workflow));
    }

    #[test]
    fn test_post_generates_template() {
        let mut facts = raw_call_facts();
        facts.method = Some(RequestMethod::Post);
        facts.body_sample = Some(json!({"firstname": "John", "lastname": "Doe"}));

        let bundle = WorkflowCompiler::compile(&facts).unwrap();
        match bundle.documents.get(DocumentKind::Template) {
            Some(Document::Template(template)) => {
                assert_eq!(template.template_id, "Appointments-Tem");
                assert!(template.template_body.contains("%firstname%"));
            }
            other => panic!("Expected template, got {:?}", other),
        }
        match bundle.documents.get(DocumentKind::Api) {
            Some(Document::Api(api)) => assert_eq!(api.body_template_id, "Appointments-Tem"),
            other => panic!("Expected API document, got {:?}", other),
        }
    }

    #[test]
    fn test_post_without_body_sample_rejected() {
        let mut facts = raw_call_facts();
        facts.method = Some(RequestMethod::Post);

        let err = WorkflowCompiler::compile(&facts).unwrap_err();
        assert!(matches!(err, CompileError::MissingInput("request body sample")));
    }

    #[test]
    fn test_json_to_json_bundle() {
        let facts = WorkflowFacts {
            name: "Reshape".to_string(),
            archetype: Some(Archetype::JsonToJson),
            source_sample: Some(json!({"patients": [{"name": "A"}, {"name": "B"}]})),
            desired_output: Some(json!({"patients": [{"fullName": "A"}, {"fullName": "B"}]})),
            ..WorkflowFacts::default()
        };

        let bundle = WorkflowCompiler::compile(&facts).unwrap();
        assert!(!bundle.documents.contains(DocumentKind::Api));
        assert!(bundle.documents.contains(DocumentKind::Transform));
        assert!(bundle.documents.contains(DocumentKind::Workflow));
        assert_eq!(bundle.documents.len(), 2);
    }

    #[test]
    fn test_idempotent_generation() {
        let facts = WorkflowFacts {
            name: "Patients".to_string(),
            archetype: Some(Archetype::RawApiCall),
            method: Some(RequestMethod::Post),
            path: Some("/patients/{patientid}?status={status}".to_string()),
            body_sample: Some(json!({"firstname": "John", "departmentid": "180"})),
            ..WorkflowFacts::default()
        };

        let first = WorkflowCompiler::compile(&facts).unwrap();
        let second = WorkflowCompiler::compile(&facts).unwrap();

        for (kind, document) in first.documents.iter() {
            let other = second.documents.get(kind).unwrap();
            assert_eq!(
                serde_json::to_string(document).unwrap(),
                serde_json::to_string(other).unwrap()
            );
        }
        assert_eq!(first.payload_params, second.payload_params);
    }

    #[test]
    fn test_missing_name_rejected() {
        let mut facts = raw_call_facts();
        facts.name = "  ".to_string();
        assert!(matches!(
            WorkflowCompiler::compile(&facts).unwrap_err(),
            CompileError::MissingInput("workflow name")
        ));
    }
}
