//! Full conversation flow tests

use hdc_compiler::ConnectionFacts;
use hdc_core::documents::{AppType, Environment, Platform, RequestMethod};
use hdc_core::{Archetype, Document, DocumentKind};
use hdc_session::{FactKind, SessionError, SessionState, WorkflowSession};
use serde_json::json;

fn athena_connection() -> ConnectionFacts {
    ConnectionFacts {
        platform: Platform::Athena,
        organization: "acme".to_string(),
        secret_id: "sec-9".to_string(),
        client_id: "cli-9".to_string(),
        app_type: AppType::Backend,
        scopes: vec!["system/Patient.read".to_string()],
        base_url: "https://api.preview.platform.athenahealth.com".to_string(),
        environment: Environment::Test,
        token_endpoint: "https://api.preview.platform.athenahealth.com/oauth2/v1/token".to_string(),
    }
}

#[test]
fn test_full_raw_api_conversation_with_connection() {
    let mut session = WorkflowSession::new();

    session.select_archetype(Archetype::RawApiCall).unwrap();
    session.create_connection("Athena").unwrap();
    assert_eq!(session.state(), SessionState::CollectingConnectionFacts);
    assert_eq!(session.platform(), Some(Platform::Athena));

    session.set_connection_facts(athena_connection()).unwrap();
    assert_eq!(session.state(), SessionState::CollectingWorkflowFacts);

    session.set_workflow_name("Appointments").unwrap();
    session.set_method(RequestMethod::Get).unwrap();
    session.set_path("/appointments").unwrap();
    assert_eq!(session.state(), SessionState::Ready);

    let bundle = session.generate().unwrap();

    // Application, connection, api, workflow; GET so neither template
    // nor transform
    let kinds: Vec<DocumentKind> = bundle.documents.iter().map(|(k, _)| k).collect();
    assert_eq!(
        kinds,
        vec![
            DocumentKind::Application,
            DocumentKind::Connection,
            DocumentKind::Api,
            DocumentKind::Workflow,
        ]
    );

    let Some(Document::Application(application)) = bundle.documents.get(DocumentKind::Application)
    else {
        panic!("expected application");
    };
    assert_eq!(application.application_id, "Athena-app-acme");
    assert_eq!(application.client_secret_id, "sec-9");
    assert_eq!(application.app_info.private_key_name, "sec-9");
}

#[test]
fn test_post_gating_asks_for_body_facts() {
    let mut session = WorkflowSession::new();
    session.select_archetype(Archetype::RawApiCall).unwrap();
    session.use_existing_connection().unwrap();

    session.set_workflow_name("CreatePatient").unwrap();
    session.set_method(RequestMethod::Post).unwrap();
    session.set_path("/patients").unwrap();

    // POST requires a body sample and an explicit content type
    assert_eq!(
        session.missing_facts(),
        vec![FactKind::BodySample, FactKind::ContentType]
    );
    let err = session.generate().unwrap_err();
    assert!(matches!(err, SessionError::MissingFact(FactKind::BodySample)));

    session
        .set_body_sample(json!({"firstname": "John", "departmentid": "180"}))
        .unwrap();
    session
        .set_content_type("application/x-www-form-urlencoded")
        .unwrap();
    assert_eq!(session.state(), SessionState::Ready);

    let bundle = session.generate().unwrap();
    let Some(Document::Template(template)) = bundle.documents.get(DocumentKind::Template) else {
        panic!("expected template");
    };
    assert_eq!(
        template.template_body,
        "departmentid=%departmentid%&firstname=%firstname%"
    );
}

#[test]
fn test_hl7_conversation() {
    let mut session = WorkflowSession::new();
    session.select_archetype(Archetype::Hl7ToJson).unwrap();
    assert_eq!(session.state(), SessionState::CollectingWorkflowFacts);

    session.set_workflow_name("Admit").unwrap();
    session
        .set_hl7_sample("MSH|^~\\&|SND|FAC|RCV|FAC2|20230101||ADT^A01|123|P|2.3")
        .unwrap();
    session
        .set_desired_output(json!({"firstName": "", "gender": "", "ssn": ""}))
        .unwrap();

    let bundle = session.generate().unwrap();
    let Some(Document::Transform(transform)) = bundle.documents.get(DocumentKind::Transform) else {
        panic!("expected transform");
    };
    let root = &transform.property_groups[0];
    assert_eq!(root.properties["ssn"].path, "$.GenericMessageWrapper.PID[0].19[0]");
    assert_eq!(root.properties["gender"].path, "$.GenericMessageWrapper.PID[0].8[0]");
}

#[test]
fn test_regeneration_supersedes_store() {
    let mut session = WorkflowSession::new();
    session.select_archetype(Archetype::JsonToJson).unwrap();
    session.set_workflow_name("Reshape").unwrap();
    session.set_source_sample(json!({"name": "A"})).unwrap();
    session.set_desired_output(json!({"fullName": "A"})).unwrap();
    session.generate().unwrap();

    session.set_workflow_name("Reshaped").unwrap();
    session.generate().unwrap();

    let Some(Document::Workflow(workflow)) = session.documents().get(DocumentKind::Workflow) else {
        panic!("expected workflow");
    };
    assert_eq!(workflow.workflow_id, "Reshaped-WF");
}

#[test]
fn test_warnings_surface_through_generation() {
    let mut session = WorkflowSession::new();
    session.select_archetype(Archetype::JsonToJson).unwrap();
    session.set_workflow_name("Ambiguous").unwrap();
    session
        .set_source_sample(json!({"id": "x", "nested": {"id": "x"}}))
        .unwrap();
    session.set_desired_output(json!({"out": "x"})).unwrap();

    let bundle = session.generate().unwrap();
    assert_eq!(bundle.warnings.len(), 1);
    assert_eq!(bundle.warnings[0].chosen_path, "$.id");
}
