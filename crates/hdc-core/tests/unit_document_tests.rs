//! Unit tests for document wire shapes

use hdc_core::documents::{
    ApiConfig, AppInfo, AppType, Application, EscapeMode, PathSegment, QueryParameter,
    RequestMethod, StepType, Template, Workflow, WorkflowStep,
};
use hdc_core::{DocumentKind, DocumentSet};

#[test]
fn test_api_document_full_wire_shape() {
    let mut api = ApiConfig::new("Patients-API", "Patients API", RequestMethod::Get);
    api.api_path = "patients".to_string();
    api.path_parameters = vec![
        PathSegment::value("patientid"),
        PathSegment::literal("referralauths"),
    ];
    api.query_parameters = vec![QueryParameter::dynamic("status")];

    let json = serde_json::to_value(&api).unwrap();
    assert_eq!(json["apiId"], "Patients-API");
    assert_eq!(json["apiPath"], "patients");
    assert_eq!(json["pathParameters"][0]["value"], "patientid");
    assert_eq!(json["pathParameters"][0]["valueType"], "Value");
    assert_eq!(json["pathParameters"][1]["value"], "referralauths");
    assert_eq!(json["pathParameters"][1]["valueType"], "Literal");
    assert_eq!(json["queryParameters"][0]["key"], "status");
    assert_eq!(json["queryParameters"][0]["value"], "status");
    assert_eq!(json["queryParameters"][0]["operator"], "");
    assert_eq!(json["queryParameters"][0]["optional"], false);
    assert!(json["headerParameters"].as_object().unwrap().is_empty());
    assert_eq!(json["pageJsonPath"], "");
}

#[test]
fn test_workflow_document_wire_shape() {
    let mut workflow = Workflow::new("Patients-WF", "Patients: Call API and return raw response");
    workflow.steps.push(
        WorkflowStep::new("Patients-step-0", "Call API", StepType::HttpCall, 0)
            .with_input("apiId", "Patients-API")
            .with_output("rawApiResponse", "ResponseData"),
    );

    let json = serde_json::to_value(&workflow).unwrap();
    assert_eq!(json["workflowId"], "Patients-WF");
    assert_eq!(json["steps"][0]["workflowStepId"], "Patients-step-0");
    assert_eq!(json["steps"][0]["stepType"], "HttpCallStep");
    assert_eq!(json["steps"][0]["redirect"]["queryParameters"], serde_json::json!({}));
    assert_eq!(json["steps"][0]["runRules"], serde_json::json!([]));
}

#[test]
fn test_application_wire_shape() {
    let app_info = AppInfo::new("secret-1", "client-1", vec![]);
    let application = Application {
        application_id: "Cerner-app-acme".to_string(),
        name: "Cerner-app-acme".to_string(),
        app_type: AppType::Backend,
        client_id: "client-1".to_string(),
        client_secret_id: "secret-1".to_string(),
        scopes: vec![],
        app_info,
    };

    let json = serde_json::to_value(&application).unwrap();
    assert_eq!(json["applicationId"], "Cerner-app-acme");
    assert_eq!(json["appType"], "Backend");
    assert_eq!(json["clientSecretId"], "secret-1");
    assert_eq!(json["appInfo"]["privateKeyName"], "secret-1");
    assert_eq!(json["appInfo"]["clientId"], "client-1");
    assert_eq!(json["appInfo"]["isJkuOAuth"], false);
}

#[test]
fn test_document_set_supersedes_by_kind() {
    let mut set = DocumentSet::new();
    set.insert(Template::new("First-Tem", "", EscapeMode::Json, false));
    set.insert(Workflow::new("First-WF", ""));
    set.insert(Template::new("Second-Tem", "", EscapeMode::Json, false));

    assert_eq!(set.len(), 2);
    let kinds: Vec<DocumentKind> = set.iter().map(|(k, _)| k).collect();
    assert_eq!(kinds, vec![DocumentKind::Template, DocumentKind::Workflow]);
}
