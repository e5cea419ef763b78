//! Workflow document
//!
//! A workflow is an ordered chain of typed steps. Steps publish output
//! variables as key/value pairs: the key is the chainable variable name,
//! the value is a fixed constant label per step type. Later steps
//! reference earlier output *keys*, never output values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Workflow step type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepType {
    #[serde(rename = "HL7TransformStep")]
    Hl7Transform,
    #[serde(rename = "DataTransformStep")]
    DataTransform,
    #[serde(rename = "HttpCallStep")]
    HttpCall,
    #[serde(rename = "DeserializeObjectStep")]
    DeserializeObject,
    #[serde(rename = "SetReturnDataStep")]
    SetReturnData,
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepType::Hl7Transform => "HL7TransformStep",
            StepType::DataTransform => "DataTransformStep",
            StepType::HttpCall => "HttpCallStep",
            StepType::DeserializeObject => "DeserializeObjectStep",
            StepType::SetReturnData => "SetReturnDataStep",
        };
        f.write_str(s)
    }
}

/// Redirect block carried by every step, unused by generated workflows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    pub base_url: String,
    pub query_parameters: BTreeMap<String, String>,
}

impl Default for Redirect {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            query_parameters: BTreeMap::new(),
        }
    }
}

/// One step in a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub workflow_step_id: String,
    pub name: String,
    pub step_type: StepType,
    pub sequence: u32,
    pub input: BTreeMap<String, String>,
    pub output: BTreeMap<String, String>,
    pub redirect: Redirect,
    pub run_rules: Vec<serde_json::Value>,
    pub validation_rules: Vec<serde_json::Value>,
}

impl WorkflowStep {
    pub fn new(
        workflow_step_id: impl Into<String>,
        name: impl Into<String>,
        step_type: StepType,
        sequence: u32,
    ) -> Self {
        Self {
            workflow_step_id: workflow_step_id.into(),
            name: name.into(),
            step_type,
            sequence,
            input: BTreeMap::new(),
            output: BTreeMap::new(),
            redirect: Redirect::default(),
            run_rules: Vec::new(),
            validation_rules: Vec::new(),
        }
    }

    /// Add an input entry
    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.input.insert(key.into(), value.into());
        self
    }

    /// Add an output entry
    pub fn with_output(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.output.insert(key.into(), value.into());
        self
    }
}

/// Workflow document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub workflow_id: String,
    pub description: String,
    pub steps: Vec<WorkflowStep>,
}

impl Workflow {
    pub fn new(workflow_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            description: description.into(),
            steps: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&StepType::Hl7Transform).unwrap(),
            "\"HL7TransformStep\""
        );
        assert_eq!(
            serde_json::to_string(&StepType::SetReturnData).unwrap(),
            "\"SetReturnDataStep\""
        );
    }

    #[test]
    fn test_step_wire_shape() {
        let step = WorkflowStep::new("Demo-WF-step-0", "Call API", StepType::HttpCall, 0)
            .with_input("apiId", "Demo-API")
            .with_output("rawApiResponse", "ResponseData");

        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["workflowStepId"], "Demo-WF-step-0");
        assert_eq!(json["stepType"], "HttpCallStep");
        assert_eq!(json["sequence"], 0);
        assert_eq!(json["input"]["apiId"], "Demo-API");
        assert_eq!(json["output"]["rawApiResponse"], "ResponseData");
        assert_eq!(json["redirect"]["baseUrl"], "");
        assert!(json["runRules"].as_array().unwrap().is_empty());
        assert!(json["validationRules"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_workflow_wire_names() {
        let wf = Workflow::new("Demo-WF", "Demo workflow");
        let json = serde_json::to_value(&wf).unwrap();
        assert_eq!(json["workflowId"], "Demo-WF");
        assert_eq!(json["description"], "Demo workflow");
    }
}
