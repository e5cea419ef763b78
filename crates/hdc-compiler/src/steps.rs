//! Workflow step chaining
//!
//! Assembles the fixed step sequence for each archetype and wires each
//! step's published output keys into the next step's input. The output
//! *value* of every step is a fixed constant label per step type; only
//! output *keys* are chainable. Referencing a value where a key belongs
//! is the primary chaining bug class, so the chain is verified by code
//! before a workflow leaves this module.

use crate::error::{CompileError, Result};
use hdc_core::documents::{StepType, Workflow, WorkflowStep};
use hdc_core::Archetype;
use std::collections::BTreeSet;

/// Fixed output value labels; these never vary with workflow content
pub const RESPONSE_DATA: &str = "ResponseData";
pub const TRANSFORMED_DATA: &str = "TransformedData";
pub const OUTPUT_OBJECT: &str = "OutputObject";

/// Chainable output keys
pub const RAW_RESPONSE_KEY: &str = "rawApiResponse";
pub const TRANSFORMED_KEY: &str = "transformedData";
pub const DESERIALIZED_KEY: &str = "deserializedData";

const RETURN_LABEL: &str = "Result";

/// References to the component documents a step chain wires together
#[derive(Debug, Clone, Default)]
pub struct StepRefs {
    pub api_id: Option<String>,
    pub transform_id: Option<String>,
}

pub struct StepChainer;

impl StepChainer {
    /// Build and verify the workflow for an archetype
    pub fn chain(name: &str, archetype: Archetype, refs: &StepRefs) -> Result<Workflow> {
        let steps = match archetype {
            Archetype::RawApiCall => {
                let api_id = refs
                    .api_id
                    .as_deref()
                    .ok_or(CompileError::MissingInput("apiId"))?;
                vec![
                    Self::http_call(name, 0, api_id, None),
                    Self::deserialize(name, 1),
                    Self::set_return(name, 2, DESERIALIZED_KEY),
                ]
            }
            Archetype::ApiCallWithTransform => {
                let api_id = refs
                    .api_id
                    .as_deref()
                    .ok_or(CompileError::MissingInput("apiId"))?;
                let transform_id = refs
                    .transform_id
                    .as_deref()
                    .ok_or(CompileError::MissingInput("transformId"))?;
                // The transform already yields an object, so no
                // deserialize step follows
                vec![
                    Self::http_call(name, 0, api_id, Some(transform_id)),
                    Self::set_return(name, 1, TRANSFORMED_KEY),
                ]
            }
            Archetype::JsonToJson => {
                let transform_id = refs
                    .transform_id
                    .as_deref()
                    .ok_or(CompileError::MissingInput("transformId"))?;
                vec![
                    Self::data_transform(name, 0, transform_id),
                    Self::set_return(name, 1, TRANSFORMED_KEY),
                ]
            }
            Archetype::Hl7ToJson => {
                let transform_id = refs
                    .transform_id
                    .as_deref()
                    .ok_or(CompileError::MissingInput("transformId"))?;
                vec![
                    Self::hl7_transform(name, 0, transform_id),
                    Self::set_return(name, 1, TRANSFORMED_KEY),
                ]
            }
        };

        Self::verify_chain(&steps)?;

        let mut workflow = Workflow::new(
            format!("{name}-WF"),
            format!("{name}: {}", archetype.label()),
        );
        workflow.steps = steps;
        tracing::debug!(workflow_id = %workflow.workflow_id, steps = workflow.steps.len(), "chained workflow steps");
        Ok(workflow)
    }

    fn step_id(name: &str, sequence: u32) -> String {
        format!("{name}-step-{sequence}")
    }

    fn http_call(name: &str, sequence: u32, api_id: &str, transform_id: Option<&str>) -> WorkflowStep {
        let mut step = WorkflowStep::new(Self::step_id(name, sequence), "Call API", StepType::HttpCall, sequence)
            .with_input("apiId", api_id)
            .with_output(RAW_RESPONSE_KEY, RESPONSE_DATA);
        if let Some(transform_id) = transform_id {
            step = step
                .with_input("transformId", transform_id)
                .with_output(TRANSFORMED_KEY, TRANSFORMED_DATA);
        }
        step
    }

    fn deserialize(name: &str, sequence: u32) -> WorkflowStep {
        WorkflowStep::new(
            Self::step_id(name, sequence),
            "Deserialize Response",
            StepType::DeserializeObject,
            sequence,
        )
        .with_input("data", RAW_RESPONSE_KEY)
        .with_output(DESERIALIZED_KEY, OUTPUT_OBJECT)
    }

    fn data_transform(name: &str, sequence: u32, transform_id: &str) -> WorkflowStep {
        WorkflowStep::new(
            Self::step_id(name, sequence),
            "Transform Data",
            StepType::DataTransform,
            sequence,
        )
        .with_input("transformDataInput", "Body")
        .with_input("transformId", transform_id)
        .with_output(TRANSFORMED_KEY, TRANSFORMED_DATA)
    }

    fn hl7_transform(name: &str, sequence: u32, transform_id: &str) -> WorkflowStep {
        WorkflowStep::new(
            Self::step_id(name, sequence),
            "Transform HL7 Message",
            StepType::Hl7Transform,
            sequence,
        )
        .with_input("consistentArray", "true")
        .with_input("transformDataInput", "$Body")
        .with_input("transformId", transform_id)
        .with_output(TRANSFORMED_KEY, TRANSFORMED_DATA)
    }

    fn set_return(name: &str, sequence: u32, source_key: &str) -> WorkflowStep {
        WorkflowStep::new(
            Self::step_id(name, sequence),
            "Return Data",
            StepType::SetReturnData,
            sequence,
        )
        .with_input(RETURN_LABEL, source_key)
    }

    /// Verify the chaining contract over an assembled step list:
    /// contiguous 0-based sequences, fixed output values per step type,
    /// and every later step referencing an earlier output key, never an
    /// output value.
    pub fn verify_chain(steps: &[WorkflowStep]) -> Result<()> {
        for (index, step) in steps.iter().enumerate() {
            if step.sequence != index as u32 {
                return Err(CompileError::ChainViolation(format!(
                    "step '{}' has sequence {} at position {index}",
                    step.workflow_step_id, step.sequence
                )));
            }
            Self::verify_output_values(step)?;
        }

        let mut earlier_keys: BTreeSet<&str> = BTreeSet::new();
        let mut earlier_values: BTreeSet<&str> = BTreeSet::new();

        for (index, step) in steps.iter().enumerate() {
            if index > 0 {
                let references_key = step
                    .input
                    .values()
                    .any(|value| earlier_keys.contains(value.as_str()));
                if !references_key {
                    return Err(CompileError::ChainViolation(format!(
                        "step '{}' references no output key of an earlier step",
                        step.workflow_step_id
                    )));
                }

                for value in step.input.values() {
                    if earlier_values.contains(value.as_str()) && !earlier_keys.contains(value.as_str()) {
                        return Err(CompileError::ChainViolation(format!(
                            "step '{}' references output value '{value}' instead of its key",
                            step.workflow_step_id
                        )));
                    }
                }
            }

            earlier_keys.extend(step.output.keys().map(String::as_str));
            earlier_values.extend(step.output.values().map(String::as_str));
        }

        Ok(())
    }

    fn verify_output_values(step: &WorkflowStep) -> Result<()> {
        let violation = |reason: String| Err(CompileError::ChainViolation(reason));

        match step.step_type {
            StepType::HttpCall => {
                if step.output.get(RAW_RESPONSE_KEY).map(String::as_str) != Some(RESPONSE_DATA) {
                    return violation(format!(
                        "HttpCallStep '{}' must publish {RAW_RESPONSE_KEY} as \"{RESPONSE_DATA}\"",
                        step.workflow_step_id
                    ));
                }
                let has_transform = step.input.contains_key("transformId");
                let transform_output = step.output.get(TRANSFORMED_KEY).map(String::as_str);
                match (has_transform, transform_output) {
                    (true, Some(TRANSFORMED_DATA)) => {}
                    (false, None) => {}
                    _ => {
                        return violation(format!(
                            "HttpCallStep '{}' transform output must be \"{TRANSFORMED_DATA}\" exactly when transformId is set",
                            step.workflow_step_id
                        ));
                    }
                }
                let expected_len = if has_transform { 2 } else { 1 };
                if step.output.len() != expected_len {
                    return violation(format!(
                        "HttpCallStep '{}' publishes unexpected outputs",
                        step.workflow_step_id
                    ));
                }
            }
            StepType::DeserializeObject => {
                if step.output.len() != 1
                    || !step.output.values().all(|value| value == OUTPUT_OBJECT)
                {
                    return violation(format!(
                        "DeserializeObjectStep '{}' must publish exactly one output valued \"{OUTPUT_OBJECT}\"",
                        step.workflow_step_id
                    ));
                }
            }
            StepType::DataTransform | StepType::Hl7Transform => {
                if step.output.len() != 1
                    || !step.output.values().all(|value| value == TRANSFORMED_DATA)
                {
                    return violation(format!(
                        "{} '{}' must publish exactly one output valued \"{TRANSFORMED_DATA}\"",
                        step.step_type, step.workflow_step_id
                    ));
                }
            }
            StepType::SetReturnData => {
                if !step.output.is_empty() {
                    return violation(format!(
                        "SetReturnDataStep '{}' must publish no outputs",
                        step.workflow_step_id
                    ));
                }
            }
        }

        Ok(())
    }
}
