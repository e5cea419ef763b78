//! The per-conversation workflow session
//!
//! State machine:
//!
//! ```text
//! SelectingArchetype
//!   -> SelectingConnectionMode            (HTTP-call archetypes)
//!        -> CollectingConnectionFacts     (create new, Athena/Cerner)
//!        -> CollectingWorkflowFacts       (existing or manual setup)
//!   -> CollectingWorkflowFacts            (transform-only archetypes)
//! CollectingWorkflowFacts -> Ready -> Generated
//! ```
//!
//! The session is the gate that prevents premature generation: a
//! generation request with any required fact absent is rejected with the
//! name of the missing fact, never defaulted. A failed generation leaves
//! the stored documents from prior turns untouched.

use crate::error::{Result, SessionError};
use crate::facts::{FactKind, FactSet};
use hdc_compiler::{ConnectionFacts, ContentCodec, GeneratedBundle, WorkflowCompiler};
use hdc_core::documents::{Platform, RequestMethod};
use hdc_core::{Archetype, DocumentSet};
use serde_json::Value;
use tracing::{debug, info};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SelectingArchetype,
    SelectingConnectionMode,
    CollectingConnectionFacts,
    CollectingWorkflowFacts,
    Ready,
    Generated,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::SelectingArchetype => "selecting archetype",
            SessionState::SelectingConnectionMode => "selecting connection mode",
            SessionState::CollectingConnectionFacts => "collecting connection facts",
            SessionState::CollectingWorkflowFacts => "collecting workflow facts",
            SessionState::Ready => "ready",
            SessionState::Generated => "generated",
        }
    }
}

/// One conversation's session
#[derive(Debug)]
pub struct WorkflowSession {
    state: SessionState,
    archetype: Option<Archetype>,
    platform: Option<Platform>,
    facts: FactSet,
    documents: DocumentSet,
}

impl Default for WorkflowSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::SelectingArchetype,
            archetype: None,
            platform: None,
            facts: FactSet::default(),
            documents: DocumentSet::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn archetype(&self) -> Option<Archetype> {
        self.archetype
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    /// Documents from the last successful generation
    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    /// Select the workflow archetype. HTTP-call archetypes go through
    /// connection handling first; transform-only archetypes go straight
    /// to workflow facts.
    pub fn select_archetype(&mut self, archetype: Archetype) -> Result<()> {
        self.guard(SessionState::SelectingArchetype, "select an archetype")?;

        self.archetype = Some(archetype);
        self.transition(if archetype.needs_connection() {
            SessionState::SelectingConnectionMode
        } else {
            SessionState::CollectingWorkflowFacts
        });
        Ok(())
    }

    /// The user already has a Connection and Application configured;
    /// skip connection generation entirely.
    pub fn use_existing_connection(&mut self) -> Result<()> {
        self.guard(SessionState::SelectingConnectionMode, "reuse a connection")?;
        self.transition(SessionState::CollectingWorkflowFacts);
        Ok(())
    }

    /// Start creating a new connection for the named platform. Only
    /// Athena and Cerner can be generated; anything else is rejected
    /// with a manual-setup instruction and the session stays in
    /// connection-mode selection so the user can confirm manual setup.
    pub fn create_connection(&mut self, platform: &str) -> Result<()> {
        self.guard(SessionState::SelectingConnectionMode, "create a connection")?;

        let platform = Platform::parse(platform)
            .map_err(|_| SessionError::UnsupportedPlatform(platform.trim().to_string()))?;
        self.platform = Some(platform);
        self.transition(SessionState::CollectingConnectionFacts);
        Ok(())
    }

    /// The user created the Connection and Application manually for an
    /// unsupported platform; continue without generating them.
    pub fn confirm_manual_connection(&mut self) -> Result<()> {
        self.guard(SessionState::SelectingConnectionMode, "confirm manual setup")?;
        self.transition(SessionState::CollectingWorkflowFacts);
        Ok(())
    }

    /// Provide the connection facts collected in one block
    pub fn set_connection_facts(&mut self, facts: ConnectionFacts) -> Result<()> {
        self.guard(SessionState::CollectingConnectionFacts, "set connection facts")?;

        self.platform = Some(facts.platform);
        self.facts.connection = Some(facts);
        self.transition(SessionState::CollectingWorkflowFacts);
        Ok(())
    }

    pub fn set_workflow_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.guard_collecting("set the workflow name")?;
        self.facts.workflow_name = Some(name.into());
        self.refresh_readiness();
        Ok(())
    }

    pub fn set_method(&mut self, method: RequestMethod) -> Result<()> {
        self.guard_collecting("set the request method")?;
        self.facts.method = Some(method);
        self.refresh_readiness();
        Ok(())
    }

    pub fn set_path(&mut self, path: impl Into<String>) -> Result<()> {
        self.guard_collecting("set the endpoint path")?;
        self.facts.path = Some(path.into());
        self.refresh_readiness();
        Ok(())
    }

    /// Set an explicit request content type. Validated eagerly so an
    /// unsupported value surfaces on this turn, not at generation.
    pub fn set_content_type(&mut self, content_type: &str) -> Result<()> {
        self.guard_collecting("set the content type")?;
        ContentCodec::resolve(Some(content_type))?;
        self.facts.content_type = Some(content_type.trim().to_string());
        self.refresh_readiness();
        Ok(())
    }

    /// Set an explicit accept content type
    pub fn set_accept_content_type(&mut self, content_type: &str) -> Result<()> {
        self.guard_collecting("set the accept content type")?;
        ContentCodec::resolve(Some(content_type))?;
        self.facts.accept_content_type = Some(content_type.trim().to_string());
        self.refresh_readiness();
        Ok(())
    }

    pub fn set_body_sample(&mut self, sample: Value) -> Result<()> {
        self.guard_collecting("set the body sample")?;
        self.facts.body_sample = Some(sample);
        self.refresh_readiness();
        Ok(())
    }

    pub fn set_response_sample(&mut self, sample: Value) -> Result<()> {
        self.guard_collecting("set the response sample")?;
        self.facts.response_sample = Some(sample);
        self.refresh_readiness();
        Ok(())
    }

    pub fn set_desired_output(&mut self, sample: Value) -> Result<()> {
        self.guard_collecting("set the desired output")?;
        self.facts.desired_output = Some(sample);
        self.refresh_readiness();
        Ok(())
    }

    pub fn set_source_sample(&mut self, sample: Value) -> Result<()> {
        self.guard_collecting("set the source sample")?;
        self.facts.source_sample = Some(sample);
        self.refresh_readiness();
        Ok(())
    }

    pub fn set_hl7_sample(&mut self, message: impl Into<String>) -> Result<()> {
        self.guard_collecting("set the HL7 sample")?;
        self.facts.hl7_sample = Some(message.into());
        self.refresh_readiness();
        Ok(())
    }

    /// The facts still missing for the active archetype, in question
    /// order. Empty until an archetype is selected.
    pub fn missing_facts(&self) -> Vec<FactKind> {
        match self.archetype {
            Some(archetype) => self.facts.missing(archetype),
            None => Vec::new(),
        }
    }

    /// Generate the document set. Rejected with the first missing fact
    /// while facts are incomplete; a compiler failure leaves previously
    /// stored documents untouched.
    pub fn generate(&mut self) -> Result<GeneratedBundle> {
        match self.state() {
            SessionState::Ready | SessionState::Generated => {}
            SessionState::CollectingWorkflowFacts => {
                let missing = self.missing_facts();
                if let Some(first) = missing.into_iter().next() {
                    return Err(SessionError::MissingFact(first));
                }
                // Unreachable with complete facts; refresh keeps the
                // state current after every setter
            }
            _ => {
                return Err(SessionError::InvalidTransition {
                    state: self.state().name(),
                    action: "generate",
                });
            }
        }

        if let Some(first) = self.missing_facts().into_iter().next() {
            return Err(SessionError::MissingFact(first));
        }

        let archetype = self.archetype.ok_or(SessionError::InvalidTransition {
            state: self.state().name(),
            action: "generate",
        })?;

        let workflow_facts = self.facts.to_workflow_facts(archetype);
        let bundle = WorkflowCompiler::compile(&workflow_facts)?;

        // Supersede, never merge: the store only changes on success
        self.documents = bundle.documents.clone();
        self.transition(SessionState::Generated);
        info!(
            archetype = archetype.label(),
            documents = bundle.documents.len(),
            warnings = bundle.warnings.len(),
            "generated workflow documents"
        );
        Ok(bundle)
    }

    /// Explicit reset: back to archetype selection with all facts and
    /// stored documents cleared
    pub fn reset(&mut self) {
        debug!("session reset");
        *self = Self::new();
    }

    fn guard(&self, expected: SessionState, action: &'static str) -> Result<()> {
        if self.state() != expected {
            return Err(SessionError::InvalidTransition {
                state: self.state().name(),
                action,
            });
        }
        Ok(())
    }

    fn guard_collecting(&self, action: &'static str) -> Result<()> {
        match self.state() {
            SessionState::CollectingWorkflowFacts | SessionState::Ready | SessionState::Generated => Ok(()),
            _ => Err(SessionError::InvalidTransition {
                state: self.state().name(),
                action,
            }),
        }
    }

    /// After every fact change, move between CollectingWorkflowFacts and
    /// Ready; a change after generation drops back to Ready since the
    /// stored documents are stale.
    fn refresh_readiness(&mut self) {
        let complete = self.missing_facts().is_empty() && self.archetype.is_some();
        self.transition(if complete {
            SessionState::Ready
        } else {
            SessionState::CollectingWorkflowFacts
        });
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            debug!(from = self.state.name(), to = next.name(), "session transition");
            self.state = next;
        }
    }
}
