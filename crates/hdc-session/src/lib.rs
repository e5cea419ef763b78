//! HDC Session - Conversation state machine
//!
//! Tracks, per conversation, which workflow archetype and platform were
//! selected and which required facts have been collected, and gates
//! generation until every required fact for the active archetype is
//! present. A session exclusively owns its state; one synchronous pass
//! per conversation turn, no sharing across conversations.

pub mod error;
pub mod facts;
pub mod session;

pub use error::{Result, SessionError};
pub use facts::{FactKind, FactSet};
pub use session::{SessionState, WorkflowSession};
