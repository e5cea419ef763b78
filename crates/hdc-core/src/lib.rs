//! HDC Core - Core types for the HDC workflow configuration compiler
//!
//! This crate provides the fundamental types shared across the HDC ecosystem:
//! - Wire-exact document types (Workflow, API, Template, Data Transform,
//!   Application, Connection)
//! - Shared vocabulary (workflow archetypes, content types, request methods)
//! - The per-session document store keyed by document kind
//! - Error types

pub mod archetype;
pub mod content_type;
pub mod documents;
pub mod error;
pub mod store;

// Re-export commonly used types
pub use archetype::Archetype;
pub use content_type::ContentType;
pub use error::CoreError;
pub use store::{Document, DocumentKind, DocumentSet};
