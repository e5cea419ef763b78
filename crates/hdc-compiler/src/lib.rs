//! HDC Compiler - Deterministic configuration generation
//!
//! This crate turns a validated set of user-supplied facts into the
//! document set describing an HDC workflow:
//! - `PathParser` splits an endpoint template into base path, typed path
//!   segments, and query parameters
//! - `ContentCodec` resolves the escaping/token policy for a content type
//! - `TemplateBuilder` renders request-body templates with `%token%`
//!   placeholders
//! - `TransformBuilder` builds data transforms, by structural sample
//!   diffing or from the fixed HL7 field-path table
//! - `StepChainer` assembles and verifies the workflow step chain
//! - `ConnectionBuilder` builds Application and Connection documents
//! - `WorkflowCompiler` is the facade that runs the whole pipeline and
//!   produces a `GeneratedBundle`

pub mod codec;
pub mod compiler;
pub mod connection;
pub mod error;
pub mod path;
pub mod payload;
pub mod steps;
pub mod template;
pub mod transform;

pub use codec::{Codec, ContentCodec};
pub use compiler::{GeneratedBundle, WorkflowCompiler, WorkflowFacts};
pub use connection::{ConnectionBuilder, ConnectionFacts};
pub use error::{CompileError, Result};
pub use path::{ParsedPath, PathParser};
pub use payload::PayloadParams;
pub use steps::{StepChainer, StepRefs};
pub use template::{FieldValue, TemplateBuilder, TemplateFields};
pub use transform::{BuiltTransform, Hl7Field, ResolutionWarning, TransformBuilder};
