//! Wire-exact document types
//!
//! Every struct here serializes to the exact field names the remote
//! configuration service expects. Maps that reach the wire are
//! `BTreeMap` so regenerating a document from the same facts is
//! byte-identical.

pub mod api;
pub mod connection;
pub mod template;
pub mod transform;
pub mod workflow;

pub use api::{ApiConfig, PathSegment, QueryParameter, RequestMethod, SegmentKind};
pub use connection::{AppInfo, AppType, Application, Connection, Environment, Platform};
pub use template::{EscapeMode, Template};
pub use transform::{
    DataTransform, DateFormat, FormatType, PropertyGroup, StringFormat, TransformProperty,
    ValueSource,
};
pub use workflow::{Redirect, StepType, Workflow, WorkflowStep};
