//! Per-session document store
//!
//! Generated documents live in an in-memory set keyed by document kind.
//! Inserting a kind that is already present supersedes it; documents are
//! never merged.

use crate::documents::{ApiConfig, Application, Connection, DataTransform, Template, Workflow};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Kind of generated document
///
/// Variant order is the deployment dependency order, so ordered
/// iteration over a keyed map yields documents in the order the
/// deployer must post them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DocumentKind {
    Application,
    Connection,
    Template,
    Api,
    Transform,
    Workflow,
}

impl DocumentKind {
    /// All kinds, in deployment dependency order
    pub const DEPLOY_ORDER: [DocumentKind; 6] = [
        DocumentKind::Application,
        DocumentKind::Connection,
        DocumentKind::Template,
        DocumentKind::Api,
        DocumentKind::Transform,
        DocumentKind::Workflow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Application => "application",
            DocumentKind::Connection => "connection",
            DocumentKind::Template => "template",
            DocumentKind::Api => "api",
            DocumentKind::Transform => "transform",
            DocumentKind::Workflow => "workflow",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated document of any kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Application(Application),
    Connection(Connection),
    Template(Template),
    Api(ApiConfig),
    Transform(DataTransform),
    Workflow(Workflow),
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Application(_) => DocumentKind::Application,
            Document::Connection(_) => DocumentKind::Connection,
            Document::Template(_) => DocumentKind::Template,
            Document::Api(_) => DocumentKind::Api,
            Document::Transform(_) => DocumentKind::Transform,
            Document::Workflow(_) => DocumentKind::Workflow,
        }
    }
}

impl From<Application> for Document {
    fn from(doc: Application) -> Self {
        Document::Application(doc)
    }
}

impl From<Connection> for Document {
    fn from(doc: Connection) -> Self {
        Document::Connection(doc)
    }
}

impl From<Template> for Document {
    fn from(doc: Template) -> Self {
        Document::Template(doc)
    }
}

impl From<ApiConfig> for Document {
    fn from(doc: ApiConfig) -> Self {
        Document::Api(doc)
    }
}

impl From<DataTransform> for Document {
    fn from(doc: DataTransform) -> Self {
        Document::Transform(doc)
    }
}

impl From<Workflow> for Document {
    fn from(doc: Workflow) -> Self {
        Document::Workflow(doc)
    }
}

/// The set of documents generated for one workflow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSet {
    documents: BTreeMap<DocumentKind, Document>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, superseding any previous document of the
    /// same kind
    pub fn insert(&mut self, document: impl Into<Document>) -> Option<Document> {
        let document = document.into();
        self.documents.insert(document.kind(), document)
    }

    pub fn get(&self, kind: DocumentKind) -> Option<&Document> {
        self.documents.get(&kind)
    }

    pub fn contains(&self, kind: DocumentKind) -> bool {
        self.documents.contains_key(&kind)
    }

    /// Iterate documents in deployment dependency order
    pub fn iter(&self) -> impl Iterator<Item = (DocumentKind, &Document)> {
        self.documents.iter().map(|(k, d)| (*k, d))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{EscapeMode, RequestMethod};

    #[test]
    fn test_kind_order_is_deploy_order() {
        let mut sorted = DocumentKind::DEPLOY_ORDER.to_vec();
        sorted.sort();
        assert_eq!(sorted, DocumentKind::DEPLOY_ORDER.to_vec());
    }

    #[test]
    fn test_insert_supersedes() {
        let mut set = DocumentSet::new();
        set.insert(Template::new("Old-Tem", "", EscapeMode::Json, false));
        let previous = set.insert(Template::new("New-Tem", "", EscapeMode::Json, false));

        assert!(previous.is_some());
        assert_eq!(set.len(), 1);
        match set.get(DocumentKind::Template) {
            Some(Document::Template(t)) => assert_eq!(t.template_id, "New-Tem"),
            other => panic!("Expected template, got {:?}", other),
        }
    }

    #[test]
    fn test_iteration_follows_deploy_order() {
        let mut set = DocumentSet::new();
        set.insert(Workflow::new("Demo-WF", "demo"));
        set.insert(ApiConfig::new("Demo-API", "Demo API", RequestMethod::Get));
        set.insert(Template::new("Demo-Tem", "", EscapeMode::Json, false));

        let kinds: Vec<DocumentKind> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![DocumentKind::Template, DocumentKind::Api, DocumentKind::Workflow]
        );
    }
}
