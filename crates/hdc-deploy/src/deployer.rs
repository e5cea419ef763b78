//! Document deployment
//!
//! Documents post in the fixed dependency order: application ->
//! connection -> template -> api -> transform -> workflow. A missing
//! kind is skipped. Every deploy call is independent: a non-2xx
//! response or transport failure marks that document failed and later
//! kinds are still attempted. No retries here; retry policy belongs to
//! the caller.

use crate::config::DeployConfig;
use crate::error::{DeployError, Result};
use async_trait::async_trait;
use hdc_core::{DocumentKind, DocumentSet};
use reqwest::Client;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};

/// Result of deploying one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub success: bool,
    pub detail: String,
}

impl DeployOutcome {
    fn ok(detail: impl Into<String>) -> Self {
        Self {
            success: true,
            detail: detail.into(),
        }
    }

    fn failed(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            detail: detail.into(),
        }
    }
}

/// Per-kind deployment report, iterating in deployment order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    outcomes: BTreeMap<DocumentKind, DeployOutcome>,
}

impl DeployReport {
    pub fn record(&mut self, kind: DocumentKind, outcome: DeployOutcome) {
        self.outcomes.insert(kind, outcome);
    }

    pub fn get(&self, kind: DocumentKind) -> Option<&DeployOutcome> {
        self.outcomes.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocumentKind, &DeployOutcome)> {
        self.outcomes.iter().map(|(k, o)| (*k, o))
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.values().all(|outcome| outcome.success)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Deployment boundary
#[async_trait]
pub trait Deployer: Send + Sync {
    /// Deploy every document in the set, in dependency order
    async fn deploy(&self, documents: &DocumentSet) -> DeployReport;
}

/// HTTP deployer posting each document to the configuration service
pub struct HttpDeployer {
    client: Client,
    config: DeployConfig,
}

impl HttpDeployer {
    pub fn new(config: DeployConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DeployError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, kind: DocumentKind) -> String {
        let segment = match kind {
            DocumentKind::Application => "applications",
            DocumentKind::Connection => "connections",
            DocumentKind::Template => "templates",
            DocumentKind::Api => "apis",
            DocumentKind::Transform => "transforms",
            DocumentKind::Workflow => "workflows",
        };
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), segment)
    }

    async fn post(&self, kind: DocumentKind, document: &hdc_core::Document) -> DeployOutcome {
        let url = self.endpoint(kind);
        let mut request = self.client.post(&url).json(document);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                if status.is_success() {
                    info!(kind = %kind, %status, "deployed document");
                    DeployOutcome::ok(format!("{status}"))
                } else {
                    warn!(kind = %kind, %status, "deployment rejected");
                    DeployOutcome::failed(body)
                }
            }
            Err(e) => {
                warn!(kind = %kind, error = %e, "deployment transport failure");
                DeployOutcome::failed(e.to_string())
            }
        }
    }
}

#[async_trait]
impl Deployer for HttpDeployer {
    async fn deploy(&self, documents: &DocumentSet) -> DeployReport {
        let mut report = DeployReport::default();
        for kind in DocumentKind::DEPLOY_ORDER {
            // A missing kind is simply skipped, not an error
            let Some(document) = documents.get(kind) else {
                continue;
            };
            let outcome = self.post(kind, document).await;
            report.record(kind, outcome);
        }
        report
    }
}

/// In-memory deployer for tests; records the order kinds were posted in
/// and can be told to fail specific kinds
#[derive(Default)]
pub struct MockDeployer {
    fail_kinds: Vec<DocumentKind>,
    calls: Mutex<Vec<DocumentKind>>,
}

impl MockDeployer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a kind as failing with a canned error body
    pub fn failing(mut self, kind: DocumentKind) -> Self {
        self.fail_kinds.push(kind);
        self
    }

    /// Kinds posted so far, in call order
    pub fn calls(&self) -> Vec<DocumentKind> {
        self.calls.lock().expect("mock deployer lock").clone()
    }
}

#[async_trait]
impl Deployer for MockDeployer {
    async fn deploy(&self, documents: &DocumentSet) -> DeployReport {
        let mut report = DeployReport::default();
        for kind in DocumentKind::DEPLOY_ORDER {
            if documents.get(kind).is_none() {
                continue;
            }
            self.calls.lock().expect("mock deployer lock").push(kind);
            let outcome = if self.fail_kinds.contains(&kind) {
                DeployOutcome::failed("simulated failure")
            } else {
                DeployOutcome::ok("200 OK")
            };
            report.record(kind, outcome);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdc_core::documents::{ApiConfig, EscapeMode, RequestMethod, Template, Workflow};

    fn documents() -> DocumentSet {
        let mut set = DocumentSet::new();
        set.insert(Workflow::new("Demo-WF", "demo"));
        set.insert(Template::new("Demo-Tem", "a=%a%", EscapeMode::None, true));
        set.insert(ApiConfig::new("Demo-API", "Demo API", RequestMethod::Get));
        set
    }

    #[tokio::test]
    async fn test_deploy_order() {
        let deployer = MockDeployer::new();
        let report = deployer.deploy(&documents()).await;

        assert_eq!(report.len(), 3);
        assert!(report.all_succeeded());
        assert_eq!(
            deployer.calls(),
            vec![DocumentKind::Template, DocumentKind::Api, DocumentKind::Workflow]
        );
    }

    #[tokio::test]
    async fn test_missing_kinds_skipped() {
        let deployer = MockDeployer::new();
        let report = deployer.deploy(&documents()).await;

        assert!(report.get(DocumentKind::Application).is_none());
        assert!(report.get(DocumentKind::Connection).is_none());
        assert!(report.get(DocumentKind::Workflow).is_some());
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_kinds() {
        let deployer = MockDeployer::new().failing(DocumentKind::Api);
        let report = deployer.deploy(&documents()).await;

        assert!(!report.all_succeeded());
        assert!(!report.get(DocumentKind::Api).unwrap().success);
        assert_eq!(report.get(DocumentKind::Api).unwrap().detail, "simulated failure");

        // The workflow after the failed api was still attempted
        assert!(report.get(DocumentKind::Workflow).unwrap().success);
        assert_eq!(deployer.calls().last(), Some(&DocumentKind::Workflow));
    }

    #[tokio::test]
    async fn test_empty_set_empty_report() {
        let deployer = MockDeployer::new();
        let report = deployer.deploy(&DocumentSet::new()).await;
        assert!(report.is_empty());
        assert!(report.all_succeeded());
    }

    #[test]
    fn test_http_deployer_endpoints() {
        let deployer = HttpDeployer::new(DeployConfig::new("https://hdc.example.com/config/")).unwrap();
        assert_eq!(
            deployer.endpoint(DocumentKind::Workflow),
            "https://hdc.example.com/config/workflows"
        );
        assert_eq!(
            deployer.endpoint(DocumentKind::Api),
            "https://hdc.example.com/config/apis"
        );
    }
}
