//! Deployment configuration

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_timeout_secs() -> u64 {
    30
}

/// Configuration for the remote configuration service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Base URL of the configuration service
    pub base_url: String,

    /// Optional API key, sent as a Bearer token
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl DeployConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}
