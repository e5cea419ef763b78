//! Application and Connection documents
//!
//! Both documents are platform-scoped and named by organization:
//! `{Platform}-app-{organization}` and `{Platform}-con-{organization}`.
//! The connection embeds the application's auth fields keyed by the
//! application id, and the secret id populates both `clientSecretId`
//! and `privateKeyName`.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Supported connection platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Athena,
    Cerner,
}

impl Platform {
    /// Parse a platform name, case-insensitively. Anything other than
    /// the two supported platforms is an error.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_lowercase().as_str() {
            "athena" => Ok(Platform::Athena),
            "cerner" => Ok(Platform::Cerner),
            _ => Err(CoreError::UnknownPlatform(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Platform::Athena => "Athena",
            Platform::Cerner => "Cerner",
        };
        f.write_str(s)
    }
}

/// Application launch type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppType {
    Backend,
    ProviderLaunch,
    PatientLaunch,
}

impl AppType {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_lowercase().as_str() {
            "backend" => Ok(AppType::Backend),
            "providerlaunch" => Ok(AppType::ProviderLaunch),
            "patientlaunch" => Ok(AppType::PatientLaunch),
            _ => Err(CoreError::UnknownAppType(s.trim().to_string())),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Dev,
    Test,
    Stage,
    Prod,
}

impl Environment {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "test" => Ok(Environment::Test),
            "stage" => Ok(Environment::Stage),
            "prod" => Ok(Environment::Prod),
            _ => Err(CoreError::UnknownEnvironment(s.trim().to_string())),
        }
    }
}

/// Auth fields shared between the application document and the
/// connection's `applications` map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub private_key_name: String,
    pub basic_auth_user_name_key: String,
    pub auth_success_workflow_id: String,
    pub auth_failure_workflow_id: String,
    pub client_id: String,
    pub is_jku_o_auth: bool,
    pub key_container_id: String,
    pub scopes: Vec<String>,
    pub launch_parameters: BTreeMap<String, String>,
}

impl AppInfo {
    /// Build the auth block from the connection facts. The secret id
    /// becomes `privateKeyName` here and `clientSecretId` on the
    /// application document.
    pub fn new(secret_id: impl Into<String>, client_id: impl Into<String>, scopes: Vec<String>) -> Self {
        Self {
            private_key_name: secret_id.into(),
            basic_auth_user_name_key: String::new(),
            auth_success_workflow_id: String::new(),
            auth_failure_workflow_id: String::new(),
            client_id: client_id.into(),
            is_jku_o_auth: false,
            key_container_id: String::new(),
            scopes,
            launch_parameters: BTreeMap::new(),
        }
    }
}

/// Application document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
    pub name: String,
    pub app_type: AppType,
    pub client_id: String,
    pub client_secret_id: String,
    pub scopes: Vec<String>,
    pub app_info: AppInfo,
}

/// Connection document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub connection_id: String,
    pub base_url: String,
    pub env: Environment,
    pub token_end_point: String,
    #[serde(rename = "type")]
    pub platform: Platform,
    pub applications: BTreeMap<String, AppInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse() {
        assert_eq!(Platform::parse("athena").unwrap(), Platform::Athena);
        assert_eq!(Platform::parse("Cerner").unwrap(), Platform::Cerner);
        assert!(Platform::parse("Epic").is_err());
    }

    #[test]
    fn test_app_info_wire_names() {
        let info = AppInfo::new("secret-1", "client-1", vec!["system/Patient.read".to_string()]);
        let json = serde_json::to_value(&info).unwrap();

        assert_eq!(json["privateKeyName"], "secret-1");
        assert_eq!(json["basicAuthUserNameKey"], "");
        assert_eq!(json["isJkuOAuth"], false);
        assert_eq!(json["keyContainerId"], "");
        assert_eq!(json["scopes"][0], "system/Patient.read");
        assert!(json["launchParameters"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_connection_type_field() {
        let con = Connection {
            connection_id: "Athena-con-acme".to_string(),
            base_url: "https://api.example.com".to_string(),
            env: Environment::Dev,
            token_end_point: "https://api.example.com/oauth2/v1/token".to_string(),
            platform: Platform::Athena,
            applications: BTreeMap::new(),
        };

        let json = serde_json::to_value(&con).unwrap();
        assert_eq!(json["connectionId"], "Athena-con-acme");
        assert_eq!(json["type"], "Athena");
        assert_eq!(json["tokenEndPoint"], "https://api.example.com/oauth2/v1/token");
        assert_eq!(json["env"], "Dev");
    }
}
