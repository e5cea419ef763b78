//! Application and Connection document builder
//!
//! Pure document construction from connection facts; no network effects.
//! Both document ids derive from the platform and organization, and the
//! secret id populates both `clientSecretId` and `privateKeyName`.

use hdc_core::documents::{AppInfo, AppType, Application, Connection, Environment, Platform};
use std::collections::BTreeMap;

/// Facts collected for an Application and Connection pair
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionFacts {
    pub platform: Platform,
    pub organization: String,
    pub secret_id: String,
    pub client_id: String,
    pub app_type: AppType,
    pub scopes: Vec<String>,
    pub base_url: String,
    pub environment: Environment,
    pub token_endpoint: String,
}

pub struct ConnectionBuilder;

impl ConnectionBuilder {
    /// Build the Application and Connection documents
    pub fn build(facts: &ConnectionFacts) -> (Application, Connection) {
        let application_id = format!("{}-app-{}", facts.platform, facts.organization);
        let app_info = AppInfo::new(&facts.secret_id, &facts.client_id, facts.scopes.clone());

        let application = Application {
            application_id: application_id.clone(),
            name: application_id.clone(),
            app_type: facts.app_type,
            client_id: facts.client_id.clone(),
            client_secret_id: facts.secret_id.clone(),
            scopes: facts.scopes.clone(),
            app_info: app_info.clone(),
        };

        let mut applications = BTreeMap::new();
        applications.insert(application_id, app_info);

        let connection = Connection {
            connection_id: format!("{}-con-{}", facts.platform, facts.organization),
            base_url: facts.base_url.clone(),
            env: facts.environment,
            token_end_point: facts.token_endpoint.clone(),
            platform: facts.platform,
            applications,
        };

        (application, connection)
    }
}
