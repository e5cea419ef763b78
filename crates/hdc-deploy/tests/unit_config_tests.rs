//! Deploy configuration loading tests

use hdc_deploy::{DeployConfig, DeployError, HttpDeployer};
use std::io::Write;

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "base_url: https://hdc.example.com/config").unwrap();
    writeln!(file, "api_key: file-key").unwrap();

    let config = DeployConfig::from_file(file.path()).unwrap();
    assert_eq!(config.base_url, "https://hdc.example.com/config");
    assert_eq!(config.api_key.as_deref(), Some("file-key"));
    assert_eq!(config.timeout_secs, 30);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = DeployConfig::from_file("/nonexistent/deploy.yaml").unwrap_err();
    assert!(matches!(err, DeployError::Io(_)));
}

#[test]
fn test_invalid_yaml_is_parse_error() {
    let err = DeployConfig::from_yaml("base_url: [unclosed").unwrap_err();
    assert!(matches!(err, DeployError::Yaml(_)));
}

#[test]
fn test_http_deployer_builds_from_config() {
    let config = DeployConfig::new("https://hdc.example.com/config");
    assert!(HttpDeployer::new(config).is_ok());
}
