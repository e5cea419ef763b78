//! HDC Deploy - Remote deployment boundary
//!
//! Posts generated documents to the remote configuration service in a
//! fixed dependency order and reports per-document success or failure.
//! Nothing raises past this boundary: a failed post is data in the
//! report, and later document kinds are still attempted.

pub mod config;
pub mod deployer;
pub mod error;

pub use config::DeployConfig;
pub use deployer::{DeployOutcome, DeployReport, Deployer, HttpDeployer, MockDeployer};
pub use error::{DeployError, Result};
