#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Shared models and pure decision logic for the deploy gate.

pub mod backoff;
pub mod config;
pub mod error;
pub mod model;
pub mod outcome;
pub mod properties;

pub use backoff::poll_delay;
pub use config::{DeploymentConfig, PollingConfig};
pub use error::{ConfigError, ModelError, SystemError};
pub use model::{ExecutionResult, ExecutionSummary, OverrideFlags, RunId, RunStatus};
pub use outcome::Outcome;
pub use properties::DeploymentProperties;
