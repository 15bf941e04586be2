use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Infrastructure or API level failure while talking to the deployment service.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SystemError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl SystemError {
    /// Creates an error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error wrapping an underlying cause.
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human readable message, without the source chain.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Invalid model values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A run identifier must be non-empty.
    #[error("run identifier must not be empty")]
    EmptyRunId,
}

/// Invalid deployment configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required identifier was missing or blank.
    #[error("{field} must not be empty")]
    MissingField {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A polling duration was zero.
    #[error("polling.{field} must be greater than zero")]
    ZeroDuration {
        /// Name of the offending field.
        field: &'static str,
    },
}
