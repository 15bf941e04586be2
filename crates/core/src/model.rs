use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Opaque handle naming one remote execution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RunId(String);

impl RunId {
    /// Wraps a non-empty identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, ModelError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ModelError::EmptyRunId);
        }
        Ok(Self(id))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RunId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RunId> for String {
    fn from(value: RunId) -> Self {
        value.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One reported status snapshot of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    /// Raw status label as reported by the service.
    pub status: String,
    /// Human readable message accompanying the status.
    #[serde(default)]
    pub status_cause: String,
    /// Whether the run passed.
    pub success: bool,
    /// Start time (epoch ms), once known.
    #[serde(default)]
    pub start_time: Option<i64>,
    /// Stop time (epoch ms), once known.
    #[serde(default)]
    pub stop_time: Option<i64>,
    /// Links to plan/journey output, if any.
    #[serde(default)]
    pub output_refs: Vec<String>,
}

impl ExecutionSummary {
    /// Classifies the raw status label.
    pub fn run_status(&self) -> RunStatus {
        RunStatus::parse(&self.status)
    }

    /// True once no further state change is expected.
    pub fn is_terminal(&self) -> bool {
        self.run_status().is_terminal()
    }
}

/// Step-level detail of a run as of the latest poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Summaries in reporting order.
    #[serde(default)]
    pub executions: Vec<ExecutionSummary>,
}

impl ExecutionResult {
    /// Builds a result from summaries in reporting order.
    pub fn new(executions: Vec<ExecutionSummary>) -> Self {
        Self { executions }
    }

    /// The most recently reported summary.
    pub fn latest(&self) -> Option<&ExecutionSummary> {
        self.executions.last()
    }

    /// True when the service reported no summaries at all.
    pub fn is_empty(&self) -> bool {
        self.executions.is_empty()
    }
}

/// Status vocabulary.
///
/// Only terminal labels are enumerated. Any other label, including ones the
/// service adds later, is carried verbatim in [`RunStatus::InProgress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// `completed`
    Completed,
    /// `succeeded`
    Succeeded,
    /// `failed`
    Failed,
    /// `terminated`
    Terminated,
    /// Anything else (queued, scheduling, running, ...).
    InProgress(String),
}

impl RunStatus {
    /// Parses a status label. Matching is trimmed and case-insensitive.
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "completed" => Self::Completed,
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            "terminated" => Self::Terminated,
            _ => Self::InProgress(trimmed.to_string()),
        }
    }

    /// True for the closed set of terminal labels.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress(_))
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed => f.write_str("failed"),
            Self::Terminated => f.write_str("terminated"),
            Self::InProgress(label) => f.write_str(label),
        }
    }
}

/// Caller supplied switches that turn failing outcomes into a passing verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideFlags {
    /// Survive a run that finished with `success = false`.
    pub continue_on_plan_failure: bool,
    /// Survive trigger/poll infrastructure errors (and poll timeouts).
    pub continue_on_system_error: bool,
}
