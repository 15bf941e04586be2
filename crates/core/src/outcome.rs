use crate::model::OverrideFlags;

/// How one orchestration invocation ended, before override flags apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Terminal status reached with `success = true`.
    Success,
    /// Terminal status reached with `success = false`.
    PlanFailure,
    /// Trigger or poll raised an infrastructure error.
    SystemErrored,
    /// The service reported no execution result for the run.
    NotFound,
    /// Polling exceeded its bound without a terminal status.
    TimedOut,
}

impl Outcome {
    /// Collapses the outcome and the override flags into the pass/fail verdict.
    ///
    /// A timeout counts as an infrastructure-level non-completion and shares the
    /// system error override. A missing result is never overridable.
    pub fn verdict(self, flags: OverrideFlags) -> bool {
        match self {
            Self::Success => true,
            Self::PlanFailure => flags.continue_on_plan_failure,
            Self::SystemErrored | Self::TimedOut => flags.continue_on_system_error,
            Self::NotFound => false,
        }
    }

    /// True when a failing outcome passed only because of an override flag.
    pub fn is_overridden(self, flags: OverrideFlags) -> bool {
        self != Self::Success && self.verdict(flags)
    }

    /// Short label for logs and progress output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::PlanFailure => "plan failure",
            Self::SystemErrored => "system error",
            Self::NotFound => "not found",
            Self::TimedOut => "timed out",
        }
    }
}
