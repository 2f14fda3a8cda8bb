use api::ApiError;
use quiz_core::model::ExamSubmission;

/// What started a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    /// The learner pressed submit (or confirmed the prompt).
    Manual,
    /// The countdown reached zero.
    Timeout,
}

/// Lifecycle of a loaded exam session.
///
/// Loading happens before an `ExamSession` exists; see `ExamSessionService::start_session`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    InProgress,
    /// Submit was requested with unanswered questions; waiting for confirm or cancel.
    ConfirmationPending { unanswered: usize },
    Submitting { trigger: SubmitTrigger },
    Completed,
    /// The last submission failed. Input is accepted again and a retry is possible.
    Failed {
        trigger: SubmitTrigger,
        error: ApiError,
    },
}

impl SessionPhase {
    /// Navigation and selection are accepted.
    #[must_use]
    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::InProgress | Self::Failed { .. })
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Result of a local interaction (selection, navigation, prompt handling).
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// State changed.
    Applied,
    /// Allowed, but nothing changed (e.g. `go_next` on the last question).
    Unchanged,
    /// Not allowed in the current phase, or referred to an unknown question.
    Rejected,
}

impl Interaction {
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Answer to a submit request.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    /// The guard is now held; send this payload.
    Ready(ExamSubmission),
    /// Unanswered questions remain and force was not given.
    ConfirmationRequired { unanswered: usize },
    /// A submission is in flight or done, or the session is not accepting submits.
    Suppressed,
}

/// Result of one countdown tick.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is not running in this phase.
    Idle,
    Running { remaining_secs: u32 },
    /// Time ran out on this tick; carries the forced submit decision.
    Expired(SubmitDecision),
}
