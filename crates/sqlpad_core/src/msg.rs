#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Front-end finished its initial setup.
    AppStarted,
    /// User edited the query input (full text after the edit).
    InputChanged(String),
    /// User asked for the current query to be parsed.
    SubmitClicked,
    /// Engine finished a request started by `Effect::SubmitQuery`.
    SubmissionCompleted {
        submission_id: crate::SubmissionId,
        outcome: SubmitOutcome,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}

/// What the user gets to see from a finished request.
///
/// Failure details never reach the core; the engine logs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Success { body: String },
    Failed,
}
