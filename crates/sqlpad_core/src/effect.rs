use crate::SubmissionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the query text to the parse endpoint.
    SubmitQuery { submission_id: SubmissionId, sql: String },
    /// Abort a request that has been superseded by a newer submission.
    CancelSubmission { submission_id: SubmissionId },
    /// Fire-and-forget reachability probe; the response is only logged.
    ProbeBackend,
}
