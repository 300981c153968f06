use crate::view_model::{AppViewModel, FAILURE_TEXT};
use crate::SubmitOutcome;

pub type SubmissionId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    query: String,
    result: Option<String>,
    in_flight: Option<SubmissionId>,
    next_submission_id: SubmissionId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            query: String::new(),
            result: None,
            in_flight: None,
            next_submission_id: 1,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            query: self.query.clone(),
            result: self.result.clone(),
            awaiting_response: self.in_flight.is_some(),
            dirty: self.dirty,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn in_flight(&self) -> Option<SubmissionId> {
        self.in_flight
    }

    /// Returns whether the view changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_query(&mut self, text: String) {
        if self.query != text {
            self.query = text;
            self.dirty = true;
        }
    }

    /// Allocates the next id and makes it the in-flight submission.
    /// Returns the new id and the one it replaces, if any.
    pub(crate) fn begin_submission(&mut self) -> (SubmissionId, Option<SubmissionId>) {
        let id = self.next_submission_id;
        self.next_submission_id += 1;
        let previous = self.in_flight.replace(id);
        self.dirty = true;
        (id, previous)
    }

    /// Applies a completion; stale ids are ignored.
    pub(crate) fn complete_submission(
        &mut self,
        submission_id: SubmissionId,
        outcome: SubmitOutcome,
    ) {
        if self.in_flight != Some(submission_id) {
            return;
        }
        self.in_flight = None;
        self.result = Some(match outcome {
            SubmitOutcome::Success { body } => body,
            SubmitOutcome::Failed => FAILURE_TEXT.to_string(),
        });
        self.dirty = true;
    }
}
