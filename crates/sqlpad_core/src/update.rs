use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::AppStarted => vec![Effect::ProbeBackend],
        Msg::InputChanged(text) => {
            state.set_query(text);
            Vec::new()
        }
        Msg::SubmitClicked => {
            // Empty queries are submitted as-is; the backend decides what they mean.
            let sql = state.query().to_string();
            let (submission_id, superseded) = state.begin_submission();
            let mut effects = Vec::with_capacity(2);
            if let Some(previous) = superseded {
                effects.push(Effect::CancelSubmission {
                    submission_id: previous,
                });
            }
            effects.push(Effect::SubmitQuery { submission_id, sql });
            effects
        }
        Msg::SubmissionCompleted {
            submission_id,
            outcome,
        } => {
            // Stale completions leave the state untouched.
            state.complete_submission(submission_id, outcome);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
