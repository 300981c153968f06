use pretty_assertions::assert_eq;
use sqlpad_core::{update, AppState, Effect, Msg, SubmitOutcome, FAILURE_TEXT};

fn init_logging() {
    sqlpad_logging::initialize_for_tests();
}

fn submit_query(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::SubmitClicked)
}

fn success(body: &str) -> SubmitOutcome {
    SubmitOutcome::Success {
        body: body.to_string(),
    }
}

#[test]
fn second_submit_cancels_the_first() {
    init_logging();
    let (state, _) = submit_query(AppState::new(), "SELECT a FROM t");
    let (state, effects) = submit_query(state, "SELECT b FROM t");

    assert_eq!(
        effects,
        vec![
            Effect::CancelSubmission { submission_id: 1 },
            Effect::SubmitQuery {
                submission_id: 2,
                sql: "SELECT b FROM t".to_string(),
            },
        ]
    );
    assert_eq!(state.in_flight(), Some(2));
}

#[test]
fn stale_completion_is_ignored() {
    init_logging();
    let (state, _) = submit_query(AppState::new(), "SELECT a FROM t");
    let (state, _) = submit_query(state, "SELECT b FROM t");

    // The superseded request resolves after the newer one was sent.
    let (mut state, _) = update(
        state,
        Msg::SubmissionCompleted {
            submission_id: 1,
            outcome: success("a"),
        },
    );
    assert!(state.consume_dirty());
    let view = state.view();
    assert_eq!(view.result, None);
    assert!(view.awaiting_response);

    let (state, _) = update(
        state,
        Msg::SubmissionCompleted {
            submission_id: 2,
            outcome: success("b"),
        },
    );
    assert_eq!(state.view().result_text(), "b");
    assert!(!state.view().awaiting_response);
}

#[test]
fn late_completion_after_newer_result_does_not_overwrite() {
    init_logging();
    let (state, _) = submit_query(AppState::new(), "SELECT a FROM t");
    let (state, _) = submit_query(state, "SELECT b FROM t");
    let (state, _) = update(
        state,
        Msg::SubmissionCompleted {
            submission_id: 2,
            outcome: SubmitOutcome::Failed,
        },
    );
    let mut state = state;
    assert!(state.consume_dirty());

    let (mut state, _) = update(
        state,
        Msg::SubmissionCompleted {
            submission_id: 1,
            outcome: success("a"),
        },
    );

    assert_eq!(state.view().result_text(), FAILURE_TEXT);
    assert!(!state.consume_dirty());
}

#[test]
fn submission_ids_keep_increasing_after_completion() {
    init_logging();
    let (state, _) = submit_query(AppState::new(), "q1");
    let (state, _) = update(
        state,
        Msg::SubmissionCompleted {
            submission_id: 1,
            outcome: success("r1"),
        },
    );

    let (state, effects) = submit_query(state, "q2");
    assert_eq!(
        effects,
        vec![Effect::SubmitQuery {
            submission_id: 2,
            sql: "q2".to_string(),
        }]
    );
    // Previous result stays visible while the new request is pending.
    assert_eq!(state.view().result_text(), "r1");
    assert!(state.view().awaiting_response);
}

#[test]
fn stale_completion_leaves_state_identical() {
    init_logging();
    let (state, _) = submit_query(AppState::new(), "q1");
    let (mut before, _) = submit_query(state, "q2");
    before.consume_dirty();

    let (after, effects) = update(
        before.clone(),
        Msg::SubmissionCompleted {
            submission_id: 1,
            outcome: success("late"),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(after, before);
}
