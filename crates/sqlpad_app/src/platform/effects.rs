use std::sync::mpsc;
use std::thread;

use sqlpad_core::{Effect, Msg, SubmitOutcome};
use sqlpad_engine::{
    EngineEvent, EngineEvents, EngineHandle, FailureKind, RequestError, ResponseBody,
};
use sqlpad_logging::{sqlpad_debug, sqlpad_error, sqlpad_info, sqlpad_warn};

use super::app::AppEvent;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, event_tx: mpsc::Sender<AppEvent>) -> Self {
        let runner = Self { engine };
        runner.spawn_event_loop(event_tx);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitQuery { submission_id, sql } => {
                    sqlpad_info!(
                        "SubmitQuery submission_id={} sql_len={}",
                        submission_id,
                        sql.len()
                    );
                    self.engine.submit(submission_id, sql);
                }
                Effect::CancelSubmission { submission_id } => {
                    sqlpad_info!("CancelSubmission submission_id={}", submission_id);
                    self.engine.cancel(submission_id);
                }
                Effect::ProbeBackend => {
                    self.engine.probe();
                }
            }
        }
    }

    /// Forwards engine completions as messages until either side goes away.
    fn spawn_event_loop(&self, event_tx: mpsc::Sender<AppEvent>) {
        let events: EngineEvents = self.engine.events();
        thread::spawn(move || {
            while let Some(event) = events.recv() {
                let msg = match event {
                    EngineEvent::SubmissionCompleted {
                        submission_id,
                        result,
                    } => Msg::SubmissionCompleted {
                        submission_id,
                        outcome: to_outcome(submission_id, result),
                    },
                    EngineEvent::ProbeCompleted { result } => {
                        log_probe(result);
                        continue;
                    }
                };
                if event_tx.send(AppEvent::Msg(msg)).is_err() {
                    break;
                }
            }
        });
    }
}

pub(crate) fn to_outcome(
    submission_id: u64,
    result: Result<ResponseBody, RequestError>,
) -> SubmitOutcome {
    match result {
        Ok(body) => {
            sqlpad_info!(
                "Submission {} succeeded: status={} bytes={} content_type={:?}",
                submission_id,
                body.status,
                body.byte_len,
                body.content_type
            );
            SubmitOutcome::Success { body: body.text }
        }
        Err(err) if err.kind == FailureKind::Cancelled => {
            sqlpad_debug!("Submission {} cancelled: {}", submission_id, err.message);
            SubmitOutcome::Failed
        }
        Err(err) => {
            sqlpad_error!("Submission {} failed: {}", submission_id, err);
            SubmitOutcome::Failed
        }
    }
}

fn log_probe(result: Result<ResponseBody, RequestError>) {
    match result {
        Ok(body) => sqlpad_debug!("Probe response (status {}): {}", body.status, body.text),
        Err(err) => sqlpad_warn!("Probe failed: {}", err),
    }
}
