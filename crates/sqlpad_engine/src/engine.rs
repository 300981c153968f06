use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use sqlpad_logging::{sqlpad_debug, sqlpad_info};
use tokio_util::sync::CancellationToken;

use crate::client::{BackendClient, ClientSettings, ReqwestBackendClient};
use crate::{EngineEvent, FailureKind, RequestError, SubmissionId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build backend client: {0}")]
    Client(#[from] RequestError),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Submit {
        submission_id: SubmissionId,
        sql: String,
    },
    Cancel {
        submission_id: SubmissionId,
    },
    Probe,
}

type InFlight = Arc<Mutex<HashMap<SubmissionId, CancellationToken>>>;

/// Runs backend requests on a dedicated thread and reports completions.
///
/// Commands are processed in the order they are sent. Dropping the handle
/// stops the engine thread and aborts whatever is still in flight.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    events: EngineEvents,
}

/// Receiving side of an engine. Holding it does not keep the engine alive.
#[derive(Clone)]
pub struct EngineEvents {
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineEvents {
    /// Blocks for the next event; `None` once the engine has shut down.
    pub fn recv(&self) -> Option<EngineEvent> {
        lock(&self.event_rx).recv().ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        lock(&self.event_rx).try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        lock(&self.event_rx).recv_timeout(timeout).ok()
    }
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let client = ReqwestBackendClient::new(&settings)?;
        sqlpad_info!("Engine using parse endpoint {}", client.parse_url());
        Self::with_client(Arc::new(client))
    }

    pub fn with_client(client: Arc<dyn BackendClient>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("sqlpad-engine-worker")
            .build()?;

        thread::Builder::new()
            .name("sqlpad-engine".to_string())
            .spawn(move || {
                let in_flight: InFlight = Arc::default();
                while let Ok(command) = cmd_rx.recv() {
                    let client = client.clone();
                    let event_tx = event_tx.clone();
                    match command {
                        EngineCommand::Submit { submission_id, sql } => {
                            let token = CancellationToken::new();
                            lock(&in_flight).insert(submission_id, token.clone());
                            let in_flight = in_flight.clone();
                            runtime.spawn(async move {
                                let result = token
                                    .run_until_cancelled(client.submit_query(&sql))
                                    .await
                                    .unwrap_or_else(|| {
                                        Err(RequestError::new(
                                            FailureKind::Cancelled,
                                            "superseded by a newer submission",
                                        ))
                                    });
                                lock(&in_flight).remove(&submission_id);
                                let _ = event_tx.send(EngineEvent::SubmissionCompleted {
                                    submission_id,
                                    result,
                                });
                            });
                        }
                        EngineCommand::Cancel { submission_id } => {
                            if let Some(token) = lock(&in_flight).remove(&submission_id) {
                                sqlpad_debug!("Cancelling submission {}", submission_id);
                                token.cancel();
                            }
                        }
                        EngineCommand::Probe => {
                            runtime.spawn(async move {
                                let result = client.probe().await;
                                let _ = event_tx.send(EngineEvent::ProbeCompleted { result });
                            });
                        }
                    }
                }
                sqlpad_debug!("Engine command channel closed; shutting down");
            })?;

        Ok(Self {
            cmd_tx,
            events: EngineEvents {
                event_rx: Arc::new(Mutex::new(event_rx)),
            },
        })
    }

    pub fn submit(&self, submission_id: SubmissionId, sql: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            submission_id,
            sql: sql.into(),
        });
    }

    /// Aborts an in-flight submission; unknown or finished ids are ignored.
    pub fn cancel(&self, submission_id: SubmissionId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { submission_id });
    }

    pub fn probe(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Probe);
    }

    pub fn events(&self) -> EngineEvents {
        self.events.clone()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.events.try_recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.events.recv_timeout(timeout)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
