//! In-process backend for tests; nothing here opens a socket.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use sqlpad_engine::{BackendClient, EngineHandle, FailureKind, RequestError, ResponseBody};

use super::app::AppEvent;
use super::effects::EffectRunner;

#[derive(Clone)]
pub struct StubClient {
    reply: Result<String, FailureKind>,
    todo_calls: Arc<AtomicUsize>,
}

impl StubClient {
    pub fn replying(body: &str) -> Self {
        Self {
            reply: Ok(body.to_string()),
            todo_calls: Arc::default(),
        }
    }

    pub fn failing(kind: FailureKind) -> Self {
        Self {
            reply: Err(kind),
            todo_calls: Arc::default(),
        }
    }

    pub fn wait_for_todo_calls(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.todo_calls.load(Ordering::SeqCst) >= count {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    fn respond(&self) -> Result<ResponseBody, RequestError> {
        match &self.reply {
            Ok(text) => Ok(ResponseBody {
                status: 200,
                content_type: Some("text/plain".to_string()),
                text: text.clone(),
                byte_len: text.len() as u64,
            }),
            Err(kind) => Err(RequestError {
                kind: kind.clone(),
                message: "stubbed failure".to_string(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl BackendClient for StubClient {
    async fn submit_query(&self, _sql: &str) -> Result<ResponseBody, RequestError> {
        self.respond()
    }

    async fn probe(&self) -> Result<ResponseBody, RequestError> {
        self.todo_calls.fetch_add(1, Ordering::SeqCst);
        self.respond()
    }
}

pub fn engine_with_stub(client: StubClient) -> EngineHandle {
    EngineHandle::with_client(Arc::new(client)).expect("engine")
}

pub fn runner_with_stub(client: StubClient) -> (EffectRunner, mpsc::Receiver<AppEvent>) {
    let (event_tx, event_rx) = mpsc::channel();
    (EffectRunner::new(engine_with_stub(client), event_tx), event_rx)
}
