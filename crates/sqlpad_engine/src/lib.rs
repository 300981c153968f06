//! sqlpad engine: HTTP calls to the parse backend and effect execution.
mod client;
mod decode;
mod engine;
mod types;

pub use client::{BackendClient, ClientSettings, ReqwestBackendClient};
pub use decode::{decode_body, DecodedBody};
pub use engine::{EngineError, EngineEvents, EngineHandle};
pub use types::{EngineEvent, FailureKind, RequestError, ResponseBody, SubmissionId};
