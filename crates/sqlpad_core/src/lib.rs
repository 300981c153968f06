//! sqlpad core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{Msg, SubmitOutcome};
pub use state::{AppState, SubmissionId};
pub use update::update;
pub use view_model::{AppViewModel, FAILURE_TEXT, NO_RESULT_TEXT};
