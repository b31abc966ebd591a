//! In-memory record of structured thinking steps.

pub mod log;
pub mod step;

pub use log::{StepLog, EMPTY_SUMMARY};
pub use step::ThinkingStep;

use std::sync::{Arc, Mutex, OnceLock};

/// Step log shared between tools.
pub type SharedStepLog = Arc<Mutex<StepLog>>;

static SHARED_LOG: OnceLock<SharedStepLog> = OnceLock::new();

/// Process-wide step log.
///
/// Tools take a [`SharedStepLog`] explicitly; this is only the default
/// handle for callers that want one log per process.
pub fn shared_log() -> SharedStepLog {
    Arc::clone(SHARED_LOG.get_or_init(|| Arc::new(Mutex::new(StepLog::new()))))
}
