//! Run orchestration engine.

pub mod engine;
pub mod types;

pub use engine::RunEngine;
pub use types::{AttemptId, Run, RunLimits, RunOutcome, RunPhase, RunStatus};
