//! Run state, limits and terminal outcomes.

use std::time::{Duration, Instant};

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::error::CourierError;

/// Identifier of one local `advance_run` attempt.
pub type AttemptId = Uuid;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(8);

/// Fixed polling cadence and overall wait budget for one `advance_run` call.
/// No backoff growth, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct RunLimits {
    #[builder(default = DEFAULT_POLL_INTERVAL)]
    pub poll_interval: Duration,
    #[builder(default = DEFAULT_DEADLINE)]
    pub deadline: Duration,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            deadline: DEFAULT_DEADLINE,
        }
    }
}

/// Engine-side state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RunPhase {
    Polling,
    AwaitingToolOutputs,
    Completed,
    Failed,
    TimedOut,
}

impl RunPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::TimedOut)
    }

    pub fn can_transition_to(self, next: RunPhase) -> bool {
        use RunPhase::*;
        matches!(
            (self, next),
            (Polling, AwaitingToolOutputs)
                | (Polling, Completed)
                | (Polling, Failed)
                | (Polling, TimedOut)
                | (AwaitingToolOutputs, Polling)
                | (AwaitingToolOutputs, TimedOut)
        )
    }
}

/// One execution attempt being driven by the engine. Lives for a single
/// `advance_run` call; nothing is kept between calls.
#[derive(Debug, Clone)]
pub struct Run {
    /// Local id for this polling attempt; two callers advancing the same
    /// remote run get distinct attempts.
    pub attempt: AttemptId,
    pub session_id: String,
    pub run_id: String,
    pub started_at: Instant,
    pub deadline: Instant,
    phase: RunPhase,
}

impl Run {
    pub fn start(
        session_id: impl Into<String>,
        run_id: impl Into<String>,
        started_at: Instant,
        limits: &RunLimits,
    ) -> Self {
        Self {
            attempt: Uuid::new_v4(),
            session_id: session_id.into(),
            run_id: run_id.into(),
            started_at,
            deadline: started_at + limits.deadline,
            phase: RunPhase::Polling,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Move to `next`, rejecting anything that is not a forward transition.
    pub fn transition(&mut self, next: RunPhase) -> Result<(), CourierError> {
        if !self.phase.can_transition_to(next) {
            return Err(CourierError::InvalidState(format!(
                "run {} cannot move from {} to {}",
                self.run_id, self.phase, next
            )));
        }
        self.phase = next;
        Ok(())
    }
}

/// Terminal tag returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Failed,
    Timeout,
}

pub const FAILURE_MARKER: &str = "error";
pub const TIMEOUT_MARKER: &str = "timeout";

/// Terminal result of `advance_run`: sanitized reply text or a marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub response: String,
    pub status: RunStatus,
}

impl RunOutcome {
    pub fn completed(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            status: RunStatus::Completed,
        }
    }

    pub fn failed() -> Self {
        Self {
            response: FAILURE_MARKER.to_string(),
            status: RunStatus::Failed,
        }
    }

    pub fn timed_out() -> Self {
        Self {
            response: TIMEOUT_MARKER.to_string(),
            status: RunStatus::Timeout,
        }
    }
}
