//! Run poller / dispatcher.
//!
//! Drives one remote run from "in progress" to a terminal outcome: polls the
//! remote status at a fixed interval, runs requested tool calls against the
//! registry and submits their outputs, and returns the sanitized reply once
//! the run completes. Every expected failure is folded into the terminal
//! [`RunOutcome`]; only missing identifiers surface as errors.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::types::{Run, RunLimits, RunOutcome, RunPhase};
use crate::clock::Clock;
use crate::error::CourierError;
use crate::remote::{
    RemoteExecutionService, RemoteRunStatus, RequiredAction, ThreadMessage, ToolCallRequest,
    ToolOutput,
};
use crate::sanitize::sanitize;
use crate::tools::{ToolArguments, ToolRegistry};

/// Stateless across calls; safe to share between concurrent requests.
pub struct RunEngine {
    remote: Arc<dyn RemoteExecutionService>,
    clock: Arc<dyn Clock>,
    limits: RunLimits,
}

impl RunEngine {
    pub fn new(remote: Arc<dyn RemoteExecutionService>, clock: Arc<dyn Clock>) -> Self {
        Self {
            remote,
            clock,
            limits: RunLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: RunLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &RunLimits {
        &self.limits
    }

    /// Poll `run_id` on `session_id` until it completes, fails, or the
    /// deadline passes, dispatching tool calls to `tools` along the way.
    ///
    /// Concurrent calls for the same run are not serialized here.
    pub async fn advance_run(
        &self,
        session_id: &str,
        run_id: &str,
        tools: &ToolRegistry,
    ) -> Result<RunOutcome, CourierError> {
        if session_id.trim().is_empty() {
            return Err(CourierError::MissingIdentifier("session_id"));
        }
        if run_id.trim().is_empty() {
            return Err(CourierError::MissingIdentifier("run_id"));
        }

        let mut run = Run::start(session_id, run_id, self.clock.now(), &self.limits);
        let mut polls = 0u32;
        debug!(attempt = %run.attempt, thread_id = session_id, run_id, "advancing run");

        loop {
            if run.is_expired(self.clock.now()) {
                run.transition(RunPhase::TimedOut)?;
                info!(attempt = %run.attempt, thread_id = session_id, run_id, polls, "run timed out");
                return Ok(RunOutcome::timed_out());
            }

            polls += 1;
            let snapshot = match self.remote.retrieve_run(session_id, run_id).await {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    error!(thread_id = session_id, run_id, error = %err, "run status query failed");
                    run.transition(RunPhase::Failed)?;
                    return Ok(RunOutcome::failed());
                }
            };
            debug!(thread_id = session_id, run_id, poll = polls, status = ?snapshot.status, "checked run status");

            match snapshot.status {
                RemoteRunStatus::Completed => return self.finish_completed(&mut run).await,
                RemoteRunStatus::RequiresAction => match snapshot.required_action {
                    Some(RequiredAction::SubmitToolOutputs(calls)) => {
                        run.transition(RunPhase::AwaitingToolOutputs)?;
                        self.dispatch_tool_calls(&run, &calls, tools).await;
                        run.transition(RunPhase::Polling)?;
                    }
                    Some(RequiredAction::Other(kind)) => {
                        warn!(thread_id = session_id, run_id, action = %kind, "unsupported required action");
                    }
                    None => {
                        warn!(thread_id = session_id, run_id, "run requires action but reported none");
                    }
                },
                status if status.is_terminal_failure() => {
                    error!(thread_id = session_id, run_id, status = ?status, "run failed");
                    run.transition(RunPhase::Failed)?;
                    return Ok(RunOutcome::failed());
                }
                _ => {}
            }

            self.clock.sleep(self.limits.poll_interval).await;
        }
    }

    /// Fetch the newest message and turn it into the completed outcome.
    /// A missing or non-text reply degrades to `failed`.
    async fn finish_completed(&self, run: &mut Run) -> Result<RunOutcome, CourierError> {
        let messages = match self.remote.list_messages(&run.session_id).await {
            Ok(messages) => messages,
            Err(err) => {
                error!(thread_id = %run.session_id, run_id = %run.run_id, error = %err, "message fetch failed");
                run.transition(RunPhase::Failed)?;
                return Ok(RunOutcome::failed());
            }
        };

        let Some(raw) = messages.first().and_then(ThreadMessage::first_text) else {
            error!(thread_id = %run.session_id, run_id = %run.run_id, "completed run has no text reply");
            run.transition(RunPhase::Failed)?;
            return Ok(RunOutcome::failed());
        };

        debug!(run_id = %run.run_id, raw, "reply before sanitizing");
        let text = sanitize(raw);
        run.transition(RunPhase::Completed)?;
        info!(thread_id = %run.session_id, run_id = %run.run_id, "run completed");
        Ok(RunOutcome::completed(text))
    }

    /// Invoke each call in the order reported, submitting each output before
    /// the next call starts. Per-call problems are logged and skipped.
    async fn dispatch_tool_calls(&self, run: &Run, calls: &[ToolCallRequest], tools: &ToolRegistry) {
        for call in calls {
            let Some(tool) = tools.resolve(&call.function_name) else {
                warn!(
                    run_id = %run.run_id,
                    tool = %call.function_name,
                    call_id = %call.call_id,
                    "tool not found in registry; skipping call"
                );
                continue;
            };

            let args = ToolArguments::parse(&call.raw_arguments).unwrap_or_else(|| {
                warn!(
                    tool = %call.function_name,
                    call_id = %call.call_id,
                    input = %call.raw_arguments,
                    "tool arguments are not valid JSON; invoking with no arguments"
                );
                ToolArguments::empty()
            });

            let value = match tool.invoke(&args).await {
                Ok(value) => value,
                Err(err) => {
                    error!(tool = %call.function_name, call_id = %call.call_id, error = %err, "tool invocation failed");
                    continue;
                }
            };

            let output = match serde_json::to_string(&value) {
                Ok(output) => output,
                Err(err) => {
                    error!(tool = %call.function_name, call_id = %call.call_id, error = %err, "tool output not serializable");
                    continue;
                }
            };

            let submission = [ToolOutput {
                call_id: call.call_id.clone(),
                output,
            }];
            match self
                .remote
                .submit_tool_outputs(&run.session_id, &run.run_id, &submission)
                .await
            {
                Ok(()) => debug!(tool = %call.function_name, call_id = %call.call_id, "tool output submitted"),
                Err(err) => {
                    warn!(tool = %call.function_name, call_id = %call.call_id, error = %err, "tool output submission failed")
                }
            }
        }
    }
}
