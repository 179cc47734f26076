//! Gateway operations consumed by the transport layer.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::error::CourierError;
use crate::remote::RemoteExecutionService;
use crate::run::{RunEngine, RunOutcome};
use crate::session::{Session, SessionStatus, SessionStore};
use crate::tools::{ToolDescriptor, ToolRegistry};

pub const UNSPECIFIED: &str = "Not Specified";

/// Result of `start_conversation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartedConversation {
    pub thread_id: String,
    /// `true` when an existing session was found for the pair.
    pub reused: bool,
}

pub struct Gateway {
    remote: Arc<dyn RemoteExecutionService>,
    sessions: Arc<dyn SessionStore>,
    engine: RunEngine,
    tools: Arc<ToolRegistry>,
    assistant_id: String,
}

impl Gateway {
    pub fn new(
        remote: Arc<dyn RemoteExecutionService>,
        sessions: Arc<dyn SessionStore>,
        engine: RunEngine,
        tools: Arc<ToolRegistry>,
        assistant_id: impl Into<String>,
    ) -> Self {
        Self {
            remote,
            sessions,
            engine,
            tools,
            assistant_id: assistant_id.into(),
        }
    }

    /// Reuse the thread recorded for `(platform, username)` or open a new one.
    pub async fn start_conversation(
        &self,
        platform: Option<&str>,
        username: Option<&str>,
    ) -> Result<StartedConversation, CourierError> {
        let platform = non_blank(platform).unwrap_or(UNSPECIFIED);
        let username = non_blank(username).unwrap_or(UNSPECIFIED);

        if let Some(existing) = self.sessions.find(platform, username)? {
            info!(thread_id = %existing.thread_id, platform, username, "reusing existing thread");
            return Ok(StartedConversation {
                thread_id: existing.thread_id,
                reused: true,
            });
        }

        let thread_id = self.remote.create_thread().await?;
        self.sessions
            .save(&Session::arrived(&thread_id, platform, username))?;
        info!(thread_id = %thread_id, platform, username, "new thread created");
        Ok(StartedConversation {
            thread_id,
            reused: false,
        })
    }

    /// Forward a user message and start a run; returns the run id.
    pub async fn send_message(&self, thread_id: &str, message: &str) -> Result<String, CourierError> {
        if thread_id.trim().is_empty() {
            return Err(CourierError::MissingIdentifier("thread_id"));
        }

        let message_id = self.remote.create_message(thread_id, message).await?;
        let run_id = self.remote.create_run(thread_id, &self.assistant_id).await?;
        info!(thread_id, message_id = %message_id, run_id = %run_id, "run created");

        if let Some(mut session) = self.sessions.find_by_thread(thread_id)? {
            if session.status != SessionStatus::Engaged {
                session.status = SessionStatus::Engaged;
                self.sessions.save(&session)?;
            }
        }
        Ok(run_id)
    }

    /// Drive a run to its terminal outcome with the startup registry.
    pub async fn check_run(&self, thread_id: &str, run_id: &str) -> Result<RunOutcome, CourierError> {
        self.engine.advance_run(thread_id, run_id, &self.tools).await
    }

    /// Capabilities advertised to the remote service.
    pub fn tool_descriptors(&self) -> &[ToolDescriptor] {
        self.tools.descriptors()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
