//! Remote execution service: the hosted engine that executes runs.

pub mod http;
pub mod openai;

pub use openai::OpenAiAssistants;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CourierError;

/// Run status as reported by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteRunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    /// Any status this crate does not know about; treated as still running.
    #[serde(other)]
    Unknown,
}

impl RemoteRunStatus {
    /// Remote states from which the run can no longer produce a reply.
    pub fn is_terminal_failure(self) -> bool {
        matches!(
            self,
            Self::Failed | Self::Cancelled | Self::Expired | Self::Incomplete
        )
    }
}

/// One tool call the remote run is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallRequest {
    pub call_id: String,
    pub function_name: String,
    pub raw_arguments: String,
}

/// Action a paused run asks the caller to take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequiredAction {
    SubmitToolOutputs(Vec<ToolCallRequest>),
    /// An action type this crate cannot satisfy.
    Other(String),
}

/// Point-in-time view of a remote run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSnapshot {
    pub status: RemoteRunStatus,
    pub required_action: Option<RequiredAction>,
}

impl RunSnapshot {
    pub fn new(status: RemoteRunStatus) -> Self {
        Self {
            status,
            required_action: None,
        }
    }

    pub fn requires_tools(calls: Vec<ToolCallRequest>) -> Self {
        Self {
            status: RemoteRunStatus::RequiresAction,
            required_action: Some(RequiredAction::SubmitToolOutputs(calls)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    /// Non-text content (images, files).
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessage {
    pub id: String,
    pub role: String,
    pub content: Vec<MessageContent>,
}

impl ThreadMessage {
    /// Text of the first content part, if that part is text.
    pub fn first_text(&self) -> Option<&str> {
        match self.content.first()? {
            MessageContent::Text(text) => Some(text),
            MessageContent::Other => None,
        }
    }
}

/// Output of one tool call, keyed by the originating call id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    #[serde(rename = "tool_call_id")]
    pub call_id: String,
    pub output: String,
}

/// Contract of the hosted execution engine.
#[async_trait]
pub trait RemoteExecutionService: Send + Sync {
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<RunSnapshot, CourierError>;

    /// Messages in the thread, most recent first.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, CourierError>;

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<(), CourierError>;

    /// Open a new conversation thread, returning its id.
    async fn create_thread(&self) -> Result<String, CourierError>;

    /// Append a user message, returning the message id.
    async fn create_message(&self, thread_id: &str, content: &str) -> Result<String, CourierError>;

    /// Start a run of `assistant_id` on the thread, returning the run id.
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<String, CourierError>;
}
