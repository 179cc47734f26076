//! OpenAI Assistants v2 REST client.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::http::{assistants_headers, status_to_error};
use super::{
    MessageContent, RemoteExecutionService, RemoteRunStatus, RequiredAction, RunSnapshot,
    ThreadMessage, ToolCallRequest, ToolOutput,
};
use crate::config::DEFAULT_BASE_URL;
use crate::error::CourierError;

const SUBMIT_TOOL_OUTPUTS: &str = "submit_tool_outputs";

pub struct OpenAiAssistants {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiAssistants {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CourierError> {
        let url = format!("{}{path}", self.base_url);
        let resp = self
            .client
            .get(&url)
            .headers(assistants_headers(&self.api_key))
            .send()
            .await?;
        decode(resp).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, CourierError> {
        let url = format!("{}{path}", self.base_url);
        let resp = self
            .client
            .post(&url)
            .headers(assistants_headers(&self.api_key))
            .json(body)
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, CourierError> {
    let status = resp.status();
    if !status.is_success() {
        let body_text = resp.text().await.unwrap_or_default();
        return Err(status_to_error(status.as_u16(), &body_text));
    }
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl RemoteExecutionService for OpenAiAssistants {
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<RunSnapshot, CourierError> {
        let run: WireRun = self
            .get(&format!("/threads/{thread_id}/runs/{run_id}"))
            .await?;
        debug!(thread_id, run_id, status = ?run.status, "retrieved run");
        Ok(run.into())
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, CourierError> {
        let list: WireList<WireMessage> = self
            .get(&format!("/threads/{thread_id}/messages?order=desc"))
            .await?;
        Ok(list.data.into_iter().map(Into::into).collect())
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<(), CourierError> {
        let body = serde_json::json!({ "tool_outputs": outputs });
        let _: WireId = self
            .post(
                &format!("/threads/{thread_id}/runs/{run_id}/submit_tool_outputs"),
                &body,
            )
            .await?;
        Ok(())
    }

    async fn create_thread(&self) -> Result<String, CourierError> {
        let thread: WireId = self.post("/threads", &serde_json::json!({})).await?;
        Ok(thread.id)
    }

    async fn create_message(&self, thread_id: &str, content: &str) -> Result<String, CourierError> {
        let body = serde_json::json!({ "role": "user", "content": content });
        let message: WireId = self
            .post(&format!("/threads/{thread_id}/messages"), &body)
            .await?;
        Ok(message.id)
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<String, CourierError> {
        let body = serde_json::json!({ "assistant_id": assistant_id });
        let run: WireId = self
            .post(&format!("/threads/{thread_id}/runs"), &body)
            .await?;
        Ok(run.id)
    }
}

// Wire types

#[derive(Deserialize)]
struct WireId {
    id: String,
}

#[derive(Deserialize)]
struct WireList<T> {
    data: Vec<T>,
}

#[derive(Deserialize)]
struct WireRun {
    status: RemoteRunStatus,
    #[serde(default)]
    required_action: Option<WireRequiredAction>,
}

#[derive(Deserialize)]
struct WireRequiredAction {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    submit_tool_outputs: Option<WireSubmitToolOutputs>,
}

#[derive(Deserialize)]
struct WireSubmitToolOutputs {
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Deserialize)]
struct WireMessage {
    id: String,
    role: String,
    #[serde(default)]
    content: Vec<WireContent>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireContent {
    Text { text: WireText },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct WireText {
    value: String,
}

impl From<WireRun> for RunSnapshot {
    fn from(run: WireRun) -> Self {
        let required_action = run.required_action.map(|action| {
            match (action.kind.as_str(), action.submit_tool_outputs) {
                (SUBMIT_TOOL_OUTPUTS, Some(submit)) => RequiredAction::SubmitToolOutputs(
                    submit
                        .tool_calls
                        .into_iter()
                        .map(|call| ToolCallRequest {
                            call_id: call.id,
                            function_name: call.function.name,
                            raw_arguments: call.function.arguments,
                        })
                        .collect(),
                ),
                _ => RequiredAction::Other(action.kind),
            }
        });
        Self {
            status: run.status,
            required_action,
        }
    }
}

impl From<WireMessage> for ThreadMessage {
    fn from(message: WireMessage) -> Self {
        Self {
            id: message.id,
            role: message.role,
            content: message
                .content
                .into_iter()
                .map(|part| match part {
                    WireContent::Text { text } => MessageContent::Text(text.value),
                    WireContent::Other => MessageContent::Other,
                })
                .collect(),
        }
    }
}
