//! `conversation_summary_request`: forwards a lead summary to a webhook.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::BuiltinTool;
use crate::error::CourierError;
use crate::tools::arguments::ToolArguments;
use crate::tools::source::{ToolSource, ToolSourceContents};
use crate::tools::tool::Tool;
use crate::tools::types::{ToolDescriptor, ToolParameters};

const SUCCESS_MESSAGE: &str =
    "The conversation summary was sent successfully. We will get in touch with you soon.";

/// Loads the summary tool; fails when no webhook endpoint is configured.
pub struct ConversationSummarySource {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl ConversationSummarySource {
    pub fn new(webhook_url: Option<String>, client: reqwest::Client) -> Self {
        Self { webhook_url, client }
    }
}

impl ToolSource for ConversationSummarySource {
    fn id(&self) -> &str {
        BuiltinTool::ConversationSummaryRequest.as_str()
    }

    fn load(&self) -> Result<ToolSourceContents, CourierError> {
        let url = self.webhook_url.clone().ok_or_else(|| {
            CourierError::tool_source(self.id(), "SUMMARY_WEBHOOK_URL is not configured")
        })?;
        Ok(ToolSourceContents {
            descriptor: Some(ConversationSummaryTool::descriptor()),
            tools: vec![Arc::new(ConversationSummaryTool::new(url, self.client.clone()))],
        })
    }
}

pub struct ConversationSummaryTool {
    webhook_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct SummaryPayload {
    name: String,
    email: String,
    phone_number: String,
    conversation_summary: String,
}

impl ConversationSummaryTool {
    pub fn new(webhook_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            client,
        }
    }

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::function(
            BuiltinTool::ConversationSummaryRequest.as_str(),
            "Collects the user's name, email address, phone number and a summary of the \
             conversation, then sends the data to a webhook for processing.",
            ToolParameters::object()
                .string("name", "The user's full name.", true)
                .string("email", "A valid email address for the user.", true)
                .string(
                    "phone_number",
                    "A valid phone number in international format.",
                    true,
                )
                .string(
                    "conversation_summary",
                    "A short summary of the points covered in the conversation.",
                    true,
                )
                .build(),
        )
    }
}

#[async_trait]
impl Tool for ConversationSummaryTool {
    fn name(&self) -> &str {
        BuiltinTool::ConversationSummaryRequest.as_str()
    }

    async fn invoke(&self, args: &ToolArguments) -> Result<Value, CourierError> {
        let Some(fields) = args.raw().as_object() else {
            tracing::warn!(input = %args.raw(), "summary arguments are not an object");
            return Ok(Value::String(
                "Error sending conversation summary: arguments must be a JSON object".to_string(),
            ));
        };
        // Free-text fields sometimes arrive escaped twice by the model.
        let payload = SummaryPayload {
            name: unescape_twice(&field_text(fields, "name")),
            email: unescape_twice(&field_text(fields, "email")),
            phone_number: field_text(fields, "phone_number"),
            conversation_summary: unescape_twice(&field_text(fields, "conversation_summary")),
        };

        let response = match self.client.post(&self.webhook_url).json(&payload).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "summary webhook unreachable");
                return Ok(Value::String(format!(
                    "Error connecting to webhook: {err}"
                )));
            }
        };

        let status = response.status().as_u16();
        if status == 200 {
            tracing::info!("conversation summary delivered");
            return Ok(Value::String(SUCCESS_MESSAGE.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status, "summary webhook rejected payload");
        Ok(Value::String(format!(
            "Error sending conversation summary: {body}"
        )))
    }
}

/// Text of an argument field. Numbers and booleans keep their JSON spelling
/// so a phone number sent as `51999888777` still reaches the webhook.
fn field_text(fields: &serde_json::Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(text)) => text.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Percent-decode twice. Malformed escapes are kept verbatim.
fn unescape_twice(value: &str) -> String {
    let once = String::from_utf8_lossy(&urlencoding::decode_binary(value.as_bytes())).into_owned();
    String::from_utf8_lossy(&urlencoding::decode_binary(once.as_bytes())).into_owned()
}
