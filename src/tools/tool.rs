//! Tool trait and closure-based tool wrapper.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use crate::error::CourierError;

/// A locally executed capability the assistant can call by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the remote service uses when requesting this tool.
    fn name(&self) -> &str;

    /// Run the tool. The result is JSON-encoded before it is submitted, so
    /// handlers that answer in prose return `Value::String`.
    async fn invoke(&self, args: &ToolArguments) -> Result<serde_json::Value, CourierError>;
}

type ToolHandler = dyn Fn(ToolArguments) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, CourierError>> + Send>>
    + Send
    + Sync;

/// Closure-based tool for quick tool creation.
pub struct FnTool {
    name: String,
    handler: Arc<ToolHandler>,
}

impl FnTool {
    pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<serde_json::Value, CourierError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            handler: Arc::new(move |args| Box::pin(handler(args))),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, args: &ToolArguments) -> Result<serde_json::Value, CourierError> {
        (self.handler)(args.clone()).await
    }
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool").field("name", &self.name).finish()
    }
}
