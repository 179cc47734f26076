//! Built-in tools shipped with the gateway.

pub mod conversation_summary;
pub mod current_time;

pub use conversation_summary::{ConversationSummarySource, ConversationSummaryTool};
pub use current_time::CurrentTimeTool;

use std::sync::Arc;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::source::{StaticToolSource, ToolSource};
use crate::config::CourierConfig;

/// Closed set of tools the gateway knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum BuiltinTool {
    ConversationSummaryRequest,
    GetCurrentTime,
}

impl BuiltinTool {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Sources for every built-in tool, in registration order.
pub fn builtin_sources(config: &CourierConfig, client: reqwest::Client) -> Vec<Box<dyn ToolSource>> {
    vec![
        Box::new(ConversationSummarySource::new(
            config.summary_webhook_url.clone(),
            client.clone(),
        )),
        Box::new(
            StaticToolSource::new("utility/datetime").with_tool(Arc::new(CurrentTimeTool::new(
                config.world_time_url.clone(),
                config.default_timezone.clone(),
                client,
            ))),
        ),
    ]
}
