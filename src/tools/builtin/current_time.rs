//! `get_current_time`: current local time from the World Time API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::BuiltinTool;
use crate::error::CourierError;
use crate::tools::arguments::ToolArguments;
use crate::tools::tool::Tool;

pub struct CurrentTimeTool {
    base_url: String,
    default_timezone: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct WorldTimeResponse {
    datetime: String,
}

impl CurrentTimeTool {
    pub fn new(
        base_url: impl Into<String>,
        default_timezone: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            default_timezone: default_timezone.into(),
            client,
        }
    }
}

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        BuiltinTool::GetCurrentTime.as_str()
    }

    /// Lookup failures are reported in an `error` field rather than raised,
    /// so the assistant can tell the user the time is unavailable.
    async fn invoke(&self, args: &ToolArguments) -> Result<serde_json::Value, CourierError> {
        let timezone = args
            .get_str_opt("timezone")
            .filter(|tz| !tz.trim().is_empty())
            .unwrap_or(&self.default_timezone);
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), timezone);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                return Ok(json!({
                    "error": format!("Connection error with the World Time API: {err}")
                }))
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Ok(json!({
                "error": format!("Could not get the time for timezone {timezone}: {status}")
            }));
        }

        match response.json::<WorldTimeResponse>().await {
            Ok(body) => Ok(json!({
                "message": format!("The current time in {timezone} is: {}", body.datetime)
            })),
            Err(err) => Ok(json!({
                "error": format!("Unexpected World Time API response: {err}")
            })),
        }
    }
}
