//! Error types for Courier.

use thiserror::Error;

/// Primary error type for all Courier operations.
#[derive(Error, Debug)]
pub enum CourierError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Missing identifier: {0}")]
    MissingIdentifier(&'static str),

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Tool source '{source_id}' failed to load: {message}")]
    ToolSource { source_id: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl CourierError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a tool execution error.
    pub fn tool(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Create a tool source loading error.
    pub fn tool_source(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolSource {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Whether this error was caused by the caller's input rather than by a
    /// remote or local failure.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::MissingIdentifier(_) | Self::InvalidArgument(_))
    }
}

impl From<toml::de::Error> for CourierError {
    fn from(error: toml::de::Error) -> Self {
        Self::Persistence(error.to_string())
    }
}

impl From<toml::ser::Error> for CourierError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Persistence(error.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, CourierError>;
