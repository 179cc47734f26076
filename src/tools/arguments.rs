//! Typed access to tool call arguments.

use crate::error::CourierError;

/// Wrapper around decoded tool call arguments providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Empty argument set, used when the raw payload cannot be decoded.
    pub fn empty() -> Self {
        Self {
            value: serde_json::json!({}),
        }
    }

    /// Decode a raw serialized payload as reported by the remote service.
    ///
    /// Returns `None` when the payload is not valid JSON.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok().map(Self::new)
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, CourierError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| CourierError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    /// Deserialize the entire arguments into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, CourierError> {
        serde_json::from_value(self.value.clone()).map_err(|e| {
            CourierError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}
