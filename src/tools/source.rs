//! Tool sources: the units a registry is discovered from.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use super::tool::Tool;
use super::types::ToolDescriptor;
use crate::error::CourierError;

/// What one source contributes to the registry.
#[derive(Default, Clone)]
pub struct ToolSourceContents {
    /// Capability advertisement, if the source publishes one.
    pub descriptor: Option<ToolDescriptor>,
    /// Callables exported by the source, registered under their own names.
    pub tools: Vec<Arc<dyn Tool>>,
}

/// A collection of tool definitions loaded once at startup.
pub trait ToolSource: Send + Sync {
    /// Identifier used in logs and load errors.
    fn id(&self) -> &str;

    /// Load the source. An error here aborts registry construction.
    fn load(&self) -> Result<ToolSourceContents, CourierError>;
}

/// Source defined entirely in code.
#[derive(Clone)]
pub struct StaticToolSource {
    id: String,
    contents: ToolSourceContents,
}

impl StaticToolSource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            contents: ToolSourceContents::default(),
        }
    }

    pub fn with_descriptor(mut self, descriptor: ToolDescriptor) -> Self {
        self.contents.descriptor = Some(descriptor);
        self
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.contents.tools.push(tool);
        self
    }
}

impl ToolSource for StaticToolSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<ToolSourceContents, CourierError> {
        Ok(self.contents.clone())
    }
}

/// Source whose descriptor lives in a JSON file next to the deployment,
/// bound to handlers supplied in code.
pub struct DescriptorFileSource {
    id: String,
    path: PathBuf,
    tools: Vec<Arc<dyn Tool>>,
}

impl DescriptorFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            id: path.display().to_string(),
            path,
            tools: Vec::new(),
        }
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }
}

impl ToolSource for DescriptorFileSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<ToolSourceContents, CourierError> {
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| CourierError::tool_source(&self.id, e.to_string()))?;
        let descriptor: ToolDescriptor = serde_json::from_str(&raw)
            .map_err(|e| CourierError::tool_source(&self.id, format!("invalid descriptor: {e}")))?;
        Ok(ToolSourceContents {
            descriptor: Some(descriptor),
            tools: self.tools.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::tool::FnTool;
    use tempfile::TempDir;

    fn noop(name: &str) -> Arc<dyn Tool> {
        Arc::new(FnTool::new(name, |_| async { Ok(serde_json::Value::Null) }))
    }

    #[test]
    fn descriptor_file_source_reads_descriptor() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ping.json");
        fs::write(
            &path,
            r#"{"type":"function","function":{"name":"ping","description":"Ping"}}"#,
        )
        .unwrap();

        let contents = DescriptorFileSource::new(&path)
            .with_tool(noop("ping"))
            .load()
            .unwrap();
        assert_eq!(contents.descriptor.unwrap().name(), "ping");
        assert_eq!(contents.tools.len(), 1);
    }

    #[test]
    fn missing_descriptor_file_fails_to_load() {
        let dir = TempDir::new().unwrap();
        let source = DescriptorFileSource::new(dir.path().join("absent.json"));
        let err = source.load().err().expect("load should fail");
        assert!(matches!(err, CourierError::ToolSource { .. }));
    }

    #[test]
    fn malformed_descriptor_file_fails_to_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = DescriptorFileSource::new(&path).load().err().expect("load should fail");
        assert!(err.to_string().contains("invalid descriptor"));
    }
}
