//! Name-indexed tool registry built once at startup.

use std::collections::HashMap;
use std::sync::Arc;

use super::source::ToolSource;
use super::tool::Tool;
use super::types::ToolDescriptor;
use crate::error::CourierError;

/// Handlers keyed by name plus the descriptors advertised upstream.
///
/// Read-only after construction, so it can be shared across concurrent runs
/// behind an `Arc` without locking.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    descriptors: Vec<ToolDescriptor>,
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `sources`, in order.
    ///
    /// Descriptors are appended as found. Callables are registered under
    /// their names and a later source replaces an earlier one on collision.
    /// Any source failing to load aborts the whole build.
    pub fn discover(sources: &[Box<dyn ToolSource>]) -> Result<Self, CourierError> {
        let mut registry = Self::new();
        for source in sources {
            let contents = source.load()?;
            tracing::debug!(
                source = source.id(),
                tools = contents.tools.len(),
                has_descriptor = contents.descriptor.is_some(),
                "tool source loaded"
            );
            if let Some(descriptor) = contents.descriptor {
                registry.descriptors.push(descriptor);
            }
            for tool in contents.tools {
                registry.register(tool);
            }
        }
        Ok(registry)
    }

    /// Register a handler under its own name, replacing any previous one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::warn!(tool = %name, "tool registered twice; keeping the later definition");
        }
    }

    /// Pure lookup.
    pub fn resolve(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .field("descriptors", &self.descriptors.len())
            .finish()
    }
}
