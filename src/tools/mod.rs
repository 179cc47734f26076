//! Tool system: handlers, sources, and the startup registry.

pub mod arguments;
pub mod builtin;
pub mod registry;
pub mod source;
pub mod tool;
pub mod types;

pub use arguments::ToolArguments;
pub use builtin::{builtin_sources, BuiltinTool};
pub use registry::ToolRegistry;
pub use source::{DescriptorFileSource, StaticToolSource, ToolSource, ToolSourceContents};
pub use tool::{FnTool, Tool};
pub use types::{ToolDescriptor, ToolParameters};
