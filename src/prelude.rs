//! Convenience re-exports for common use.

pub use crate::clock::{Clock, SystemClock};
pub use crate::config::CourierConfig;
pub use crate::error::{CourierError, Result};
pub use crate::gateway::{Gateway, StartedConversation};
pub use crate::remote::{OpenAiAssistants, RemoteExecutionService};
pub use crate::run::{RunEngine, RunLimits, RunOutcome, RunStatus};
pub use crate::sanitize::sanitize;
pub use crate::session::{FileSessionStore, SessionStore};
pub use crate::tools::{Tool, ToolArguments, ToolRegistry, ToolSource};
