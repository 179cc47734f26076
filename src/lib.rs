//! Courier: conversational-agent gateway.
//!
//! Creates and tracks conversation threads, forwards user messages to a
//! hosted assistant, and drives each run to completion: polling its status,
//! dispatching tool calls to locally registered handlers, and returning the
//! assistant's reply as plain text within a bounded wait.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use courier::prelude::*;
//!
//! # async fn example() -> courier::error::Result<()> {
//! let config = CourierConfig::load()?;
//! let client = courier::remote::http::build_client(std::time::Duration::from_secs(30))?;
//! let tools = ToolRegistry::discover(&courier::tools::builtin_sources(&config, client.clone()))?;
//! let remote = Arc::new(OpenAiAssistants::new(
//!     client,
//!     config.require_api_key()?,
//!     Some(config.base_url.clone()),
//! ));
//! let engine = RunEngine::new(remote, Arc::new(SystemClock));
//! let outcome = engine.advance_run("thread_abc", "run_abc", &tools).await?;
//! println!("{}", outcome.response);
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod gateway;
pub mod prelude;
pub mod remote;
pub mod run;
pub mod sanitize;
pub mod session;
pub mod tools;

#[cfg(feature = "cli")]
pub mod cli;
