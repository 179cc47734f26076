//! Session tracking: which remote thread belongs to which user.

pub mod store;

pub use store::{FileSessionStore, InMemorySessionStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::CourierError;

/// Where a conversation stands from the gateway's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum SessionStatus {
    /// Thread created, no message sent yet.
    Arrived,
    /// At least one user message has been forwarded.
    Engaged,
}

/// Persistent conversation identity for a `(platform, username)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub thread_id: String,
    pub platform: String,
    pub username: String,
    pub timestamp: DateTime<Utc>,
    pub status: SessionStatus,
}

impl Session {
    pub fn arrived(
        thread_id: impl Into<String>,
        platform: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            thread_id: thread_id.into(),
            platform: platform.into(),
            username: username.into(),
            timestamp: Utc::now(),
            status: SessionStatus::Arrived,
        }
    }
}

/// Storage abstraction for sessions.
pub trait SessionStore: Send + Sync {
    fn find(&self, platform: &str, username: &str) -> Result<Option<Session>, CourierError>;
    fn find_by_thread(&self, thread_id: &str) -> Result<Option<Session>, CourierError>;
    fn save(&self, session: &Session) -> Result<(), CourierError>;
}
