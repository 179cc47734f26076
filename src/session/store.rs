//! Session store implementations.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Session, SessionStore};
use crate::error::CourierError;

/// File-backed session store: one TOML file per platform/user pair.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn session_path(&self, platform: &str, username: &str) -> PathBuf {
        let name = format!(
            "{}.{}.toml",
            normalize_label(platform),
            normalize_label(username)
        );
        self.base_dir.join(name)
    }

    fn read(path: &Path) -> Result<Option<Session>, CourierError> {
        let raw = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let file: SessionFile = toml::from_str(&raw)?;
        Ok(Some(file.session))
    }
}

impl SessionStore for FileSessionStore {
    fn find(&self, platform: &str, username: &str) -> Result<Option<Session>, CourierError> {
        let found = Self::read(&self.session_path(platform, username))?;
        // Labels are normalized on disk; make sure the stored pair really matches.
        Ok(found.filter(|s| s.platform == platform && s.username == username))
    }

    fn find_by_thread(&self, thread_id: &str) -> Result<Option<Session>, CourierError> {
        let entries = match fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            if let Some(session) = Self::read(&path)? {
                if session.thread_id == thread_id {
                    return Ok(Some(session));
                }
            }
        }
        Ok(None)
    }

    fn save(&self, session: &Session) -> Result<(), CourierError> {
        fs::create_dir_all(&self.base_dir)?;
        let path = self.session_path(&session.platform, &session.username);
        let file = SessionFile {
            version: 1,
            session: session.clone(),
            saved_at: Utc::now(),
        };
        fs::write(&path, toml::to_string(&file)?)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionFile {
    version: u32,
    session: Session,
    saved_at: DateTime<Utc>,
}

fn normalize_label(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "unknown".to_string();
    }
    trimmed
        .chars()
        .map(|ch| {
            let lower = ch.to_ascii_lowercase();
            if lower.is_ascii_alphanumeric() || lower == '-' || lower == '_' {
                lower
            } else {
                '-'
            }
        })
        .collect()
}

/// Process-local store, for tests and single-run CLI use.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<(String, String), Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn find(&self, platform: &str, username: &str) -> Result<Option<Session>, CourierError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| CourierError::Persistence("session lock poisoned".into()))?;
        Ok(sessions
            .get(&(platform.to_string(), username.to_string()))
            .cloned())
    }

    fn find_by_thread(&self, thread_id: &str) -> Result<Option<Session>, CourierError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| CourierError::Persistence("session lock poisoned".into()))?;
        Ok(sessions.values().find(|s| s.thread_id == thread_id).cloned())
    }

    fn save(&self, session: &Session) -> Result<(), CourierError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| CourierError::Persistence("session lock poisoned".into()))?;
        sessions.insert(
            (session.platform.clone(), session.username.clone()),
            session.clone(),
        );
        Ok(())
    }
}
