use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::io::storage::atomic_write;

/// An authenticated session for the remote backend (written to session.json)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Token grant returned by the auth endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: GrantUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrantUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl TokenGrant {
    pub fn into_session(self, now: DateTime<Utc>) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            user_id: self.user.id,
            email: self.user.email,
            expires_at: self.expires_in.map(|secs| now + Duration::seconds(secs)),
        }
    }
}

pub fn session_path(home: &Path) -> PathBuf {
    home.join("session.json")
}

/// Read whatever session is on disk, expired or not. Missing or unreadable files read as `None`.
pub fn read_stored_session(home: &Path) -> Option<Session> {
    let content = fs::read_to_string(session_path(home)).ok()?;
    match serde_json::from_str(&content) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable session file");
            None
        }
    }
}

/// Read the stored session. Missing, unreadable, or expired sessions read as `None`.
pub fn read_session(home: &Path) -> Option<Session> {
    let session = read_stored_session(home)?;
    if session.is_expired(Utc::now()) {
        tracing::info!(user = %session.user_id, "stored session has expired");
        return None;
    }
    Some(session)
}

pub fn write_session(home: &Path, session: &Session) -> io::Result<()> {
    fs::create_dir_all(home)?;
    let content = serde_json::to_string_pretty(session)?;
    atomic_write(&session_path(home), content.as_bytes())
}

/// Remove the stored session. Returns whether one existed.
pub fn clear_session(home: &Path) -> io::Result<bool> {
    match fs::remove_file(session_path(home)) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
