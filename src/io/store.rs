use std::path::Path;

use chrono::Utc;

use crate::io::config_io::ConfigError;
use crate::io::local_store::LocalStore;
use crate::io::remote_store::{self, RemoteStore};
use crate::io::session::{self, Session};
use crate::io::storage::DirStorage;
use crate::model::{AppConfig, Backend, RemoteConfig, Todo, TodoId, TodoPatch};

/// Storage key of the local todo list
pub const STORAGE_KEY: &str = "todos";

/// Error type for persistence operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not signed in: run `tl login` first")]
    NotSignedIn,
    #[error("could not access storage entry '{key}': {source}")]
    Storage {
        key: String,
        source: std::io::Error,
    },
    #[error("could not encode todos: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("network error: {0}")]
    Transport(String),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("could not decode server response: {0}")]
    Decode(String),
    #[error("server returned no record")]
    EmptyResponse,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Persistence boundary for the todo collection.
///
/// Every method either confirms the change (returning what was stored) or
/// fails without side effects on the caller's collection.
pub trait TodoStore {
    /// All todos, newest first
    fn load(&mut self) -> Result<Vec<Todo>, StoreError>;

    /// Create a todo from already-normalized text
    fn insert(&mut self, text: &str) -> Result<Todo, StoreError>;

    /// Apply `patch` to every listed id and return the confirmed records
    fn update(&mut self, ids: &[TodoId], patch: &TodoPatch) -> Result<Vec<Todo>, StoreError>;

    fn delete(&mut self, ids: &[TodoId]) -> Result<(), StoreError>;

    fn backend(&self) -> Backend;
}

/// Open the store selected by configuration.
pub fn open_store(home: &Path, config: &AppConfig) -> Result<Box<dyn TodoStore>, StoreError> {
    match config.backend {
        Backend::Local => {
            let storage = DirStorage::new(home);
            Ok(Box::new(LocalStore::new(storage, STORAGE_KEY)))
        }
        Backend::Remote => {
            let remote = config
                .remote
                .as_ref()
                .ok_or(ConfigError::MissingRemote)?;
            let stored = session::read_stored_session(home).ok_or(StoreError::NotSignedIn)?;
            let session = if stored.is_expired(Utc::now()) {
                renew_session(home, remote, &stored)?
            } else {
                stored
            };
            Ok(Box::new(RemoteStore::new(remote, session)))
        }
    }
}

/// Replace an expired session using its refresh token and persist the result.
fn renew_session(home: &Path, remote: &RemoteConfig, expired: &Session) -> Result<Session, StoreError> {
    let Some(refresh_token) = expired.refresh_token.as_deref() else {
        tracing::info!(user = %expired.user_id, "stored session has expired");
        return Err(StoreError::NotSignedIn);
    };
    let session = match remote_store::refresh_session(remote, refresh_token) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "session refresh failed");
            return Err(StoreError::NotSignedIn);
        }
    };
    if let Err(e) = session::write_session(home, &session) {
        tracing::warn!(error = %e, "could not save refreshed session");
    }
    Ok(session)
}
