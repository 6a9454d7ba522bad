use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::io::session::{Session, TokenGrant};
use crate::io::store::{StoreError, TodoStore};
use crate::model::{Backend, RemoteConfig, Todo, TodoId, TodoPatch};

/// Todo table behind a PostgREST endpoint, scoped to the signed-in user.
pub struct RemoteStore {
    agent: ureq::Agent,
    base_url: String,
    anon_key: String,
    table: String,
    session: Session,
}

impl RemoteStore {
    pub fn new(config: &RemoteConfig, session: Session) -> Self {
        RemoteStore {
            agent: http_agent(config),
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            table: config.table.clone(),
            session,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn user_filter(&self) -> String {
        format!("eq.{}", self.session.user_id)
    }

    /// Attach the credentials every table request needs
    fn authed(&self, request: ureq::Request) -> ureq::Request {
        request
            .set("apikey", &self.anon_key)
            .set(
                "Authorization",
                &format!("Bearer {}", self.session.access_token),
            )
            .set("Accept", "application/json")
    }

    fn rows(response: ureq::Response) -> Result<Vec<Todo>, StoreError> {
        let body = response
            .into_string()
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let rows = decode_rows(&body)?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                if row.text.trim().is_empty() {
                    tracing::warn!(id = %row.id, "skipping remote todo with empty text");
                    None
                } else {
                    Some(row.into_todo())
                }
            })
            .collect())
    }
}

impl TodoStore for RemoteStore {
    fn load(&mut self) -> Result<Vec<Todo>, StoreError> {
        let request = self
            .authed(self.agent.get(&self.table_url()))
            .query("select", "*")
            .query("user_id", &self.user_filter())
            .query("order", "created_at.desc");
        let response = request.call().map_err(request_error)?;
        let todos = Self::rows(response)?;
        tracing::debug!(count = todos.len(), "loaded remote todos");
        Ok(todos)
    }

    fn insert(&mut self, text: &str) -> Result<Todo, StoreError> {
        let body = serde_json::to_string(&serde_json::json!({
            "text": text,
            "user_id": self.session.user_id,
        }))?;
        let request = self
            .authed(self.agent.post(&self.table_url()))
            .query("select", "*")
            .set("Content-Type", "application/json")
            .set("Prefer", "return=representation");
        let response = request.send_string(&body).map_err(request_error)?;
        let todo = Self::rows(response)?
            .into_iter()
            .next()
            .ok_or(StoreError::EmptyResponse)?;
        tracing::debug!(id = %todo.id, "inserted remote todo");
        Ok(todo)
    }

    fn update(&mut self, ids: &[TodoId], patch: &TodoPatch) -> Result<Vec<Todo>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let body = serde_json::to_string(patch)?;
        let request = self
            .authed(self.agent.request("PATCH", &self.table_url()))
            .query("id", &id_filter(ids))
            .query("user_id", &self.user_filter())
            .query("select", "*")
            .set("Content-Type", "application/json")
            .set("Prefer", "return=representation");
        let response = request.send_string(&body).map_err(request_error)?;
        Self::rows(response)
    }

    fn delete(&mut self, ids: &[TodoId]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        let request = self
            .authed(self.agent.delete(&self.table_url()))
            .query("id", &id_filter(ids))
            .query("user_id", &self.user_filter());
        request.call().map_err(request_error)?;
        tracing::debug!(count = ids.len(), "deleted remote todos");
        Ok(())
    }

    fn backend(&self) -> Backend {
        Backend::Remote
    }
}

/// Exchange email and password for a session via the auth endpoint.
pub fn sign_in(config: &RemoteConfig, email: &str, password: &str) -> Result<Session, StoreError> {
    let session = token_request(
        config,
        "password",
        serde_json::json!({
            "email": email,
            "password": password,
        }),
    )?;
    tracing::info!(user = %session.user_id, "signed in");
    Ok(session)
}

/// Trade a refresh token for a fresh session.
pub fn refresh_session(config: &RemoteConfig, refresh_token: &str) -> Result<Session, StoreError> {
    let session = token_request(
        config,
        "refresh_token",
        serde_json::json!({ "refresh_token": refresh_token }),
    )?;
    tracing::info!(user = %session.user_id, "session refreshed");
    Ok(session)
}

fn token_request(
    config: &RemoteConfig,
    grant_type: &str,
    body: serde_json::Value,
) -> Result<Session, StoreError> {
    let agent = http_agent(config);
    let url = format!("{}/auth/v1/token", config.url.trim_end_matches('/'));
    let body = serde_json::to_string(&body)?;
    let response = agent
        .post(&url)
        .query("grant_type", grant_type)
        .set("apikey", &config.anon_key)
        .set("Content-Type", "application/json")
        .send_string(&body)
        .map_err(request_error)?;
    let body = response
        .into_string()
        .map_err(|e| StoreError::Decode(e.to_string()))?;
    let grant: TokenGrant =
        serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;
    Ok(grant.into_session(Utc::now()))
}

fn http_agent(config: &RemoteConfig) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
}

/// PostgREST filter selecting the given ids
pub fn id_filter(ids: &[TodoId]) -> String {
    match ids {
        [single] => format!("eq.{}", single),
        _ => {
            let joined: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
            format!("in.({})", joined.join(","))
        }
    }
}

fn request_error(err: ureq::Error) -> StoreError {
    match err {
        ureq::Error::Status(status, response) => {
            let message = response
                .into_string()
                .ok()
                .and_then(|body| error_message(&body))
                .unwrap_or_else(|| format!("HTTP {}", status));
            tracing::warn!(status, %message, "remote request rejected");
            StoreError::Status { status, message }
        }
        ureq::Error::Transport(transport) => {
            tracing::warn!(error = %transport, "remote request failed");
            StoreError::Transport(transport.to_string())
        }
    }
}

/// Pull a readable message out of a PostgREST or auth error body
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error_description", "msg", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

/// One row of the remote todo table
#[derive(Debug, Clone, Deserialize)]
pub struct TodoRow {
    #[serde(deserialize_with = "id_from_any")]
    pub id: TodoId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(deserialize_with = "timestamp_from_str")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TodoRow {
    pub fn into_todo(self) -> Todo {
        Todo {
            id: self.id,
            text: self.text,
            completed: self.completed,
            created_at: self.created_at,
        }
    }
}

pub fn decode_rows(body: &str) -> Result<Vec<TodoRow>, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))
}

fn id_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TodoId, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => TodoId::new(s),
        RawId::Number(n) => TodoId::new(n.to_string()),
    })
}

/// Accepts `timestamptz` (with offset) and bare `timestamp` (taken as UTC)
fn timestamp_from_str<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("bad timestamp '{}'", raw)))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
