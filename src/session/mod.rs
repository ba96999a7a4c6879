//! Session store: who is logged in, persisted across runs.

mod error;
mod storage;

pub use error::{AuthError, SessionStorageError};
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};

use crate::api::{ApiError, DashboardApi};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock};

/// Fallback text when the backend rejects a login without a message
const LOGIN_FAILED: &str = "Login failed";

/// Role granted by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Map the backend's role string; unrecognized roles get no privileges.
    pub fn parse(role: &str) -> Self {
        match role {
            "ADMIN" => Role::Admin,
            "USER" => Role::User,
            _ => Role::Unknown,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
            Role::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Authenticated identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(username: String, role: Role) -> Self {
        Self {
            username,
            role,
            authenticated: true,
            logged_in_at: Some(Utc::now()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Holds the current session in memory and in durable storage.
pub struct SessionStore {
    api: Arc<dyn DashboardApi>,
    storage: Box<dyn SessionStorage>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn DashboardApi>, storage: Box<dyn SessionStorage>) -> Self {
        Self {
            api,
            storage,
            current: RwLock::new(None),
        }
    }

    /// Authenticate against the backend and persist the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .api
            .login(username, password)
            .await
            .map_err(|e| match e {
                ApiError::Rejected { message, .. } => {
                    let message = if message.is_empty() {
                        LOGIN_FAILED.to_string()
                    } else {
                        message
                    };
                    AuthError::InvalidCredentials(message)
                }
                ApiError::InvalidResponse(detail) => {
                    AuthError::InvalidCredentials(format!("{}: {}", LOGIN_FAILED, detail))
                }
                other => AuthError::Connectivity(other.to_string()),
            })?;

        let session = Session::new(response.username, Role::parse(&response.role));
        self.storage.save(&session)?;
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());

        tracing::info!(username = %session.username, role = %session.role, "Logged in");
        Ok(session)
    }

    /// Forget the session in memory and in durable storage.
    pub fn logout(&self) {
        let previous = self
            .current
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "Failed to clear stored session");
        }
        if let Some(session) = previous {
            tracing::info!(username = %session.username, "Logged out");
        }
    }

    /// Load a previously persisted session, if one exists.
    pub fn restore(&self) -> Option<Session> {
        let restored = match self.storage.load() {
            Ok(session) => session.filter(|s| s.authenticated),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored session");
                None
            }
        };
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = restored.clone();

        if let Some(ref session) = restored {
            tracing::debug!(username = %session.username, "Restored session");
        }
        restored
    }

    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }
}
