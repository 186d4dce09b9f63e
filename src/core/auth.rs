//! Authentication for booking-desk
//!
//! A single supervisor account guards every booking endpoint:
//! - credentials come from configuration and are compared in constant time
//! - a successful login issues an opaque bearer token held in a [`SessionStore`]
//! - [`AuthPolicy`] decides what an [`AuthContext`] may do

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Role carried by every supervisor session
pub const SUPERVISOR_ROLE: &str = "supervisor";

/// Login request body
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Holder of a live supervisor session
    Supervisor { username: String, role: String },

    /// No authentication (public access)
    Anonymous,
}

impl AuthContext {
    pub fn username(&self) -> Option<&str> {
        match self {
            AuthContext::Supervisor { username, .. } => Some(username),
            AuthContext::Anonymous => None,
        }
    }

    pub fn role(&self) -> Option<&str> {
        match self {
            AuthContext::Supervisor { role, .. } => Some(role),
            AuthContext::Anonymous => None,
        }
    }
}

/// Roles allowed to perform an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPolicy {
    allowed_roles: Vec<String>,
}

impl AuthPolicy {
    pub fn has_role(roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allowed_roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Policy guarding the booking endpoints
    pub fn supervisor_only() -> Self {
        Self::has_role([SUPERVISOR_ROLE])
    }

    /// Check if auth context satisfies this policy
    pub fn check(&self, context: &AuthContext) -> bool {
        context
            .role()
            .is_some_and(|role| self.allowed_roles.iter().any(|r| r == role))
    }
}

/// Checks login attempts against the configured supervisor account
#[derive(Clone)]
pub struct SupervisorAuthenticator {
    username: String,
    password: String,
}

impl SupervisorAuthenticator {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The supervisor context when both username and password match
    pub fn authenticate(&self, credentials: &Credentials) -> Option<AuthContext> {
        // Evaluate both comparisons so timing does not reveal which one failed
        let username_ok = constant_time_eq(credentials.username.as_bytes(), self.username.as_bytes());
        let password_ok = constant_time_eq(credentials.password.as_bytes(), self.password.as_bytes());

        (username_ok & password_ok).then(|| AuthContext::Supervisor {
            username: self.username.clone(),
            role: SUPERVISOR_ROLE.to_string(),
        })
    }
}

impl fmt::Debug for SupervisorAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupervisorAuthenticator")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Byte comparison whose running time depends only on the lengths
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let mut diff = a.len() ^ b.len();
    for (i, byte) in a.iter().enumerate() {
        let other = b.get(i % b.len().max(1)).copied().unwrap_or(0);
        diff |= usize::from(byte ^ other);
    }
    diff == 0
}

/// An issued login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn context(&self) -> AuthContext {
        AuthContext::Supervisor {
            username: self.username.clone(),
            role: self.role.clone(),
        }
    }
}

/// In-process store of live sessions keyed by token
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a fresh session for an authenticated context
    ///
    /// Expired sessions are swept out first. `None` for anonymous contexts
    /// and when `now + ttl` is not representable.
    pub async fn issue(&self, context: &AuthContext, now: DateTime<Utc>) -> Option<Session> {
        let AuthContext::Supervisor { username, role } = context else {
            return None;
        };
        let Some(expires_at) = now.checked_add_signed(self.ttl) else {
            tracing::warn!(ttl = %self.ttl, "session expiry out of range");
            return None;
        };

        let session = Session {
            token: new_token(),
            username: username.clone(),
            role: role.clone(),
            expires_at,
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, live| !live.is_expired(now));
        let swept = before - sessions.len();
        if swept > 0 {
            tracing::debug!(swept, "expired sessions dropped");
        }
        sessions.insert(session.token.clone(), session.clone());
        Some(session)
    }

    /// Look up a live session; expired ones are dropped on sight
    pub async fn resolve(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        let found = self.sessions.read().await.get(token).cloned()?;
        if found.is_expired(now) {
            self.sessions.write().await.remove(token);
            tracing::debug!(username = %found.username, "session expired");
            return None;
        }
        Some(found)
    }

    /// Forget a session; returns whether it existed
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn new_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}
