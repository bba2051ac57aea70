//! Session lookup for the access guard.
//!
//! Sessions are created by the auth provider that shares the database; this
//! service only reads them. `issue` exists for tooling and tests.
//! When the database cannot be reached at startup the process falls back to
//! `MemorySessionStore`, which starts empty.

use crate::models::{
    object_id::ObjectId,
    session::{Session, SessionUser},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Default lifetime of an issued session.
pub const SESSION_TTL_DAYS: i64 = 7;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Resolve a session token to its user. Expired or unknown tokens
    /// resolve to `None`.
    async fn find_user(&self, token: &str) -> SessionResult<Option<SessionUser>>;

    /// Create a session for `user` and return its token.
    async fn issue(&self, user: &SessionUser, expires_at: DateTime<Utc>) -> SessionResult<String>;

    /// Backend name for readiness reporting.
    fn backend(&self) -> &'static str;
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn default_expiry() -> DateTime<Utc> {
    Utc::now() + Duration::days(SESSION_TTL_DAYS)
}

/// Sessions stored next to the catalog in SQLite (`users` + `sessions`).
#[derive(Clone)]
pub struct SqliteSessionStore {
    pub db: Arc<SqlitePool>,
}

impl SqliteSessionStore {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn find_user(&self, token: &str) -> SessionResult<Option<SessionUser>> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT s.token, u.id, u.name, u.email, s.expires_at
             FROM sessions s JOIN users u ON u.id = s.user_id
             WHERE s.token = ?",
        )
        .bind(token)
        .fetch_optional(&*self.db)
        .await?;

        Ok(session
            .filter(|s| s.is_live(Utc::now()))
            .map(|s| s.user))
    }

    async fn issue(&self, user: &SessionUser, expires_at: DateTime<Utc>) -> SessionResult<String> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO users (id, name, email, created_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, email = excluded.email",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(now)
        .execute(&*self.db)
        .await?;

        let token = new_token();
        sqlx::query(
            "INSERT INTO sessions (token, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&token)
        .bind(&user.id)
        .bind(expires_at)
        .bind(now)
        .execute(&*self.db)
        .await?;

        Ok(token)
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

/// Process-local fallback. Sessions do not survive a restart.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn find_user(&self, token: &str) -> SessionResult<Option<SessionUser>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(token)
            .filter(|s| s.is_live(Utc::now()))
            .map(|s| s.user.clone()))
    }

    async fn issue(&self, user: &SessionUser, expires_at: DateTime<Utc>) -> SessionResult<String> {
        let token = new_token();
        let session = Session {
            token: token.clone(),
            user: user.clone(),
            expires_at,
        };
        self.sessions.write().await.insert(token.clone(), session);
        Ok(token)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Convenience for building a user record with a fresh id.
pub fn new_user(name: impl Into<String>, email: Option<String>) -> SessionUser {
    SessionUser {
        id: ObjectId::new(),
        name: name.into(),
        email,
    }
}
