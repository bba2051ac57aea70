//! Authenticated users as seen through a session cookie.

use super::object_id::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The user behind a valid session. Inserted into request extensions by the
/// session guard.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct SessionUser {
    pub id: ObjectId,
    pub name: String,
    pub email: Option<String>,
}

/// A stored session row joined with its user.
#[derive(Clone, FromRow, Debug)]
pub struct Session {
    pub token: String,
    #[sqlx(flatten)]
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}
