//! Users and login sessions.

use serde::{Deserialize, Serialize};

use super::Id;
use crate::envelope::Pagination;
use crate::media::MediaBase;

const DEFAULT_ROLE: &str = "user";

/// A user as the downstream stores it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Record key.
    pub id: Id,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address.
    pub email: String,
    /// Role (`user`, `host`, `admin`, ...).
    #[serde(default)]
    pub role: Option<String>,
    /// Stored avatar path.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Whether the account is active.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Downstream reply of `GET /api/admin/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserList {
    /// Users on this page.
    pub users: Vec<UserRecord>,
    /// Paging information.
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Downstream reply of single-user endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct UserDetail {
    /// The user.
    pub user: UserRecord,
}

/// Outbound user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Record key.
    pub id: Id,
    /// Display name, empty when unknown.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role.
    pub role: String,
    /// Absolute avatar URL.
    pub avatar: Option<String>,
    /// Whether the account is active.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: Option<String>,
}

impl User {
    /// Map a downstream record.
    #[must_use]
    pub fn from_record(record: UserRecord, media: &MediaBase) -> Self {
        Self {
            id: record.id,
            name: record.name.unwrap_or_default(),
            email: record.email,
            role: record.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            avatar: media.resolve_opt(record.avatar.as_deref()),
            is_active: record.is_active.unwrap_or(true),
            created_at: record.created_at,
        }
    }
}

/// Payload of downstream login and registration replies.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRecord {
    /// Bearer token for the new session.
    #[serde(default)]
    pub token: Option<String>,
    /// The authenticated user.
    #[serde(default)]
    pub user: Option<UserRecord>,
}

/// Outbound login session.
///
/// The token is echoed to the client as well as set in the session cookie so
/// client-rendered pages can attach it to their own calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    /// Bearer token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// The authenticated user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Session {
    /// Map a downstream session payload.
    #[must_use]
    pub fn from_record(record: SessionRecord, media: &MediaBase) -> Self {
        Self {
            token: record.token.filter(|t| !t.is_empty()),
            user: record.user.map(|u| User::from_record(u, media)),
        }
    }
}
