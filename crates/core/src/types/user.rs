//! User profile and session types.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// A user profile as resolved from the auth backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    /// Full display name.
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Company name, when the directory provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// A login session: an opaque token paired with the user it belongs to.
///
/// Token and user are one atomic unit of login state - there is never a
/// session with one but not the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}
