//! The identity types handed out by the hosted backend's auth service.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The backend's unique identifier for a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a backend user ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity a session grants access to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the backend.
    pub id: UserId,
    /// The email the user signed up with.
    #[serde(default)]
    pub email: Option<String>,
}

/// The live proof of authentication plus the user it belongs to.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The bearer token sent with every row request.
    pub access_token: String,
    /// The token used to get a new access token once it expires.
    pub refresh_token: String,
    /// When the access token expires, in seconds since the Unix epoch.
    pub expires_at: i64,
    /// The signed-in user.
    pub user: User,
}

impl Session {
    /// Whether the access token expires within `margin_seconds` from now.
    pub fn expires_within(&self, margin_seconds: i64) -> bool {
        let now = OffsetDateTime::now_utc().unix_timestamp();

        self.expires_at.saturating_sub(now) <= margin_seconds
    }
}

// Tokens must never end up in the logs.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"********")
            .field("refresh_token", &"********")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

/// The extra details stored for a user in the `profiles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// The ID of the user the profile belongs to.
    pub id: UserId,
    /// The user's first name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// The user's last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// The user's phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Everything needed to create an account.
///
/// The names and phone number are passed to the backend as sign-up metadata,
/// the backend creates the profile row from them.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct SignUpDetails {
    /// The user's first name.
    pub first_name: String,
    /// The user's last name.
    pub last_name: String,
    /// The user's phone number.
    #[serde(default)]
    pub phone: String,
    /// The email to sign in with.
    pub email: String,
    /// The password to sign in with.
    pub password: String,
}

impl std::fmt::Debug for SignUpDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpDetails")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone", &self.phone)
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}
