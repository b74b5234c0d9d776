//! Contains traits and implementations for the hosted backend that stores
//! every account and transaction.
//!
//! The backend offers three services: an auth service that signs users in and
//! out and publishes [AuthEvents](crate::AuthEvents), a transaction table and
//! a profile table. Handlers only see the traits so they can be tested against
//! an in-memory backend.

use async_trait::async_trait;

use crate::{
    auth::{Profile, Session, SignUpDetails, UserId},
    auth_events::AuthSubscription,
    transaction::{Transaction, TransactionData, TransactionId},
};

mod hosted;
#[cfg(test)]
pub(crate) mod memory;

pub use hosted::{BackendConfig, HostedBackend};

/// The errors that may occur when talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The credentials or the access token were rejected.
    #[error("{0}")]
    Unauthorized(String),

    /// The requested row does not exist, or belongs to another user.
    #[error("the requested row could not be found")]
    NotFound,

    /// The backend refused the request, e.g. an email that is already
    /// registered or a row that breaks a table constraint.
    #[error("{message}")]
    Rejected {
        /// The HTTP status the backend responded with.
        status: u16,
        /// The reason given by the backend.
        message: String,
    },

    /// The backend could not be reached.
    #[error("could not reach the backend: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend responded with a body that could not be understood.
    #[error("could not decode the backend response: {0}")]
    Decode(String),

    /// A row request was made without a session.
    #[error("no user is signed in")]
    NotSignedIn,

    /// The session file could not be read or written.
    #[error("could not access the session file: {0}")]
    Io(String),

    /// The configured backend URL cannot be used to build request URLs.
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),
}

/// Handles signing users in and out.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// The current session, if a user is signed in.
    ///
    /// An expired session is refreshed first. If that fails the user is signed
    /// out and `None` is returned.
    async fn get_session(&self) -> Result<Option<Session>, BackendError>;

    /// Sign in with an email and password.
    ///
    /// # Errors
    /// Returns [BackendError::Unauthorized] with the backend's message if the
    /// credentials are wrong.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError>;

    /// Create an account.
    ///
    /// Returns the new session, or `None` if the backend requires the user to
    /// confirm their email before signing in.
    async fn sign_up(&self, details: &SignUpDetails) -> Result<Option<Session>, BackendError>;

    /// End the current session.
    ///
    /// The local session is cleared even if the backend could not be told.
    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Listen for sign-in, sign-out and token refresh events.
    fn subscribe(&self) -> AuthSubscription;
}

/// Handles the creation and retrieval of transactions.
///
/// Row-level security in the backend limits every request to the signed-in
/// user's rows.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Retrieve `owner`'s transactions, most recent first.
    async fn list_transactions(&self, owner: &UserId) -> Result<Vec<Transaction>, BackendError>;

    /// Retrieve a single transaction.
    ///
    /// # Errors
    /// Returns [BackendError::NotFound] if there is no row with `id`.
    async fn get_transaction(&self, id: &TransactionId) -> Result<Transaction, BackendError>;

    /// Create a new transaction owned by `owner`.
    async fn insert_transaction(
        &self,
        owner: &UserId,
        data: &TransactionData,
    ) -> Result<Transaction, BackendError>;

    /// Replace the editable fields of the transaction `id`.
    ///
    /// # Errors
    /// Returns [BackendError::NotFound] if there is no row with `id`.
    async fn update_transaction(
        &self,
        id: &TransactionId,
        data: &TransactionData,
    ) -> Result<Transaction, BackendError>;

    /// Remove the transaction `id`.
    ///
    /// # Errors
    /// Returns [BackendError::NotFound] if there is no row with `id`.
    async fn delete_transaction(&self, id: &TransactionId) -> Result<(), BackendError>;
}

/// Retrieves the extra user details kept next to the auth identity.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// The profile for `user_id`, or `None` if the backend has no profile row
    /// for the user.
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>, BackendError>;
}
