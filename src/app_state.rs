//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    backend::{AuthService, ProfileStore, TransactionStore},
    session::SessionProvider,
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// Signs users in and out.
    pub auth: Arc<dyn AuthService>,

    /// The signed-in user's transactions.
    pub transactions: Arc<dyn TransactionStore>,

    /// Who is signed in, shared by every request.
    pub session: Arc<SessionProvider>,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] backed by `backend` and mount the session
    /// provider.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    /// Must be called from within a tokio runtime.
    pub fn new<B>(backend: Arc<B>, local_timezone: &str) -> Self
    where
        B: AuthService + TransactionStore + ProfileStore + 'static,
    {
        let session = SessionProvider::mount(backend.clone(), backend.clone());

        Self {
            auth: backend.clone(),
            transactions: backend,
            session: Arc::new(session),
            local_timezone: local_timezone.to_owned(),
        }
    }
}

impl FromRef<AppState> for Arc<SessionProvider> {
    fn from_ref(state: &AppState) -> Self {
        state.session.clone()
    }
}
