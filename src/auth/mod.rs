//! Signing in, signing up and signing out, plus the guard for pages that need
//! a signed-in user.

use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;

use crate::{AppState, backend::AuthService, backend::BackendError, session::SessionProvider};

mod log_in;
mod log_out;
mod middleware;
mod sign_up;
mod user;

pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use sign_up::{get_sign_up_page, post_sign_up};
pub use user::{Profile, Session, SignUpDetails, User, UserId};

/// How long an auth handler waits for the session provider to see the result
/// of a sign in or sign out before responding anyway.
const AUTH_CHANGE_TIMEOUT: Duration = Duration::from_secs(5);

/// The state needed to sign users in and out.
#[derive(Clone)]
pub struct AuthState {
    /// The auth service of the backend.
    pub auth: Arc<dyn AuthService>,
    /// Who is signed in.
    pub session: Arc<SessionProvider>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            auth: state.auth.clone(),
            session: state.session.clone(),
        }
    }
}

/// The message to show next to an auth form when the backend refused it.
fn auth_error_message(error: &BackendError) -> String {
    match error {
        BackendError::Unauthorized(message) | BackendError::Rejected { message, .. } => {
            message.clone()
        }
        BackendError::Transport(_) => {
            "Could not reach the server. Check your connection and try again.".to_owned()
        }
        _ => "An internal error occurred. Please try again later.".to_owned(),
    }
}
