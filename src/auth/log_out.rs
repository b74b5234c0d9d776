//! Log-out route handler that ends the session and redirects users.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    auth::{AUTH_CHANGE_TIMEOUT, AuthState},
    endpoints,
};

/// Sign the user out and redirect the client to the log-in page.
///
/// The redirect is sent once the session provider has cleared the user, so the
/// log-in page never sees the old session.
pub async fn get_log_out(State(state): State<AuthState>) -> Response {
    if let Err(error) = state.auth.sign_out().await {
        tracing::error!("Could not sign out: {error}");
    }

    let cleared = state
        .session
        .wait_until(|state| state.user.is_none(), AUTH_CHANGE_TIMEOUT)
        .await;

    if cleared.is_none() {
        tracing::warn!("Signed out but the session provider still has a user");
    }

    Redirect::to(endpoints::LOG_IN_VIEW).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode};

    use crate::{
        auth::AuthState,
        backend::memory::MemoryBackend,
        endpoints,
        test_utils::{get_header, resolved_app_state},
    };

    use super::get_log_out;

    #[tokio::test]
    async fn log_out_clears_user_and_redirects() {
        let state = resolved_app_state(Arc::new(MemoryBackend::signed_in())).await;
        assert!(state.session.state().user.is_some());

        let response = get_log_out(State(AuthState {
            auth: state.auth.clone(),
            session: state.session.clone(),
        }))
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::LOG_IN_VIEW);
        assert_eq!(state.session.state().user, None);
        assert_eq!(state.session.state().profile, None);
    }
}
