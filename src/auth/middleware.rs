//! Authentication middleware that checks the session provider and handles redirects.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;

use crate::{endpoints, session::SessionProvider};

/// How long a request waits for the first session lookup before it is treated
/// as anonymous.
const SESSION_RESOLUTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Middleware function that checks the session provider for a signed-in user.
/// The user and the session state are placed into the request and then the
/// request executed normally if a user is signed in, otherwise the response
/// from `get_redirect` is returned.
#[inline]
async fn auth_guard_internal(
    session: Arc<SessionProvider>,
    mut request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let mut state = session.state();

    if state.loading {
        state = session
            .wait_until(|state| !state.loading, SESSION_RESOLUTION_TIMEOUT)
            .await
            .unwrap_or_else(|| {
                tracing::warn!("The session has not been resolved yet, treating request as anonymous.");
                session.state()
            });
    }

    let Some(user) = state.user.clone() else {
        return get_redirect(endpoints::LOG_IN_VIEW);
    };

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(state);

    next.run(request).await
}

/// Middleware function that checks for a signed-in user.
/// The user is placed into request and then the request executed normally if
/// a user is signed in, otherwise a redirect to the log-in page is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user): Extension<User>` to receive the user,
/// or `Extension(state): Extension<SessionState>` for the user's profile too.
pub async fn auth_guard(
    State(session): State<Arc<SessionProvider>>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(session, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Middleware function that checks for a signed-in user.
/// The user is placed into request and then the request executed normally if
/// a user is signed in, otherwise a HTMX redirect to the log-in page is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user): Extension<User>` to receive the user.
pub async fn auth_guard_hx(
    State(session): State<Arc<SessionProvider>>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(session, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}
