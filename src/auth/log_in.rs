//! This file defines the routes for displaying the log-in page and handling log-in requests.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    auth::{AUTH_CHANGE_TIMEOUT, AuthState, auth_error_message},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, LINK_STYLE, auth_card, base, form_error, password_input,
        submit_button, text_input,
    },
};

fn log_in_form(email: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-swap="outerHTML"
            hx-disabled-elt="#email, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (text_input("email", "Email", "email", email, true))
            (password_input(0))
            (form_error(error_message))
            (submit_button("Log in", "Logging in...", BUTTON_PRIMARY_STYLE))

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account? "
                a href=(endpoints::SIGN_UP_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                    "Sign up here"
                }
            }
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Response {
    let content = auth_card("Log in to your account", &log_in_form("", None));

    base("Log In", &[], &content).into_response()
}

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request the client is redirected to the dashboard
/// once the session provider has seen the new user. Otherwise, the form is
/// returned with the backend's explanation of the problem.
pub async fn post_log_in(
    State(state): State<AuthState>,
    Form(log_in_data): Form<LogInData>,
) -> Response {
    let session = match state
        .auth
        .sign_in_with_password(&log_in_data.email, &log_in_data.password)
        .await
    {
        Ok(session) => session,
        Err(error) => {
            tracing::info!("Log in failed: {error}");
            let message = auth_error_message(&error);

            return log_in_form(&log_in_data.email, Some(&message)).into_response();
        }
    };

    let user_id = session.user.id;
    let seen = state
        .session
        .wait_until(
            |state| state.is_settled_for(&user_id),
            AUTH_CHANGE_TIMEOUT,
        )
        .await;

    if seen.is_none() {
        tracing::warn!("Signed in user {user_id} but the session provider has not seen it yet");
    }

    (HxRedirect(endpoints::ROOT.to_owned()), StatusCode::OK).into_response()
}

#[cfg(test)]
mod log_in_page_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        test_utils::{
            assert_content_type, assert_form_input, assert_form_submit_button, assert_hx_endpoint,
            assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::get_log_in_page;

    #[tokio::test]
    async fn log_in_page_displays_form() {
        let response = get_log_in_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html");

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::LOG_IN_API, "hx-post");
        assert_form_input(&form, "email", "email");
        assert_form_input(&form, "password", "password");
        assert_form_submit_button(&form);

        let sign_up_link = form
            .select(&scraper::Selector::parse("a[href]").unwrap())
            .next()
            .expect("No sign up link");
        assert_eq!(
            sign_up_link.value().attr("href"),
            Some(endpoints::SIGN_UP_VIEW)
        );
    }
}

#[cfg(test)]
mod log_in_tests {
    use std::sync::Arc;

    use axum::{Form, extract::State, http::StatusCode};

    use crate::{
        auth::{AuthState, Profile, UserId},
        backend::memory::{MemoryBackend, TEST_EMAIL, TEST_PASSWORD, TEST_USER_ID},
        endpoints,
        test_utils::{
            assert_form_error_message, assert_form_input_with_value, assert_hx_redirect,
            assert_valid_html, must_get_form, parse_html_fragment, resolved_app_state,
        },
    };

    use super::{LogInData, post_log_in};

    async fn auth_state(backend: Arc<MemoryBackend>) -> AuthState {
        let state = resolved_app_state(backend).await;

        AuthState {
            auth: state.auth.clone(),
            session: state.session.clone(),
        }
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let state = auth_state(Arc::new(MemoryBackend::new())).await;

        let response = post_log_in(
            State(state.clone()),
            Form(LogInData {
                email: TEST_EMAIL.to_owned(),
                password: TEST_PASSWORD.to_owned(),
            }),
        )
        .await;

        assert_hx_redirect(&response, endpoints::ROOT);
        assert_eq!(
            state.session.state().user.map(|user| user.id),
            Some(UserId::new(TEST_USER_ID))
        );
    }

    #[tokio::test]
    async fn log_in_redirects_after_profile_is_fetched() {
        let backend = Arc::new(MemoryBackend::new());
        backend.add_profile(Profile {
            id: UserId::new(TEST_USER_ID),
            first_name: Some("Ada".to_owned()),
            last_name: None,
            phone: None,
        });
        let state = auth_state(backend).await;

        let response = post_log_in(
            State(state.clone()),
            Form(LogInData {
                email: TEST_EMAIL.to_owned(),
                password: TEST_PASSWORD.to_owned(),
            }),
        )
        .await;

        assert_hx_redirect(&response, endpoints::ROOT);
        let session = state.session.state();
        assert!(!session.profile_pending);
        assert_eq!(session.display_name(), Some("Ada"));
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let state = auth_state(Arc::new(MemoryBackend::new())).await;

        let response = post_log_in(
            State(state.clone()),
            Form(LogInData {
                email: TEST_EMAIL.to_owned(),
                password: "wrongpassword".to_owned(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("hx-redirect").is_none());

        let document = parse_html_fragment(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_form_error_message(&form, "Invalid login credentials");
        assert_form_input_with_value(&form, "email", "email", TEST_EMAIL);
        assert_form_input_with_value(&form, "password", "password", "");
        assert_eq!(state.session.state().user, None);
    }
}
