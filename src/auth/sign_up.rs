//! The sign-up page and the handler that creates accounts in the backend.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    auth::{AUTH_CHANGE_TIMEOUT, AuthState, SignUpDetails, auth_error_message},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, auth_card,
        base, form_error, link, password_input, submit_button, text_input,
    },
};

/// The backend rejects shorter passwords.
const MIN_PASSWORD_LENGTH: u8 = 6;

fn sign_up_form(details: Option<&SignUpDetails>, error_message: Option<&str>) -> Markup {
    let first_name = details.map(|details| details.first_name.as_str()).unwrap_or("");
    let last_name = details.map(|details| details.last_name.as_str()).unwrap_or("");
    let phone = details.map(|details| details.phone.as_str()).unwrap_or("");
    let email = details.map(|details| details.email.as_str()).unwrap_or("");

    html! {
        form
            hx-post=(endpoints::SIGN_UP_API)
            hx-swap="outerHTML"
            hx-disabled-elt="find input, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            div class="grid grid-cols-2 gap-4"
            {
                (text_input("first_name", "First name", "text", first_name, true))
                (text_input("last_name", "Last name", "text", last_name, true))
            }

            div
            {
                label for="phone" class=(FORM_LABEL_STYLE) { "Phone (optional)" }

                input
                    type="tel"
                    name="phone"
                    id="phone"
                    value=(phone)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (text_input("email", "Email", "email", email, true))
            (password_input(MIN_PASSWORD_LENGTH))
            (form_error(error_message))
            (submit_button("Sign up", "Creating account...", BUTTON_PRIMARY_STYLE))

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                    "Log in here"
                }
            }
        }
    }
}

fn confirm_email_message(email: &str) -> Markup {
    html! {
        div class="space-y-4 text-gray-900 dark:text-white"
        {
            p { "Your account has been created. We sent a confirmation link to " (email) "." }
            p { "Once you have confirmed your email you can " (link(endpoints::LOG_IN_VIEW, "log in")) "." }
        }
    }
}

/// Display the sign-up page.
pub async fn get_sign_up_page() -> Response {
    let content = auth_card("Create an account", &sign_up_form(None, None));

    base("Sign Up", &[], &content).into_response()
}

/// Handler for sign-up requests via the POST method.
///
/// On success the new user is signed in and redirected to the dashboard, or
/// asked to confirm their email if the backend requires it. On failure the
/// form is returned with everything except the password filled in.
pub async fn post_sign_up(
    State(state): State<AuthState>,
    Form(details): Form<SignUpDetails>,
) -> Response {
    match state.auth.sign_up(&details).await {
        Ok(Some(session)) => {
            let user_id = session.user.id;
            let seen = state
                .session
                .wait_until(
                    |state| state.is_settled_for(&user_id),
                    AUTH_CHANGE_TIMEOUT,
                )
                .await;

            if seen.is_none() {
                tracing::warn!(
                    "Signed up user {user_id} but the session provider has not seen it yet"
                );
            }

            (HxRedirect(endpoints::ROOT.to_owned()), StatusCode::OK).into_response()
        }
        Ok(None) => confirm_email_message(&details.email).into_response(),
        Err(error) => {
            tracing::info!("Sign up failed: {error}");
            let message = auth_error_message(&error);

            sign_up_form(Some(&details), Some(&message)).into_response()
        }
    }
}
