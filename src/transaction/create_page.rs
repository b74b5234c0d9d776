//! Defines the route handler for the page for creating a new transaction.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, submit_button},
    navigation::NavBar,
    session::SessionState,
    timezone::local_today,
    transaction::form::{TransactionFormState, transaction_form_fields},
};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn new_transaction_view(form_state: &TransactionFormState, display_name: Option<&str>) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW, display_name).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error="#alert-container"
                hx-disabled-elt="#submit-button"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Transaction" }

                (transaction_form_fields(form_state))
                (submit_button("Add transaction", "Saving...", BUTTON_PRIMARY_STYLE))
            }
        }
    };

    base("Add Transaction", &[], &content)
}

/// Renders the page for creating a transaction.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
    Extension(session): Extension<SessionState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let form_state = TransactionFormState::new(today);

    Ok(new_transaction_view(&form_state, session.display_name()).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};

    use crate::{
        endpoints,
        session::SessionState,
        test_utils::{
            TEST_TIMEZONE, assert_form_input, assert_form_submit_button, assert_hx_endpoint,
            assert_selected_option, assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::{NewTransactionPageState, get_new_transaction_page};

    #[tokio::test]
    async fn new_transaction_page_displays_form() {
        let state = NewTransactionPageState {
            local_timezone: TEST_TIMEZONE.to_owned(),
        };

        let response = get_new_transaction_page(State(state), Extension(SessionState::default()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_eq!(form.value().attr("hx-target-error"), Some("#alert-container"));
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "date", "date");
        assert_selected_option(&form, "category", "Food");
        assert_selected_option(&form, "necessity", "Need");
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn invalid_timezone_renders_error_page() {
        let state = NewTransactionPageState {
            local_timezone: "Middle/Earth".to_owned(),
        };

        let response = get_new_transaction_page(State(state), Extension(SessionState::default()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
