//! The page for viewing a single transaction, which doubles as its edit form.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState,
    backend::{BackendError, TransactionStore},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE,
        FORM_CONTAINER_STYLE, LINK_STYLE, base, format_currency, submit_button,
    },
    navigation::NavBar,
    not_found::get_404_not_found_response,
    session::SessionState,
    transaction::{
        core::{Transaction, TransactionDate, TransactionId},
        form::{TransactionFormState, transaction_form_fields},
    },
};

/// The state needed for the transaction page.
#[derive(Clone)]
pub struct TransactionPageState {
    /// The store for the signed-in user's transactions.
    pub transactions: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for TransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionPageQuery {
    /// Show the edit form instead of the details.
    #[serde(default)]
    pub edit: bool,
}

fn format_transaction_date(date: &TransactionDate) -> String {
    match date.time {
        Some(time) => format!("{} {:02}:{:02}", date.date, time.hour(), time.minute()),
        None => date.date.to_string(),
    }
}

/// The details of `transaction` with links to edit and delete it.
///
/// This is also the fragment returned after a successful edit, so it must be
/// self-contained.
pub fn transaction_detail(transaction: &Transaction) -> Markup {
    let view_url = format_endpoint(endpoints::TRANSACTION_VIEW, transaction.id.as_str());
    let api_url = format_endpoint(endpoints::TRANSACTION_API, transaction.id.as_str());
    let amount_style = if transaction.signed_amount().is_sign_negative() {
        "text-red-600 dark:text-red-400"
    } else {
        "text-emerald-600 dark:text-emerald-400"
    };
    let description = if transaction.description.is_empty() {
        "No description"
    } else {
        transaction.description.as_str()
    };

    html! {
        div id="transaction-detail" class={"w-full space-y-4 " (CARD_STYLE)}
        {
            h2 class="text-xl font-bold" { (description) }

            p id="amount" class={"text-3xl font-semibold " (amount_style)}
            {
                (format_currency(transaction.signed_amount()))
            }

            dl class="grid grid-cols-2 gap-2 text-sm"
            {
                dt class="text-gray-500 dark:text-gray-400" { "Date" }
                dd id="date" { (format_transaction_date(&transaction.date)) }

                dt class="text-gray-500 dark:text-gray-400" { "Type" }
                dd id="type" { (transaction.type_) }

                dt class="text-gray-500 dark:text-gray-400" { "Category" }
                dd id="category" { (transaction.category) }

                dt class="text-gray-500 dark:text-gray-400" { "Necessity" }
                dd id="necessity"
                {
                    @match transaction.necessity {
                        Some(necessity) => { (necessity) }
                        None => { "-" }
                    }
                }
            }

            div class="flex gap-3"
            {
                a
                    href={(view_url) "?edit=true"}
                    class={"text-center " (BUTTON_SECONDARY_STYLE)}
                {
                    "Edit"
                }

                button
                    type="button"
                    hx-delete=(api_url)
                    hx-confirm="Are you sure you want to delete this transaction? This cannot be undone."
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }

            a href=(endpoints::ROOT) class=(LINK_STYLE) { "Back to dashboard" }
        }
    }
}

fn edit_transaction_form(transaction: &Transaction) -> Markup {
    let view_url = format_endpoint(endpoints::TRANSACTION_VIEW, transaction.id.as_str());
    let api_url = format_endpoint(endpoints::TRANSACTION_API, transaction.id.as_str());
    let form_state = TransactionFormState::from_transaction(transaction);

    html! {
        form
            id="transaction-detail"
            hx-put=(api_url)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-disabled-elt="#submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "Edit Transaction" }

            (transaction_form_fields(&form_state))
            (submit_button("Save changes", "Saving...", BUTTON_PRIMARY_STYLE))

            a href=(view_url) class={"block text-center " (BUTTON_SECONDARY_STYLE)} { "Cancel" }
        }
    }
}

/// Display a transaction, or its edit form if `?edit=true`.
///
/// Renders the not found page if the store cannot return the transaction.
pub async fn get_transaction_page(
    State(state): State<TransactionPageState>,
    Path(transaction_id): Path<String>,
    Query(query): Query<TransactionPageQuery>,
    Extension(session): Extension<SessionState>,
) -> Response {
    let transaction_id = TransactionId::new(transaction_id);

    let transaction = match state.transactions.get_transaction(&transaction_id).await {
        Ok(transaction) => transaction,
        Err(BackendError::NotFound) => return get_404_not_found_response(),
        Err(error) => {
            tracing::error!("Could not get transaction {transaction_id}: {error}");
            return get_404_not_found_response();
        }
    };

    let nav_bar = NavBar::new(endpoints::TRANSACTION_VIEW, session.display_name()).into_html();
    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            @if query.edit {
                (edit_transaction_form(&transaction))
            } @else {
                (transaction_detail(&transaction))
            }
        }
    };

    base("Transaction", &[], &content).into_response()
}
