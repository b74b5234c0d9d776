//! Defines the endpoint for saving changes to a transaction.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::html;

use crate::{
    AppState, Error,
    alert::Alert,
    backend::TransactionStore,
    transaction::{
        core::{TransactionData, TransactionId},
        detail_page::transaction_detail,
        form::TransactionForm,
    },
};

/// The state needed to edit a transaction.
#[derive(Clone)]
pub struct EditTransactionState {
    /// The store for the signed-in user's transactions.
    pub transactions: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
        }
    }
}

/// A route handler for updating a transaction.
///
/// Responds with the transaction details as they are now stored, or an alert
/// if the update failed.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<String>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let transaction_id = TransactionId::new(transaction_id);
    let data = TransactionData::from(form);

    if let Err(error) = data.validate() {
        tracing::info!("Rejected changes to transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    if let Err(error) = state
        .transactions
        .update_transaction(&transaction_id, &data)
        .await
    {
        tracing::error!("Could not update transaction {transaction_id}: {error}");
        return Error::from(error).into_alert_response();
    }

    let transaction = match state.transactions.get_transaction(&transaction_id).await {
        Ok(transaction) => transaction,
        Err(error) => {
            tracing::error!("Could not get transaction {transaction_id} after update: {error}");
            return Error::from(error).into_alert_response();
        }
    };

    html! {
        (transaction_detail(&transaction))

        div id="alert-container" hx-swap-oob="innerHTML"
        {
            (Alert::success("Transaction saved", "").into_html())
        }
    }
    .into_response()
}
