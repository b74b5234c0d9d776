//! Defines the endpoint for deleting a transaction.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    AppState, Error, backend::TransactionStore, endpoints, transaction::core::TransactionId,
};

/// The state needed to delete a transaction.
#[derive(Clone)]
pub struct DeleteTransactionState {
    /// The store for the signed-in user's transactions.
    pub transactions: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
        }
    }
}

/// A route handler for deleting a transaction, redirects to the dashboard on
/// success and responds with an alert otherwise.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<String>,
) -> Response {
    let transaction_id = TransactionId::new(transaction_id);

    match state.transactions.delete_transaction(&transaction_id).await {
        Ok(()) => {
            tracing::info!("Deleted transaction {transaction_id}");
            (HxRedirect(endpoints::ROOT.to_owned()), StatusCode::OK).into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            Error::from(error).into_alert_response()
        }
    }
}
