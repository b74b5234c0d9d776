//! Defines the endpoint for creating a new transaction.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    AppState, Error,
    auth::User,
    backend::TransactionStore,
    endpoints,
    transaction::{core::TransactionData, form::TransactionForm},
};

/// The state needed to create a transaction.
#[derive(Clone)]
pub struct CreateTransactionState {
    /// The store for the signed-in user's transactions.
    pub transactions: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
        }
    }
}

/// A route handler for creating a new transaction, redirects to the dashboard on success.
///
/// On failure an alert is returned and the form is left as the user filled it in.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user): Extension<User>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let data = TransactionData::from(form);

    if let Err(error) = data.validate() {
        tracing::info!("Rejected new transaction: {error}");
        return error.into_alert_response();
    }

    match state.transactions.insert_transaction(&user.id, &data).await {
        Ok(transaction) => {
            tracing::info!("Created transaction {}", transaction.id);
            (HxRedirect(endpoints::ROOT.to_owned()), StatusCode::OK).into_response()
        }
        Err(error) => {
            tracing::error!("Could not create transaction: {error}");
            Error::from(error).into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, atomic::Ordering};

    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use rust_decimal::Decimal;

    use crate::{
        backend::memory::{MemoryBackend, test_user},
        endpoints,
        test_utils::{TEST_DATE, assert_hx_redirect},
        transaction::{
            core::{Category, Necessity, TransactionType},
            form::TransactionForm,
        },
    };

    use super::{CreateTransactionState, create_transaction_endpoint};

    fn form(type_: TransactionType, category: Category) -> TransactionForm {
        TransactionForm {
            amount: Decimal::new(1230, 2),
            date: TEST_DATE,
            description: "test transaction".to_owned(),
            type_,
            category,
            necessity: Necessity::Want,
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let backend = Arc::new(MemoryBackend::signed_in());
        let state = CreateTransactionState {
            transactions: backend.clone(),
        };

        let response = create_transaction_endpoint(
            State(state),
            Extension(test_user()),
            Form(form(TransactionType::Expense, Category::Food)),
        )
        .await;

        assert_hx_redirect(&response, endpoints::ROOT);
        let transactions = backend.transactions();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, Decimal::new(1230, 2));
        assert_eq!(transactions[0].description, "test transaction");
        assert_eq!(transactions[0].owner, test_user().id);
    }

    #[tokio::test]
    async fn rejects_category_of_other_type() {
        let backend = Arc::new(MemoryBackend::signed_in());
        let state = CreateTransactionState {
            transactions: backend.clone(),
        };

        let response = create_transaction_endpoint(
            State(state),
            Extension(test_user()),
            Form(form(TransactionType::Income, Category::Food)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get("hx-redirect").is_none());
        assert!(backend.transactions().is_empty());
    }

    #[tokio::test]
    async fn store_failure_returns_alert() {
        let backend = Arc::new(MemoryBackend::signed_in());
        backend.fail_rows.store(true, Ordering::SeqCst);
        let state = CreateTransactionState {
            transactions: backend.clone(),
        };

        let response = create_transaction_endpoint(
            State(state),
            Extension(test_user()),
            Form(form(TransactionType::Expense, Category::Food)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get("hx-redirect").is_none());
    }
}
