#![allow(missing_docs)]

use std::{sync::Arc, time::Duration};

use rust_decimal::Decimal;
use time::{Date, macros::date};

use crate::{
    AppState,
    backend::memory::MemoryBackend,
    auth::UserId,
    transaction::{
        Category, Necessity, Transaction, TransactionData, TransactionDate, TransactionId,
        TransactionType,
    },
};

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use form::{
    assert_form_error_message, assert_form_input, assert_form_input_with_value,
    assert_form_submit_button, assert_hx_endpoint, assert_selected_option, must_get_form,
};
pub(crate) use html::{assert_valid_html, element_text, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_content_type, assert_hx_redirect, assert_status_ok, get_header};

pub(crate) const TEST_TIMEZONE: &str = "Etc/UTC";
pub(crate) const TEST_DATE: Date = date!(2025 - 03 - 01);

/// App state backed by `backend` once the session provider has looked up the
/// existing session.
pub(crate) async fn resolved_app_state(backend: Arc<MemoryBackend>) -> AppState {
    let state = AppState::new(backend, TEST_TIMEZONE);

    state
        .session
        .wait_until(|state| !state.loading, Duration::from_secs(2))
        .await
        .expect("Session provider never resolved");

    state
}

pub(crate) fn expense_data(amount: i64, category: Category, necessity: Necessity) -> TransactionData {
    TransactionData {
        amount: Decimal::new(amount, 0),
        date: TEST_DATE,
        description: format!("{category} expense"),
        type_: TransactionType::Expense,
        category,
        necessity,
    }
}

pub(crate) fn income_data(amount: i64) -> TransactionData {
    TransactionData {
        amount: Decimal::new(amount, 0),
        date: TEST_DATE,
        description: "Pay day".to_owned(),
        type_: TransactionType::Income,
        category: Category::Salary,
        necessity: Necessity::Need,
    }
}

/// A transaction as the store would return it after inserting `data`.
pub(crate) fn stored_transaction(id: &str, data: TransactionData) -> Transaction {
    Transaction {
        id: TransactionId::new(id),
        amount: data.amount,
        date: TransactionDate::from_date(data.date),
        description: data.description,
        type_: data.type_,
        category: data.category,
        necessity: Some(data.necessity),
        owner: UserId::new("user-1"),
    }
}
