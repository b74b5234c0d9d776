//! Transactions: the income and expense records kept in the hosted store.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the validated `TransactionData` sent to the store
//! - The form shared by the add and edit pages
//! - View handlers and htmx endpoints for creating, viewing, editing and deleting transactions

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod detail_page;
mod edit_endpoint;
mod form;

pub use core::{
    Category, Necessity, Transaction, TransactionData, TransactionDate, TransactionId,
    TransactionType,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_new_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use detail_page::get_transaction_page;
pub use edit_endpoint::edit_transaction_endpoint;
pub use form::get_category_options;
