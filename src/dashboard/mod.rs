//! Dashboard module
//!
//! Provides the root page: the user's balance, income and expense totals,
//! spending per necessity tag, and the list of transactions.

mod cards;
mod charts;
mod handlers;
mod summary;
mod transaction_list;

pub use handlers::get_root_page;
pub use summary::Summary;
