//! Ledgr is a web app for tracking personal income and expenses.
//!
//! This library serves HTML pages directly. It keeps no data of its own: sign
//! in, sign up and every transaction row live in a hosted backend, which is
//! reached through the traits in [backend]. The server process holds the one
//! live session and republishes it through a [SessionProvider].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod auth_events;
pub mod backend;
mod dashboard;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod session;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{Profile, Session, SignUpDetails, User, UserId};
pub use auth_events::{AuthEvent, AuthEventKind, AuthEvents, AuthSubscription, SubscriptionError};
pub use dashboard::Summary;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use session::{SessionProvider, SessionState};
pub use timezone::get_local_offset;
pub use transaction::{
    Category, Necessity, Transaction, TransactionData, TransactionDate, TransactionId,
    TransactionType,
};

use crate::{
    alert::Alert,
    backend::BackendError,
    internal_server_error::{InternalServerErrorPage, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
        },
    }

    handle.graceful_shutdown(Some(Duration::from_secs(1)));
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The hosted backend could not complete a request.
    ///
    /// The message from the backend may be shown to the user for auth
    /// failures, all other backend errors are only logged.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The category does not belong to the transaction type, e.g. "Salary"
    /// for an expense.
    #[error("{category} is not a valid category for {type_} transactions")]
    InvalidCategory {
        /// The category that was submitted.
        category: Category,
        /// The transaction type that was submitted.
        type_: TransactionType,
    },

    /// The amount of a transaction was zero or negative.
    ///
    /// The sign of a transaction is given by its type, so amounts are always
    /// stored as positive magnitudes.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(Decimal),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The configured timezone is not a canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::Backend(BackendError::NotFound) => {
                get_404_not_found_response()
            }
            Error::InvalidTimezone(timezone) => {
                render_internal_server_error(InternalServerErrorPage {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                })
            }
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    /// Render the error as an alert fragment for htmx forms.
    ///
    /// The form that sent the request is left untouched so the user can fix
    /// the input and submit it again.
    pub(crate) fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidCategory { category, type_ } => Alert::error(
                "Invalid category",
                &format!("{category} cannot be used for {type_} transactions."),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidAmount(amount) => Alert::error(
                "Invalid amount",
                &format!("{amount} is not a valid amount. Enter an amount greater than zero."),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::NotFound | Error::Backend(BackendError::NotFound) => Alert::error(
                "Transaction not found",
                "The transaction could not be found. \
                Try refreshing the page to see if it has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::Backend(BackendError::NotSignedIn | BackendError::Unauthorized(_)) => {
                Alert::error(
                    "Not signed in",
                    "Your session has ended. Log in again and resubmit the form.",
                )
                .into_response_with_status(StatusCode::UNAUTHORIZED)
            }
            Error::InvalidTimezone(timezone) => Alert::error(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            )
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                Alert::error(
                    "Something went wrong",
                    "The request could not be completed. Check your connection and try again.",
                )
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
