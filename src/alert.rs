//! Alert messages for reporting the outcome of a form submission.
//!
//! Alerts are rendered as fragments and swapped into the page's alert
//! container by htmx, so the form that sent the request keeps its values.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Success,
    Error,
}

/// A dismissable message with a headline and optional details.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new success alert
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    pub fn into_html(self) -> Markup {
        let colours = match self.alert_type {
            AlertType::Success => {
                "text-green-800 border-green-300 bg-green-50 dark:bg-gray-800 \
                dark:text-green-400 dark:border-green-800"
            }
            AlertType::Error => {
                "text-red-800 border-red-300 bg-red-50 dark:bg-gray-800 \
                dark:text-red-400 dark:border-red-800"
            }
        };

        html! {
            div
                id="alert"
                role="alert"
                class={"flex items-start p-4 mb-4 border rounded-lg " (colours)}
            {
                div class="flex-1"
                {
                    p class="font-medium" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="text-sm mt-1" { (self.details) }
                    }
                }

                button
                    type="button"
                    aria-label="Close"
                    class="ms-3 font-bold"
                    onclick="this.closest('#alert').remove()"
                {
                    "×"
                }
            }
        }
    }

    /// Render the alert with `status`.
    ///
    /// htmx only swaps error responses into the alert container, so failures
    /// must use a 4xx or 5xx status.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, self.into_html()).into_response()
    }
}
