//! Defines the templates and route handlers for the page to display for an internal server error.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub struct InternalServerErrorPage<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerErrorPage<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

/// Render the 500 page with the given explanation.
pub fn render_internal_server_error(page: InternalServerErrorPage) -> Response {
    let markup = error_view("Internal Server Error", "500", page.description, page.fix);

    (StatusCode::INTERNAL_SERVER_ERROR, Html(markup.into_string())).into_response()
}

pub async fn get_internal_server_error_page() -> Response {
    render_internal_server_error(InternalServerErrorPage::default())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_utils::{assert_valid_html, parse_html_document};

    use super::{InternalServerErrorPage, render_internal_server_error};

    #[tokio::test]
    async fn shows_description_and_fix() {
        let response = render_internal_server_error(InternalServerErrorPage {
            description: "Backend unreachable",
            fix: "Check the backend URL",
        });

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let text = document.root_element().text().collect::<String>();
        assert!(text.contains("Backend unreachable"));
        assert!(text.contains("Check the backend URL"));
    }
}
