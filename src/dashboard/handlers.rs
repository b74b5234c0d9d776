//! Dashboard HTTP handlers and view rendering.
//!
//! The root route shows one of three views depending on the session:
//! - a loading page while the first session lookup is in flight
//! - a landing page with links to log in or sign up for anonymous visitors
//! - the dashboard with the user's totals and transactions

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, PreEscaped, html};
use rust_decimal::Decimal;

use crate::{
    AppState,
    auth::User,
    backend::TransactionStore,
    dashboard::{
        cards::{necessity_cards_view, summary_cards_view},
        charts::{build_necessity_chart, chart_scripts, chart_view},
        summary::Summary,
        transaction_list::transaction_list_view,
    },
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, HeadElement, base, loading_spinner},
    navigation::NavBar,
    session::{SessionProvider, SessionState},
    transaction::Transaction,
};

/// How long the root route waits for the first session lookup before it
/// shows the loading page instead.
const SESSION_RESOLUTION_TIMEOUT: Duration = Duration::from_secs(2);

/// How often the loading page checks whether the session has resolved.
const LOADING_RELOAD_MILLISECONDS: u32 = 1000;

/// The state needed for displaying the dashboard page.
#[derive(Clone)]
pub struct DashboardState {
    /// Who is signed in.
    pub session: Arc<SessionProvider>,
    /// The store for the signed-in user's transactions.
    pub transactions: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            session: state.session.clone(),
            transactions: state.transactions.clone(),
        }
    }
}

/// Display the dashboard for a signed-in user, or the landing page otherwise.
pub async fn get_root_page(State(state): State<DashboardState>) -> Response {
    let mut session = state.session.state();

    if session.loading {
        match state
            .session
            .wait_until(|state| !state.loading, SESSION_RESOLUTION_TIMEOUT)
            .await
        {
            Some(resolved) => session = resolved,
            None => return loading_view().into_response(),
        }
    }

    let Some(user) = session.user.clone() else {
        return landing_view().into_response();
    };

    let transactions = list_transactions(state.transactions.as_ref(), &user).await;
    let summary = Summary::from_transactions(&transactions).with_opening_balance(Decimal::ZERO);

    dashboard_view(&session, &summary, &transactions).into_response()
}

/// The user's transactions, or an empty list if they could not be fetched.
async fn list_transactions(store: &dyn TransactionStore, user: &User) -> Vec<Transaction> {
    store
        .list_transactions(&user.id)
        .await
        .unwrap_or_else(|error| {
            tracing::error!("Could not get transactions for {}: {error}", user.id);
            Vec::new()
        })
}

fn loading_view() -> Markup {
    let reload_script = HeadElement::ScriptSource(PreEscaped(format!(
        "setTimeout(() => window.location.reload(), {LOADING_RELOAD_MILLISECONDS});"
    )));

    let content = html!(
        div
            id="loading"
            class="flex justify-center items-center min-h-screen text-xl text-gray-600 dark:text-gray-400"
        {
            (loading_spinner()) "Loading..."
        }
    );

    base("Loading", &[reload_script], &content)
}

fn landing_view() -> Markup {
    let content = html!(
        div
            id="landing"
            class="flex flex-col justify-center items-center min-h-screen px-6 text-center text-gray-900 dark:text-white"
        {
            h1 class="mb-4 text-6xl font-extrabold tracking-tight text-emerald-600 dark:text-emerald-500"
            {
                "Ledgr"
            }

            p class="max-w-lg mb-12 text-xl text-gray-600 dark:text-gray-400"
            {
                "Track your income and expenses, and see where your money goes."
            }

            div class="flex gap-4"
            {
                a href=(endpoints::LOG_IN_VIEW) class={"px-6 " (BUTTON_SECONDARY_STYLE)} { "Log In" }
                a href=(endpoints::SIGN_UP_VIEW) class={"px-6 " (BUTTON_PRIMARY_STYLE)} { "Sign Up" }
            }
        }
    );

    base("Welcome", &[], &content)
}

fn dashboard_view(session: &SessionState, summary: &Summary, transactions: &[Transaction]) -> Markup {
    let nav_bar = NavBar::new(endpoints::ROOT, session.display_name()).into_html();
    let chart = build_necessity_chart(summary);
    let scripts = chart.as_ref().map(chart_scripts);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (summary_cards_view(summary))
            (necessity_cards_view(summary))

            @if let Some(chart) = &chart {
                (chart_view(chart))
            }

            (transaction_list_view(transactions))
        }
    );

    match &scripts {
        Some(scripts) => base("Dashboard", scripts, &content),
        None => base("Dashboard", &[], &content),
    }
}
