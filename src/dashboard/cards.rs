//! Card components for the dashboard's summary figures.
//!
//! Provides:
//! - The balance, income and expense totals
//! - Spending per necessity tag with its share of all tagged spending

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    dashboard::summary::Summary,
    html::{CARD_STYLE, format_currency, format_percentage},
};

const POSITIVE_STYLE: &str = "text-emerald-600 dark:text-emerald-400";
const NEGATIVE_STYLE: &str = "text-red-600 dark:text-red-400";

fn total_card(id: &str, title: &str, amount: Decimal, amount_style: &str) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE)
        {
            h3 class="text-sm text-gray-600 dark:text-gray-400 mb-2" { (title) }

            p class={"text-3xl font-bold " (amount_style)}
            {
                (format_currency(amount))
            }
        }
    }
}

/// Renders the balance, income and expense cards.
pub(super) fn summary_cards_view(summary: &Summary) -> Markup {
    let balance_style = if summary.balance.is_sign_negative() {
        NEGATIVE_STYLE
    } else {
        POSITIVE_STYLE
    };

    html! {
        section class="w-full grid grid-cols-1 md:grid-cols-3 gap-4 mb-8"
        {
            (total_card("total-balance", "Total Balance", summary.balance, balance_style))
            (total_card("total-income", "Income", summary.total_income, POSITIVE_STYLE))
            (total_card("total-expense", "Expenses", summary.total_expense, NEGATIVE_STYLE))
        }
    }
}

/// Renders one card per necessity tag.
pub(super) fn necessity_cards_view(summary: &Summary) -> Markup {
    html! {
        section class="w-full mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Spending by Necessity" }

            div class="grid grid-cols-2 lg:grid-cols-4 gap-4"
            {
                @for (tag, total, share) in summary.tag_breakdown() {
                    div
                        id={"necessity-" (tag.as_str().to_lowercase())}
                        class=(CARD_STYLE)
                        aria-label=(format!("{tag}: {} ({})", format_currency(total), format_percentage(share)))
                    {
                        h4 class="text-lg font-semibold mb-2" { (tag) }

                        div class="text-2xl font-bold mb-1" { (format_currency(total)) }

                        div class="text-sm text-gray-600 dark:text-gray-400"
                        {
                            span class="share" { (format_percentage(share)) } " of tagged spending"
                        }

                        div class="w-full h-2 mt-3 rounded bg-gray-200 dark:bg-gray-700"
                        {
                            div
                                class="h-2 rounded bg-emerald-600"
                                style=(format!("width: {share}%"))
                            {}
                        }
                    }
                }
            }
        }
    }
}
