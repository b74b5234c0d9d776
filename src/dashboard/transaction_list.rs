//! The table of the user's transactions shown under the dashboard summary.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency, link,
    },
    transaction::Transaction,
};

fn transaction_row(transaction: &Transaction) -> Markup {
    let url = format_endpoint(endpoints::TRANSACTION_VIEW, transaction.id.as_str());
    let amount = transaction.signed_amount();
    let amount_style = if amount.is_sign_negative() {
        "text-red-600 dark:text-red-400"
    } else {
        "text-emerald-600 dark:text-emerald-400"
    };
    let description = if transaction.description.is_empty() {
        transaction.category.as_str()
    } else {
        transaction.description.as_str()
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date.date) }
            td class=(TABLE_CELL_STYLE)
            {
                a href=(url) class=(LINK_STYLE) { (description) }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.category) }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(necessity) = transaction.necessity {
                    (necessity)
                }
            }
            td class={(TABLE_CELL_STYLE) " text-right whitespace-nowrap " (amount_style)}
            {
                (format_currency(amount))
            }
        }
    }
}

/// Renders `transactions` in the order given, most recent first.
pub(super) fn transaction_list_view(transactions: &[Transaction]) -> Markup {
    html! {
        section id="transactions" class="w-full mb-24 lg:mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Recent Transactions" }

            @if transactions.is_empty() {
                p class="text-gray-600 dark:text-gray-400"
                {
                    "No transactions yet. "
                    (link(endpoints::NEW_TRANSACTION_VIEW, "Add your first transaction"))
                    "."
                }
            } @else {
                div class="overflow-x-auto rounded-lg shadow"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Necessity" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(transaction))
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{expense_data, income_data, stored_transaction},
        transaction::{Category, Necessity},
    };

    use super::transaction_list_view;

    #[test]
    fn rows_link_to_transaction_page() {
        let transactions = vec![
            stored_transaction("7", expense_data(40, Category::Food, Necessity::Need)),
            stored_transaction("3", income_data(100)),
        ];

        let html = Html::parse_fragment(&transaction_list_view(&transactions).into_string());

        let links = html
            .select(&Selector::parse("tbody a").unwrap())
            .map(|a| a.value().attr("href").unwrap_or_default().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(
            links,
            vec![
                format_endpoint(endpoints::TRANSACTION_VIEW, "7"),
                format_endpoint(endpoints::TRANSACTION_VIEW, "3"),
            ]
        );

        let amounts = html
            .select(&Selector::parse("tbody td:last-child").unwrap())
            .map(|td| td.text().collect::<String>().trim().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(amounts, vec!["-$40.00", "$100.00"]);
    }

    #[test]
    fn empty_list_links_to_new_transaction_page() {
        let html = Html::parse_fragment(&transaction_list_view(&[]).into_string());

        assert!(html.select(&Selector::parse("table").unwrap()).next().is_none());
        let link = html
            .select(&Selector::parse("a").unwrap())
            .next()
            .expect("No link to add a transaction");
        assert_eq!(link.value().attr("href"), Some(endpoints::NEW_TRANSACTION_VIEW));
    }
}
