//! The fields shared by the add and edit transaction forms.

use axum::extract::Query;
use maud::{Markup, html};
use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;

use crate::{
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::core::{
        Category, Necessity, Transaction, TransactionData, TransactionType, deserialize_iso_date,
    },
};

/// The order the type radio buttons are shown in.
const TRANSACTION_TYPES: [TransactionType; 2] = [TransactionType::Expense, TransactionType::Income];

/// The values shown in a transaction form.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFormState {
    pub amount: Option<Decimal>,
    pub date: Date,
    pub description: String,
    pub type_: TransactionType,
    pub category: Category,
    pub necessity: Necessity,
}

impl TransactionFormState {
    /// An empty expense dated `today`.
    pub fn new(today: Date) -> Self {
        let mut state = Self {
            amount: None,
            date: today,
            description: String::new(),
            type_: TransactionType::Expense,
            category: Category::Other,
            necessity: Necessity::Need,
        };
        state.set_type(TransactionType::Expense);

        state
    }

    /// The values of an existing transaction, for editing.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            amount: Some(transaction.amount),
            date: transaction.date.date,
            description: transaction.description.clone(),
            type_: transaction.type_,
            category: transaction.category,
            necessity: transaction.necessity.unwrap_or(Necessity::Need),
        }
    }

    /// Change the transaction type.
    ///
    /// The category is always reset to the first category for `type_`, even
    /// if the type is unchanged.
    pub fn set_type(&mut self, type_: TransactionType) {
        self.type_ = type_;
        self.category = Category::first_for(type_);
    }
}

/// The `<select>` for the categories of `type_` with `selected` chosen.
///
/// The type radio buttons swap this element out when the type changes.
pub fn category_select(type_: TransactionType, selected: Category) -> Markup {
    html! {
        select
            name="category"
            id="category"
            required
            class=(FORM_TEXT_INPUT_STYLE)
        {
            @for category in Category::options_for(type_) {
                option value=(category.as_str()) selected[*category == selected] { (category) }
            }
        }
    }
}

pub fn transaction_form_fields(state: &TransactionFormState) -> Markup {
    let amount = state.amount.map(|amount| format!("{amount:.2}"));

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for type_ in TRANSACTION_TYPES {
                    @let id = format!("transaction-type-{}", type_.as_str().to_lowercase());

                    div class="flex flex-1 items-center"
                    {
                        input
                            name="type_"
                            id=(id)
                            type="radio"
                            value=(type_.as_str())
                            checked[type_ == state.type_]
                            required
                            tabindex="0"
                            hx-get=(endpoints::CATEGORY_OPTIONS)
                            hx-trigger="change"
                            hx-target="#category"
                            hx-swap="outerHTML"
                            class=(FORM_RADIO_INPUT_STYLE);

                        label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (type_) }
                    }
                }
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                min="0.01"
                placeholder="0.00"
                required
                value=[amount.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                value=(state.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                value=(state.description)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            (category_select(state.type_, state.category))
        }

        div
        {
            label for="necessity" class=(FORM_LABEL_STYLE) { "Necessity" }

            select name="necessity" id="necessity" required class=(FORM_TEXT_INPUT_STYLE)
            {
                @for necessity in Necessity::ALL {
                    option
                        value=(necessity.as_str())
                        selected[necessity == state.necessity]
                    {
                        (necessity)
                    }
                }
            }
        }
    }
}

/// The query for [get_category_options].
#[derive(Debug, Deserialize)]
pub struct CategoryOptionsQuery {
    /// The newly selected transaction type.
    pub type_: TransactionType,
}

/// Render the category `<select>` for a newly selected transaction type, with
/// the first category chosen.
pub async fn get_category_options(Query(query): Query<CategoryOptionsQuery>) -> Markup {
    category_select(query.type_, Category::first_for(query.type_))
}

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// How much money was spent or earned.
    pub amount: Decimal,
    /// When the transaction happened.
    #[serde(deserialize_with = "deserialize_iso_date")]
    pub date: Date,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
    /// Whether money was earned or spent.
    pub type_: TransactionType,
    /// What the transaction was for.
    pub category: Category,
    /// Why the money was spent.
    pub necessity: Necessity,
}

impl From<TransactionForm> for TransactionData {
    fn from(form: TransactionForm) -> Self {
        Self {
            amount: form.amount,
            date: form.date,
            description: form.description.trim().to_owned(),
            type_: form.type_,
            category: form.category,
            necessity: form.necessity,
        }
    }
}
