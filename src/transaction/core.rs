//! Defines the core data models for transactions.

use std::fmt::Display;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::{Error, auth::UserId};

// ============================================================================
// MODELS
// ============================================================================

/// The store's unique identifier for a transaction.
///
/// The store may use integer or UUID keys, both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Wrap a store ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(id) => TransactionId(id.to_string()),
            RawId::Text(id) => TransactionId(id),
        })
    }
}

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money that was earned.
    Income,
    /// Money that was spent.
    Expense,
}

impl TransactionType {
    /// The name used in the store and in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a transaction was for.
///
/// Which categories are valid depends on the [TransactionType], see
/// [Category::options_for].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Wages.
    Salary,
    /// Rent received.
    Rent,
    /// Dividends from shares.
    Dividend,
    /// Interest from savings.
    Interest,
    /// Money received as a gift.
    Gift,
    /// Groceries and eating out.
    Food,
    /// Public transport, fuel, taxis.
    Transport,
    /// Rent or mortgage payments.
    Housing,
    /// Power, water, internet.
    Utilities,
    /// Going out, subscriptions, hobbies.
    Entertainment,
    /// Doctors, medicine, insurance.
    Healthcare,
    /// Clothes, electronics, household items.
    Shopping,
    /// Expenses that fit nowhere else.
    Other,
}

const INCOME_CATEGORIES: [Category; 5] = [
    Category::Salary,
    Category::Rent,
    Category::Dividend,
    Category::Interest,
    Category::Gift,
];

const EXPENSE_CATEGORIES: [Category; 8] = [
    Category::Food,
    Category::Transport,
    Category::Housing,
    Category::Utilities,
    Category::Entertainment,
    Category::Healthcare,
    Category::Shopping,
    Category::Other,
];

impl Category {
    /// The categories that may be used with `type_`, in display order.
    ///
    /// The first category is the default for a form after the type changes.
    pub fn options_for(type_: TransactionType) -> &'static [Category] {
        match type_ {
            TransactionType::Income => &INCOME_CATEGORIES,
            TransactionType::Expense => &EXPENSE_CATEGORIES,
        }
    }

    /// The default category for `type_`.
    pub fn first_for(type_: TransactionType) -> Category {
        Self::options_for(type_)[0]
    }

    /// Whether this category may be used with `type_`.
    pub fn belongs_to(&self, type_: TransactionType) -> bool {
        Self::options_for(type_).contains(self)
    }

    /// The name used in the store and in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Salary => "Salary",
            Category::Rent => "Rent",
            Category::Dividend => "Dividend",
            Category::Interest => "Interest",
            Category::Gift => "Gift",
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Housing => "Housing",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Shopping => "Shopping",
            Category::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why money was spent. Only meaningful for expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Necessity {
    /// Could not have gone without it.
    Need,
    /// Nice to have.
    Want,
    /// Put aside for later.
    Savings,
    /// Regretted.
    Wasted,
}

impl Necessity {
    /// All necessity tags in display order.
    pub const ALL: [Necessity; 4] = [
        Necessity::Need,
        Necessity::Want,
        Necessity::Savings,
        Necessity::Wasted,
    ];

    /// The name used in the store and in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            Necessity::Need => "Need",
            Necessity::Want => "Want",
            Necessity::Savings => "Savings",
            Necessity::Wasted => "Wasted",
        }
    }
}

impl Display for Necessity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a transaction happened: always a calendar date, sometimes a time too.
///
/// The store returns either `YYYY-MM-DD` or a timestamp, with or without a UTC
/// offset. Only the date is written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionDate {
    /// The calendar date.
    pub date: Date,
    /// The time of day, if the store recorded one.
    pub time: Option<Time>,
}

impl TransactionDate {
    /// A date without a time of day.
    pub fn from_date(date: Date) -> Self {
        Self { date, time: None }
    }

    /// Parse a date or timestamp string from the store.
    pub fn parse(text: &str) -> Option<Self> {
        let date_format = format_description!("[year]-[month]-[day]");
        let naive_format = format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
        );

        if let Ok(date) = Date::parse(text, &date_format) {
            return Some(Self::from_date(date));
        }

        if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
            return Some(Self {
                date: date_time.date(),
                time: Some(date_time.time()),
            });
        }

        // Postgres may use a space separator and short offsets such as "+13",
        // neither of which is RFC 3339. The time is kept as recorded.
        let naive = text.replacen(' ', "T", 1);
        let offset_start = naive
            .char_indices()
            .skip("YYYY-MM-DDTHH:MM:SS".len())
            .find(|(_, c)| matches!(c, '+' | '-' | 'Z'))
            .map(|(index, _)| index)
            .unwrap_or(naive.len());

        PrimitiveDateTime::parse(&naive[..offset_start], &naive_format)
            .ok()
            .map(|date_time| Self {
                date: date_time.date(),
                time: Some(date_time.time()),
            })
    }
}

impl Display for TransactionDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date)
    }
}

impl Serialize for TransactionDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        iso_date::serialize(&self.date, serializer)
    }
}

impl<'de> Deserialize<'de> for TransactionDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;

        TransactionDate::parse(&text).ok_or_else(|| {
            serde::de::Error::custom(format!("\"{text}\" is not a date or timestamp"))
        })
    }
}

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

pub(crate) use iso_date::{deserialize as deserialize_iso_date, serialize as serialize_iso_date};

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// How much money was spent or earned. Never negative, the direction is
    /// given by `type_`.
    pub amount: Decimal,
    /// When the transaction happened.
    pub date: TransactionDate,
    /// A text description of what the transaction was for.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// What the transaction was for.
    pub category: Category,
    /// Why the money was spent. Usually missing for income.
    #[serde(default)]
    pub necessity: Option<Necessity>,
    /// The user that recorded the transaction.
    #[serde(rename = "user_id")]
    pub owner: UserId,
}

impl Transaction {
    /// The amount with the sign implied by the type: negative for expenses.
    pub fn signed_amount(&self) -> Decimal {
        match self.type_ {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The user-editable fields of a transaction, as sent on insert and update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionData {
    /// How much money was spent or earned.
    pub amount: Decimal,
    /// When the transaction happened.
    #[serde(serialize_with = "serialize_iso_date")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// What the transaction was for.
    pub category: Category,
    /// Why the money was spent.
    pub necessity: Necessity,
}

impl TransactionData {
    /// Check the fields before they are sent to the store.
    ///
    /// # Errors
    /// - [Error::InvalidAmount] if the amount is zero or negative.
    /// - [Error::InvalidCategory] if the category does not belong to the type.
    pub fn validate(&self) -> Result<(), Error> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(self.amount));
        }

        if !self.category.belongs_to(self.type_) {
            return Err(Error::InvalidCategory {
                category: self.category,
                type_: self.type_,
            });
        }

        Ok(())
    }
}
