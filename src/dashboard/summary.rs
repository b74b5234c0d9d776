//! Reduces a list of transactions to the figures shown on the dashboard.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::transaction::{Necessity, Transaction, TransactionType};

/// Totals over a list of transactions.
///
/// Amounts are summed exactly, so the result does not depend on the order of
/// the transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Income minus expenses, plus any opening balance.
    pub balance: Decimal,
    /// The sum of all income.
    pub total_income: Decimal,
    /// The sum of all expenses.
    pub total_expense: Decimal,
    /// The sum of amounts per necessity tag, in the order of [Necessity::ALL].
    tag_totals: [Decimal; 4],
}

fn tag_index(tag: Necessity) -> usize {
    match tag {
        Necessity::Need => 0,
        Necessity::Want => 1,
        Necessity::Savings => 2,
        Necessity::Wasted => 3,
    }
}

impl Summary {
    /// Sum `transactions`.
    ///
    /// Tag totals include every transaction that carries a tag, regardless of
    /// its type.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut summary = Self {
            balance: Decimal::ZERO,
            total_income: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            tag_totals: [Decimal::ZERO; 4],
        };

        for transaction in transactions {
            match transaction.type_ {
                TransactionType::Income => summary.total_income += transaction.amount,
                TransactionType::Expense => summary.total_expense += transaction.amount,
            }

            summary.balance += transaction.signed_amount();

            if let Some(tag) = transaction.necessity {
                summary.tag_totals[tag_index(tag)] += transaction.amount;
            }
        }

        summary
    }

    /// Add `opening_balance` to the balance.
    ///
    /// This only changes what is displayed, the totals are unaffected.
    pub fn with_opening_balance(mut self, opening_balance: Decimal) -> Self {
        self.balance += opening_balance;
        self
    }

    /// The sum of amounts tagged with `tag`.
    pub fn tag_total(&self, tag: Necessity) -> Decimal {
        self.tag_totals[tag_index(tag)]
    }

    /// The share of `tag` in the sum of all tagged amounts, as a whole percentage.
    ///
    /// The divisor is at least one, so an empty summary has a share of zero.
    pub fn tag_share(&self, tag: Necessity) -> u32 {
        let all_tags: Decimal = self.tag_totals.iter().sum();
        let divisor = all_tags.max(Decimal::ONE);

        (Decimal::ONE_HUNDRED * self.tag_total(tag) / divisor)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or_default()
    }

    /// The total and share of each necessity tag, in the order of [Necessity::ALL].
    pub fn tag_breakdown(&self) -> Vec<(Necessity, Decimal, u32)> {
        Necessity::ALL
            .into_iter()
            .map(|tag| (tag, self.tag_total(tag), self.tag_share(tag)))
            .collect()
    }
}
