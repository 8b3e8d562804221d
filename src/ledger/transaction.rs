use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::round2;

/// A single income or expense entry in the cash book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    pub payment_method: PaymentMethod,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        kind: TransactionKind,
        category: impl Into<String>,
        amount: f64,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            kind,
            category: category.into(),
            amount: round2(amount),
            description: String::new(),
            payment_method,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Upi,
    BankTransfer,
    Credit,
}

/// Category list offered by the entry form, split by transaction kind.
pub fn suggested_categories(kind: TransactionKind) -> &'static [&'static str] {
    match kind {
        TransactionKind::Income => &["sale", "service", "other_income"],
        TransactionKind::Expense => &[
            "purchase",
            "salary",
            "rent",
            "utilities",
            "other_expense",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rounds_amount_to_two_decimals() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let txn = Transaction::new(
            date,
            TransactionKind::Income,
            "sale",
            199.999,
            PaymentMethod::Cash,
        );
        assert_eq!(txn.amount, 200.0);
    }

    #[test]
    fn category_suggestions_follow_the_kind() {
        assert!(suggested_categories(TransactionKind::Income).contains(&"sale"));
        assert!(suggested_categories(TransactionKind::Expense).contains(&"rent"));
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&TransactionKind::Expense).unwrap();
        assert_eq!(json, "\"expense\"");
    }
}
