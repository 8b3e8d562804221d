use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::round2;

/// A customer or supplier. Same shape either way; [`ContactKind`] selects
/// which document collection the contact lives in.
///
/// `balance` is the running receivable: it is accrued incrementally by
/// credit-method invoices, never recomputed from history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gstin: Option<String>,
    #[serde(default)]
    pub balance: f64,
}

impl Contact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            phone: None,
            email: None,
            address: None,
            gstin: None,
            balance: 0.0,
        }
    }

    pub fn with_opening_balance(mut self, balance: f64) -> Self {
        self.balance = round2(balance);
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn accrue_balance(&mut self, amount: f64) {
        self.balance = round2(self.balance + amount);
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Customer,
    Supplier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accrual_rounds_running_balance() {
        let mut contact = Contact::new("Asha Traders").with_opening_balance(10.0);
        contact.accrue_balance(599.999);
        assert_eq!(contact.balance, 610.0);
    }
}
