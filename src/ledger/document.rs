use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    contact::{Contact, ContactKind},
    inventory::InventoryItem,
    invoice::Invoice,
    transaction::Transaction,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// The single persisted aggregate: all of one user's business data.
///
/// Owned exclusively by the logged-in session, loaded wholesale and saved
/// wholesale. There is no partial-write path, so every mutation operation
/// ends in exactly one save of the whole document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserDocument {
    pub user: AccountProfile,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default)]
    pub customers: Vec<Contact>,
    #[serde(default)]
    pub suppliers: Vec<Contact>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub subscription: Subscription,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "UserDocument::schema_version_default")]
    pub schema_version: u8,
}

impl UserDocument {
    /// Fresh default document: all collections empty, subscription inactive.
    pub fn new(user: AccountProfile) -> Self {
        let now = Utc::now();
        Self {
            user,
            transactions: Vec::new(),
            inventory: Vec::new(),
            customers: Vec::new(),
            suppliers: Vec::new(),
            invoices: Vec::new(),
            subscription: Subscription::default(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn customer(&self, id: Uuid) -> Option<&Contact> {
        self.customers.iter().find(|contact| contact.id == id)
    }

    pub fn inventory_item(&self, id: Uuid) -> Option<&InventoryItem> {
        self.inventory.iter().find(|item| item.id == id)
    }

    pub fn invoice(&self, id: Uuid) -> Option<&Invoice> {
        self.invoices.iter().find(|invoice| invoice.id == id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn contacts(&self, kind: ContactKind) -> &[Contact] {
        match kind {
            ContactKind::Customer => &self.customers,
            ContactKind::Supplier => &self.suppliers,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

/// Local mirror of the account-directory record.
///
/// `password` holds a salted hash (`salt$hexdigest`), never cleartext.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountProfile {
    pub username: String,
    pub password: String,
    pub owner_name: String,
    pub business_name: String,
    pub contact_number: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gstin: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Subscription {
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<SubscriptionPlan>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Monthly,
    Yearly,
    Lifetime,
}

/// Names a document collection for keyed deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Transactions,
    Inventory,
    Customers,
    Suppliers,
    Invoices,
}
