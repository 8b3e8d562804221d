//! Ledger domain models: the per-user document aggregate and the entities it
//! holds, together with the invariants relating them.

pub mod contact;
pub mod document;
pub mod inventory;
pub mod invoice;
pub mod transaction;

pub use contact::{Contact, ContactKind};
pub use document::{
    AccountProfile, Collection, Subscription, SubscriptionPlan, UserDocument,
};
pub use inventory::{InventoryItem, StockLevel};
pub use invoice::{
    generate_invoice_number, DraftLine, Invoice, InvoiceDraft, InvoiceLine, InvoiceStatus,
};
pub use transaction::{suggested_categories, PaymentMethod, Transaction, TransactionKind};
