use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::round2;

use super::transaction::PaymentMethod;

/// A GST invoice as stored in the document. Totals and status are computed
/// once at creation by [`UserDocument::create_invoice`] and are not
/// re-derived on read.
///
/// [`UserDocument::create_invoice`]: crate::ledger::UserDocument::create_invoice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,
    pub date: NaiveDate,
    pub customer_id: Uuid,
    /// Name snapshot taken at creation; later contact edits do not touch it.
    pub customer_name: String,
    pub items: Vec<InvoiceLine>,
    pub subtotal: f64,
    pub gst_amount: f64,
    pub total_amount: f64,
    pub amount_paid: f64,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: String,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn balance_due(&self) -> f64 {
        round2(self.total_amount - self.amount_paid)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceLine {
    pub item_id: Uuid,
    /// Item name snapshot, like `customer_name` on the invoice.
    pub item_name: String,
    #[serde(default)]
    pub description: String,
    pub quantity: f64,
    pub price: f64,
    pub gst_rate: f64,
    pub line_total: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    Partial,
    Unpaid,
}

impl InvoiceStatus {
    /// The single source of the status rule: paid iff `amount_paid` covers
    /// the total, partial iff something but not everything was paid.
    pub fn derive(amount_paid: f64, total_amount: f64) -> Self {
        if amount_paid >= total_amount {
            InvoiceStatus::Paid
        } else if amount_paid > 0.0 {
            InvoiceStatus::Partial
        } else {
            InvoiceStatus::Unpaid
        }
    }
}

/// Input for invoice creation; ids and totals are assigned by the document.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    /// Supplied by the form; generated when `None`.
    pub invoice_number: Option<String>,
    pub date: NaiveDate,
    pub customer_id: Uuid,
    pub items: Vec<DraftLine>,
    pub amount_paid: f64,
    pub payment_method: PaymentMethod,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct DraftLine {
    pub item_id: Uuid,
    /// Display snapshot from the item picker; kept even when the inventory
    /// record has since disappeared.
    pub item_name: String,
    pub description: String,
    pub quantity: f64,
    pub price: f64,
    pub gst_rate: f64,
}

/// `INV-` plus the last six digits of the creation timestamp in millis.
/// Soft-unique only: two invoices created in the same millisecond share a
/// number. The invoice `id` is the real identity; the number is a display
/// artifact.
pub fn generate_invoice_number(created_at: DateTime<Utc>) -> String {
    let millis = created_at.timestamp_millis().unsigned_abs().to_string();
    let tail = if millis.len() > 6 {
        &millis[millis.len() - 6..]
    } else {
        millis.as_str()
    };
    format!("INV-{}", tail)
}
