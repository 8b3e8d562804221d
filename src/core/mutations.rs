//! Mutation operations on the user document.
//!
//! Every operation is upsert-by-id: a matching id replaces the record in
//! place, anything else is appended. The caller (normally
//! [`SessionManager::mutate`]) persists the whole document once afterwards,
//! so each operation is atomic from the UI's point of view.
//!
//! [`SessionManager::mutate`]: crate::core::session::SessionManager::mutate

use chrono::Utc;
use uuid::Uuid;

use crate::currency::round2;
use crate::errors::{CashbookError, Result};
use crate::ledger::{
    generate_invoice_number, Collection, Contact, ContactKind, InventoryItem, Invoice,
    InvoiceDraft, InvoiceLine, InvoiceStatus, PaymentMethod, Transaction, UserDocument,
};

impl UserDocument {
    /// Inserts or replaces a transaction, keyed by id.
    pub fn upsert_transaction(&mut self, transaction: Transaction) -> Result<Uuid> {
        if transaction.amount < 0.0 {
            return Err(CashbookError::Validation(
                "transaction amount must not be negative".into(),
            ));
        }
        let id = transaction.id;
        upsert_by(&mut self.transactions, transaction, |txn| txn.id == id);
        self.touch();
        Ok(id)
    }

    /// Inserts or replaces an inventory item, keyed by id.
    pub fn upsert_inventory_item(&mut self, item: InventoryItem) -> Result<Uuid> {
        if item.name.trim().is_empty() {
            return Err(CashbookError::Validation("item name is required".into()));
        }
        if item.price < 0.0 {
            return Err(CashbookError::Validation(
                "item price must not be negative".into(),
            ));
        }
        let id = item.id;
        upsert_by(&mut self.inventory, item, |existing| existing.id == id);
        self.touch();
        Ok(id)
    }

    /// Inserts or replaces a customer or supplier, keyed by id.
    pub fn upsert_contact(&mut self, kind: ContactKind, contact: Contact) -> Result<Uuid> {
        if contact.name.trim().is_empty() {
            return Err(CashbookError::Validation("contact name is required".into()));
        }
        let id = contact.id;
        let collection = match kind {
            ContactKind::Customer => &mut self.customers,
            ContactKind::Supplier => &mut self.suppliers,
        };
        upsert_by(collection, contact, |existing| existing.id == id);
        self.touch();
        Ok(id)
    }

    /// Creates an invoice and applies its cross-entity side effects in one
    /// mutation: totals and status are computed here, a credit invoice
    /// accrues the unpaid portion onto the customer's balance, and every
    /// line decrements the referenced item's stock with no floor at zero.
    pub fn create_invoice(&mut self, draft: InvoiceDraft) -> Result<Invoice> {
        let customer = self
            .customer(draft.customer_id)
            .ok_or_else(|| CashbookError::Validation("customer not found".into()))?;
        let customer_name = customer.name.clone();

        if draft.items.is_empty() {
            return Err(CashbookError::Validation(
                "invoice must have at least one item".into(),
            ));
        }
        if draft.amount_paid < 0.0 {
            return Err(CashbookError::Validation(
                "amount paid must not be negative".into(),
            ));
        }

        let mut subtotal = 0.0;
        let mut gst_amount = 0.0;
        let mut items = Vec::with_capacity(draft.items.len());
        for line in &draft.items {
            if line.quantity <= 0.0 {
                return Err(CashbookError::Validation(
                    "line quantity must be positive".into(),
                ));
            }
            if line.price < 0.0 {
                return Err(CashbookError::Validation(
                    "line price must not be negative".into(),
                ));
            }
            let line_net = line.quantity * line.price;
            let line_gst = line_net * line.gst_rate / 100.0;
            subtotal += line_net;
            gst_amount += line_gst;
            items.push(InvoiceLine {
                item_id: line.item_id,
                item_name: line.item_name.clone(),
                description: line.description.clone(),
                quantity: line.quantity,
                price: line.price,
                gst_rate: line.gst_rate,
                line_total: round2(line_net + line_gst),
            });
        }
        let subtotal = round2(subtotal);
        let gst_amount = round2(gst_amount);
        let total_amount = round2(subtotal + gst_amount);
        let amount_paid = round2(draft.amount_paid);

        let created_at = Utc::now();
        let invoice = Invoice {
            id: Uuid::new_v4(),
            invoice_number: draft
                .invoice_number
                .unwrap_or_else(|| generate_invoice_number(created_at)),
            date: draft.date,
            customer_id: draft.customer_id,
            customer_name,
            items,
            subtotal,
            gst_amount,
            total_amount,
            amount_paid,
            payment_method: draft.payment_method,
            notes: draft.notes,
            status: InvoiceStatus::derive(amount_paid, total_amount),
            created_at,
        };

        // The unpaid portion of a credit invoice becomes receivable. Other
        // payment methods never touch the balance, paid in full or not.
        if draft.payment_method == PaymentMethod::Credit {
            if let Some(customer) = self
                .customers
                .iter_mut()
                .find(|contact| contact.id == draft.customer_id)
            {
                customer.accrue_balance(total_amount - amount_paid);
            }
        }

        // Stock decrements have no floor: oversell lands as negative stock
        // and is surfaced by the out-of-stock classification instead of
        // being rejected here. A stale item id is a stock no-op; the invoice
        // keeps the snapshot line either way.
        for line in &invoice.items {
            if let Some(item) = self.inventory.iter_mut().find(|i| i.id == line.item_id) {
                item.current_stock -= line.quantity.round() as i64;
            }
        }

        self.invoices.push(invoice.clone());
        self.touch();
        Ok(invoice)
    }

    /// Removes the entity with the given id from a collection. A missing id
    /// is a silent no-op (`false`). Deletion never reverses side effects:
    /// deleting an invoice restores neither stock nor customer balance.
    pub fn remove(&mut self, collection: Collection, id: Uuid) -> bool {
        let removed = match collection {
            Collection::Transactions => remove_by(&mut self.transactions, |t| t.id == id),
            Collection::Inventory => remove_by(&mut self.inventory, |i| i.id == id),
            Collection::Customers => remove_by(&mut self.customers, |c| c.id == id),
            Collection::Suppliers => remove_by(&mut self.suppliers, |s| s.id == id),
            Collection::Invoices => remove_by(&mut self.invoices, |i| i.id == id),
        };
        if removed {
            self.touch();
        }
        removed
    }
}

fn upsert_by<T>(collection: &mut Vec<T>, record: T, matches: impl Fn(&T) -> bool) {
    match collection.iter_mut().find(|existing| matches(existing)) {
        Some(slot) => *slot = record,
        None => collection.push(record),
    }
}

fn remove_by<T>(collection: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    match collection.iter().position(matches) {
        Some(index) => {
            collection.remove(index);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{DraftLine, TransactionKind};
    use chrono::NaiveDate;

    fn profile() -> crate::ledger::AccountProfile {
        crate::ledger::AccountProfile {
            username: "asha".into(),
            password: "salt$0000".into(),
            owner_name: "Asha".into(),
            business_name: "Asha Traders".into(),
            contact_number: "9000000000".into(),
            email: None,
            gstin: None,
            address: None,
            created_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft_for(doc: &UserDocument, customer_id: Uuid, paid: f64) -> InvoiceDraft {
        let item = &doc.inventory[0];
        InvoiceDraft {
            invoice_number: None,
            date: date(2026, 2, 10),
            customer_id,
            items: vec![DraftLine {
                item_id: item.id,
                item_name: item.name.clone(),
                description: String::new(),
                quantity: 2.0,
                price: 400.0,
                gst_rate: 18.0,
            }],
            amount_paid: paid,
            payment_method: PaymentMethod::Credit,
            notes: String::new(),
        }
    }

    fn seeded_document() -> (UserDocument, Uuid) {
        let mut doc = UserDocument::new(profile());
        let customer = Contact::new("Ravi Stores");
        let customer_id = doc
            .upsert_contact(ContactKind::Customer, customer)
            .unwrap();
        doc.upsert_inventory_item(InventoryItem::new("Notebook", 400.0, 10))
            .unwrap();
        (doc, customer_id)
    }

    #[test]
    fn upsert_replaces_in_place_and_is_idempotent() {
        let mut doc = UserDocument::new(profile());
        let txn = Transaction::new(
            date(2026, 1, 5),
            TransactionKind::Income,
            "sale",
            150.0,
            PaymentMethod::Cash,
        );
        doc.upsert_transaction(txn.clone()).unwrap();
        doc.upsert_transaction(txn.clone()).unwrap();
        assert_eq!(doc.transactions.len(), 1);

        let mut edited = txn;
        edited.amount = 175.0;
        let id = doc.upsert_transaction(edited).unwrap();
        assert_eq!(doc.transactions.len(), 1);
        assert_eq!(doc.transaction(id).unwrap().amount, 175.0);
    }

    #[test]
    fn contacts_land_in_their_own_collection() {
        let mut doc = UserDocument::new(profile());
        doc.upsert_contact(ContactKind::Customer, Contact::new("Ravi"))
            .unwrap();
        doc.upsert_contact(ContactKind::Supplier, Contact::new("Mehta Paper"))
            .unwrap();
        assert_eq!(doc.contacts(ContactKind::Customer).len(), 1);
        assert_eq!(doc.contacts(ContactKind::Supplier).len(), 1);
    }

    #[test]
    fn invoice_totals_and_status_are_consistent() {
        let (mut doc, customer_id) = seeded_document();
        let invoice = doc.create_invoice(draft_for(&doc, customer_id, 400.0)).unwrap();

        assert_eq!(invoice.subtotal, 800.0);
        assert_eq!(invoice.gst_amount, 144.0);
        assert_eq!(invoice.total_amount, 944.0);
        assert_eq!(invoice.total_amount, round2(invoice.subtotal + invoice.gst_amount));
        assert_eq!(invoice.status, InvoiceStatus::Partial);
        assert_eq!(invoice.items[0].line_total, 944.0);
    }

    #[test]
    fn credit_invoice_accrues_unpaid_portion() {
        let (mut doc, customer_id) = seeded_document();
        doc.create_invoice(draft_for(&doc, customer_id, 400.0)).unwrap();
        assert_eq!(doc.customer(customer_id).unwrap().balance, 544.0);
    }

    #[test]
    fn cash_invoice_leaves_balance_untouched() {
        let (mut doc, customer_id) = seeded_document();
        let mut draft = draft_for(&doc, customer_id, 400.0);
        draft.payment_method = PaymentMethod::Cash;
        doc.create_invoice(draft).unwrap();
        assert_eq!(doc.customer(customer_id).unwrap().balance, 0.0);
    }

    #[test]
    fn stock_decrements_below_zero() {
        let (mut doc, customer_id) = seeded_document();
        doc.inventory[0].current_stock = 3;
        let mut draft = draft_for(&doc, customer_id, 0.0);
        draft.items[0].quantity = 5.0;
        doc.create_invoice(draft).unwrap();
        assert_eq!(doc.inventory[0].current_stock, -2);
    }

    #[test]
    fn unknown_customer_is_rejected_before_any_write() {
        let (mut doc, _) = seeded_document();
        let before = doc.clone();
        let draft = draft_for(&doc, Uuid::new_v4(), 0.0);
        let err = doc.create_invoice(draft).unwrap_err();
        assert!(matches!(err, CashbookError::Validation(_)));
        assert_eq!(doc, before);
    }

    #[test]
    fn zero_quantity_line_is_rejected() {
        let (mut doc, customer_id) = seeded_document();
        let mut draft = draft_for(&doc, customer_id, 0.0);
        draft.items[0].quantity = 0.0;
        assert!(doc.create_invoice(draft).is_err());
    }

    #[test]
    fn stale_item_id_skips_stock_but_keeps_line() {
        let (mut doc, customer_id) = seeded_document();
        let mut draft = draft_for(&doc, customer_id, 0.0);
        draft.items[0].item_id = Uuid::new_v4();
        let invoice = doc.create_invoice(draft).unwrap();
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(doc.inventory[0].current_stock, 10);
    }

    #[test]
    fn delete_is_a_no_op_for_missing_ids_and_never_reverses() {
        let (mut doc, customer_id) = seeded_document();
        let invoice = doc.create_invoice(draft_for(&doc, customer_id, 0.0)).unwrap();
        let stock_after_sale = doc.inventory[0].current_stock;
        let balance_after_sale = doc.customer(customer_id).unwrap().balance;

        assert!(!doc.remove(Collection::Invoices, Uuid::new_v4()));
        assert!(doc.remove(Collection::Invoices, invoice.id));
        assert_eq!(doc.inventory[0].current_stock, stock_after_sale);
        assert_eq!(doc.customer(customer_id).unwrap().balance, balance_after_sale);
    }
}
