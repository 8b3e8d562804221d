//! Query and aggregation operations over the user document.
//!
//! All functions here are pure reads: they never persist and never mutate.
//! The rendering layer consumes their output as a data-only view model.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::currency::{round2, within_range};
use crate::ledger::{
    InventoryItem, Invoice, InvoiceStatus, Transaction, TransactionKind, UserDocument,
};

/// Exact-match filter: unspecified fields are wildcards.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter {
    pub date: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
}

/// Transactions matching the filter, most recent date first. Tie order
/// within a date is insertion order and not part of the contract.
pub fn filter_transactions(doc: &UserDocument, filter: &TransactionFilter) -> Vec<Transaction> {
    let mut matched: Vec<Transaction> = doc
        .transactions
        .iter()
        .filter(|txn| filter.date.map_or(true, |date| txn.date == date))
        .filter(|txn| filter.kind.map_or(true, |kind| txn.kind == kind))
        .cloned()
        .collect();
    matched.sort_by(|a, b| b.date.cmp(&a.date));
    matched
}

#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    /// Income transactions dated today plus `amount_paid` of today's paid
    /// and partial invoices.
    pub today_sales: f64,
    pub low_stock_count: usize,
    pub recent_transactions: Vec<Transaction>,
}

pub fn dashboard_summary(doc: &UserDocument, today: NaiveDate) -> DashboardSummary {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    let mut today_sales = 0.0;

    for txn in &doc.transactions {
        match txn.kind {
            TransactionKind::Income => {
                total_income += txn.amount;
                if txn.date == today {
                    today_sales += txn.amount;
                }
            }
            TransactionKind::Expense => total_expenses += txn.amount,
        }
    }

    for invoice in &doc.invoices {
        let collected = matches!(
            invoice.status,
            InvoiceStatus::Paid | InvoiceStatus::Partial
        );
        if collected && invoice.date == today {
            today_sales += invoice.amount_paid;
        }
    }

    let low_stock_count = doc
        .inventory
        .iter()
        .filter(|item| item.is_low_stock())
        .count();

    let mut recent_transactions = doc.transactions.clone();
    recent_transactions.sort_by(|a, b| b.date.cmp(&a.date));
    recent_transactions.truncate(5);

    DashboardSummary {
        total_income: round2(total_income),
        total_expenses: round2(total_expenses),
        net_profit: round2(total_income - total_expenses),
        today_sales: round2(today_sales),
        low_stock_count,
        recent_transactions,
    }
}

#[derive(Debug, Clone)]
pub struct SalesReport {
    pub rows: Vec<SalesRow>,
    pub total_subtotal: f64,
    pub total_gst: f64,
    pub grand_total: f64,
    /// Per-day invoice totals, ascending by date.
    pub daily: Vec<DailySales>,
}

#[derive(Debug, Clone)]
pub struct SalesRow {
    pub date: NaiveDate,
    pub invoice_number: String,
    pub customer_name: String,
    pub subtotal: f64,
    pub gst_amount: f64,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySales {
    pub date: NaiveDate,
    pub amount: f64,
}

pub fn sales_report(doc: &UserDocument, from: NaiveDate, to: NaiveDate) -> SalesReport {
    let in_range: Vec<&Invoice> = doc
        .invoices
        .iter()
        .filter(|invoice| within_range(invoice.date, from, to))
        .collect();

    let mut total_subtotal = 0.0;
    let mut total_gst = 0.0;
    let mut grand_total = 0.0;
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    let rows = in_range
        .iter()
        .map(|invoice| {
            total_subtotal += invoice.subtotal;
            total_gst += invoice.gst_amount;
            grand_total += invoice.total_amount;
            *by_date.entry(invoice.date).or_insert(0.0) += invoice.total_amount;
            SalesRow {
                date: invoice.date,
                invoice_number: invoice.invoice_number.clone(),
                customer_name: invoice.customer_name.clone(),
                subtotal: invoice.subtotal,
                gst_amount: invoice.gst_amount,
                total_amount: invoice.total_amount,
            }
        })
        .collect();

    SalesReport {
        rows,
        total_subtotal: round2(total_subtotal),
        total_gst: round2(total_gst),
        grand_total: round2(grand_total),
        daily: by_date
            .into_iter()
            .map(|(date, amount)| DailySales {
                date,
                amount: round2(amount),
            })
            .collect(),
    }
}

#[derive(Debug, Clone)]
pub struct ExpenseReport {
    pub rows: Vec<Transaction>,
    pub total: f64,
    pub by_category: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

pub fn expense_report(doc: &UserDocument, from: NaiveDate, to: NaiveDate) -> ExpenseReport {
    let rows: Vec<Transaction> = doc
        .transactions
        .iter()
        .filter(|txn| txn.kind == TransactionKind::Expense)
        .filter(|txn| within_range(txn.date, from, to))
        .cloned()
        .collect();

    let mut total = 0.0;
    let mut buckets: BTreeMap<String, f64> = BTreeMap::new();
    for txn in &rows {
        total += txn.amount;
        let category = if txn.category.trim().is_empty() {
            "Uncategorized".to_string()
        } else {
            txn.category.clone()
        };
        *buckets.entry(category).or_insert(0.0) += txn.amount;
    }

    ExpenseReport {
        rows,
        total: round2(total),
        by_category: buckets
            .into_iter()
            .map(|(category, amount)| CategoryTotal {
                category,
                amount: round2(amount),
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfitLossReport {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

/// Income counts both invoice totals and income transactions in range.
/// The two are additive by design: a sale recorded as both an invoice and
/// an income transaction is counted twice, matching the book of record.
pub fn profit_loss_report(doc: &UserDocument, from: NaiveDate, to: NaiveDate) -> ProfitLossReport {
    let mut income = 0.0;
    for invoice in &doc.invoices {
        if within_range(invoice.date, from, to) {
            income += invoice.total_amount;
        }
    }
    for txn in &doc.transactions {
        if txn.kind == TransactionKind::Income && within_range(txn.date, from, to) {
            income += txn.amount;
        }
    }

    let mut expenses = 0.0;
    for txn in &doc.transactions {
        if txn.kind == TransactionKind::Expense && within_range(txn.date, from, to) {
            expenses += txn.amount;
        }
    }

    ProfitLossReport {
        income: round2(income),
        expenses: round2(expenses),
        net: round2(income - expenses),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryReportMode {
    All,
    Low,
    Out,
    /// Name-sorted listing; a sales-velocity proxy, since the document
    /// keeps no per-item sales counters.
    Sales,
}

#[derive(Debug, Clone)]
pub struct InventoryReport {
    pub rows: Vec<InventoryRow>,
    pub total_valuation: f64,
}

#[derive(Debug, Clone)]
pub struct InventoryRow {
    pub item: InventoryItem,
    pub value: f64,
}

pub fn inventory_report(doc: &UserDocument, mode: InventoryReportMode) -> InventoryReport {
    let mut items: Vec<InventoryItem> = match mode {
        InventoryReportMode::All | InventoryReportMode::Sales => doc.inventory.clone(),
        InventoryReportMode::Low => doc
            .inventory
            .iter()
            .filter(|item| item.is_low_stock())
            .cloned()
            .collect(),
        InventoryReportMode::Out => doc
            .inventory
            .iter()
            .filter(|item| item.current_stock <= 0)
            .cloned()
            .collect(),
    };
    if mode == InventoryReportMode::Sales {
        items.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let mut total_valuation = 0.0;
    let rows = items
        .into_iter()
        .map(|item| {
            let value = item.stock_value();
            total_valuation += value;
            InventoryRow { item, value }
        })
        .collect();

    InventoryReport {
        rows,
        total_valuation: round2(total_valuation),
    }
}
