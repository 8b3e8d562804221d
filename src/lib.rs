#![doc(test(attr(deny(warnings))))]

//! Cashbook Core offers the ledger, document-store, and reporting primitives
//! that power a small-business bookkeeping application: income/expense
//! transactions, inventory stock, customer/supplier balances, GST invoices,
//! and the reports derived from them.

pub mod core;
pub mod currency;
pub mod directory;
pub mod errors;
pub mod ledger;
pub mod storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("cashbook_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
        tracing::info!("Cashbook Core tracing initialized.");
    });
}
