//! Session facade, mutation operations, and query/report operations.

pub mod mutations;
pub mod queries;
pub mod session;

pub use queries::{
    dashboard_summary, expense_report, filter_transactions, inventory_report, profit_loss_report,
    sales_report, DashboardSummary, ExpenseReport, InventoryReport, InventoryReportMode,
    ProfitLossReport, SalesReport, TransactionFilter,
};
pub use session::{hash_password, verify_password, NewAccount, ProfileUpdate, Session, SessionManager};
