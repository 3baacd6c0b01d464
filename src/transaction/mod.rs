//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - The filter engine and summary statistics for the transactions page
//! - View handlers for transaction-related web pages and the CSV export

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod export;
mod filter;
mod form;
mod transactions_page;

pub use core::{
    Transaction, TransactionBuilder, TransactionId, TransactionUpdate, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, get_transactions_for_user,
    map_transaction_row, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use export::export_transactions;
pub use filter::{
    AmountFilter, FilterQuery, FilterSummary, KindFilter, TransactionFilter, WindowFilter,
    summarize,
};
pub use transactions_page::get_transactions_page;

#[cfg(test)]
pub use core::count_transactions;
