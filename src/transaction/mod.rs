//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and summing transactions
//! - Route handlers for the transaction endpoints

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod state;
mod summary_endpoint;

pub use core::{
    Transaction, TransactionBuilder, TransactionId, TransactionTitle, TransactionType,
    create_transaction, create_transaction_table, get_balance, get_transaction, get_transactions,
};
pub use create_endpoint::{CreateTransactionRequest, create_transaction_endpoint};
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::{EditTransactionRequest, edit_transaction_endpoint};
pub use list_endpoint::{
    TransactionResponse, TransactionsResponse, get_transaction_endpoint, get_transactions_endpoint,
};
pub use summary_endpoint::{Summary, SummaryResponse, get_summary_endpoint};

#[cfg(test)]
pub use core::count_transactions;
