//! Defines the endpoints for reading a session's transactions.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    session::SessionId,
    transaction::{
        Transaction, core::parse_transaction_id, get_transaction, get_transactions,
        state::TransactionState,
    },
};

/// The response body for listing transactions.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionsResponse {
    /// All of the session's transactions.
    pub transactions: Vec<Transaction>,
}

/// The response body for a single transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// The requested transaction.
    pub transaction: Transaction,
}

/// A route handler for listing all the transactions in the caller's session.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Json<TransactionsResponse>, Error> {
    let connection = state.connection()?;

    let transactions = get_transactions(session_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(Json(TransactionsResponse { transactions }))
}

/// A route handler for getting a transaction by its ID.
///
/// Responds with 404 if the transaction does not exist or belongs to another
/// session.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(session_id): Extension<SessionId>,
    Path(transaction_id): Path<String>,
) -> Result<Json<TransactionResponse>, Error> {
    let transaction_id = parse_transaction_id(&transaction_id).ok_or(Error::NotFound)?;
    let connection = state.connection()?;

    let transaction = get_transaction(transaction_id, session_id, &connection)?;

    Ok(Json(TransactionResponse { transaction }))
}
