//! Defines the endpoint for deleting a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    Error,
    session::SessionId,
    transaction::{TransactionId, core::parse_transaction_id, state::TransactionState},
};

/// A route handler for deleting a transaction, responds with 200 OK.
///
/// Deleting is idempotent: a transaction that does not exist, or that belongs
/// to another session, is left alone and the response is still 200 OK.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(session_id): Extension<SessionId>,
    Path(transaction_id): Path<String>,
) -> Result<StatusCode, Error> {
    let Some(transaction_id) = parse_transaction_id(&transaction_id) else {
        tracing::debug!("Ignoring delete for malformed transaction ID {transaction_id:?}");
        return Ok(StatusCode::OK);
    };

    let connection = state.connection()?;

    match delete_transaction(transaction_id, session_id, &connection) {
        Ok(0) => {
            tracing::debug!("Transaction {transaction_id} was already gone");
            Ok(StatusCode::OK)
        }
        Ok(_) => Ok(StatusCode::OK),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            Err(error)
        }
    }
}

type RowsAffected = usize;

fn delete_transaction(
    id: TransactionId,
    session_id: SessionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id AND session_id = :session_id",
            rusqlite::named_params! { ":id": id, ":session_id": session_id },
        )
        .map_err(|err| err.into())
}
