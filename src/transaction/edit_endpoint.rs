//! Defines the endpoint for renaming a transaction.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    session::SessionId,
    transaction::{
        TransactionId, TransactionTitle, core::parse_transaction_id, state::TransactionState,
    },
};

/// The JSON body for editing a transaction. Only the title can be changed.
#[derive(Debug, Serialize, Deserialize)]
pub struct EditTransactionRequest {
    /// The new title for the transaction.
    pub title: String,
}

/// A route handler for renaming a transaction, responds with 204 No Content.
///
/// Responds with 404 if the transaction does not exist or belongs to another
/// session.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(session_id): Extension<SessionId>,
    Path(transaction_id): Path<String>,
    payload: Result<Json<EditTransactionRequest>, JsonRejection>,
) -> Result<StatusCode, Error> {
    let Json(request) =
        payload.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;
    let title = TransactionTitle::new(&request.title)?;
    let transaction_id =
        parse_transaction_id(&transaction_id).ok_or(Error::UpdateMissingTransaction)?;

    let connection = state.connection()?;

    match update_transaction_title(transaction_id, session_id, &title, &connection) {
        Ok(0) => {
            tracing::debug!(
                "Could not update transaction {transaction_id}: update returned zero rows affected"
            );
            Err(Error::UpdateMissingTransaction)
        }
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            Err(error)
        }
    }
}

type RowsAffected = usize;

fn update_transaction_title(
    id: TransactionId,
    session_id: SessionId,
    title: &TransactionTitle,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE \"transaction\" SET title = ?1 WHERE id = ?2 AND session_id = ?3;",
            params![title.as_ref(), id, session_id],
        )
        .map_err(Error::from)
}
