//! A small personal-finance ledger served as a JSON REST API.
//!
//! Clients record credit and debit transactions, list and edit them, and ask
//! for the running balance. There are no user accounts: every browser gets an
//! anonymous session, identified by an encrypted cookie, and can only see the
//! transactions it created.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod db;
pub mod endpoints;
mod logging;
mod routing;
mod session;
mod transaction;

pub use app_state::{AppState, create_cookie_key};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use session::{SessionId, session_cookie_value};
pub use transaction::{
    CreateTransactionRequest, EditTransactionRequest, Summary, SummaryResponse, Transaction,
    TransactionBuilder, TransactionId, TransactionResponse, TransactionTitle, TransactionType,
    TransactionsResponse, create_transaction,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An empty string (or only whitespace) was used as a transaction title.
    #[error("transaction title cannot be empty")]
    EmptyTitle,

    /// The magnitude of the amount cannot be represented as a signed 64-bit
    /// integer, i.e. the amount was `i64::MIN`.
    #[error("the amount {0} is out of range")]
    AmountOutOfRange(i64),

    /// The request body could not be parsed, e.g. it was not JSON, a field
    /// was missing, the amount was not an integer or the type was not one of
    /// "credit" or "debit".
    ///
    /// Callers should pass in the rejection message from the extractor.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The request did not carry a valid session cookie.
    ///
    /// Only creating a transaction may start a new session, every other
    /// operation needs the cookie handed out by that first request.
    #[error("no session cookie in the request")]
    MissingSession,

    /// The requested resource was not found.
    ///
    /// Transactions that belong to another session are also reported as not
    /// found so that clients cannot probe for IDs they do not own.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist in the caller's session.
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::EmptyTitle | Error::AmountOutOfRange(_) | Error::InvalidRequestBody(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::MissingSession => (StatusCode::UNAUTHORIZED, self.to_string()),
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                "the transaction could not be found".to_owned(),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an unexpected error occurred, check the server logs for more details"
                        .to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
