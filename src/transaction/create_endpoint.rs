//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    session::resolve_session,
    transaction::{Transaction, TransactionTitle, TransactionType, core::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<CreateTransactionState> for Key {
    fn from_ref(state: &CreateTransactionState) -> Self {
        state.cookie_key.clone()
    }
}

/// The JSON body for creating a transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    /// Text detailing the transaction.
    pub title: String,
    /// The value of the transaction in minor currency units.
    ///
    /// Only the magnitude is used, the sign comes from `type`.
    pub amount: i64,
    /// Whether the amount is added to or subtracted from the balance.
    #[serde(rename = "type")]
    pub type_: TransactionType,
}

/// A route handler for creating a new transaction, responds with 201 Created
/// and no body on success.
///
/// Requests without a session cookie start a new session and the response
/// carries the cookie for it.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    jar: PrivateCookieJar,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, PrivateCookieJar), Error> {
    let (jar, session_id) = resolve_session(jar);

    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected create transaction body: {rejection}");
        Error::InvalidRequestBody(rejection.body_text())
    })?;
    let title = TransactionTitle::new(&request.title)?;
    let amount = request.type_.signed_amount(request.amount)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    create_transaction(Transaction::build(title, amount, session_id), &connection)
        .inspect_err(|error| tracing::error!("could not create transaction: {error}"))?;

    Ok((StatusCode::CREATED, jar))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::State,
        http::{StatusCode, header::SET_COOKIE},
        response::IntoResponse,
    };
    use axum_extra::extract::PrivateCookieJar;
    use rusqlite::Connection;

    use crate::{
        Error, create_cookie_key,
        db::initialize,
        session::{SessionId, set_session_cookie},
        transaction::{
            TransactionType, count_transactions,
            create_endpoint::{CreateTransactionRequest, CreateTransactionState},
            create_transaction_endpoint, get_transactions,
        },
    };

    fn get_test_state() -> CreateTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        CreateTransactionState {
            cookie_key: create_cookie_key("foobar"),
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn request(title: &str, amount: i64, type_: TransactionType) -> CreateTransactionRequest {
        CreateTransactionRequest {
            title: title.to_owned(),
            amount,
            type_,
        }
    }

    #[tokio::test]
    async fn can_create_credit() {
        let state = get_test_state();
        let session_id = SessionId::new();
        let jar = set_session_cookie(PrivateCookieJar::new(state.cookie_key.clone()), session_id);

        let result = create_transaction_endpoint(
            State(state.clone()),
            jar,
            Ok(Json(request("New Transaction", 5000, TransactionType::Credit))),
        )
        .await;

        let (status, _) = result.expect("could not create transaction");
        assert_eq!(status, StatusCode::CREATED);
        let transactions = get_transactions(session_id, &state.db_connection.lock().unwrap())
            .expect("could not get transactions");
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].title, "New Transaction");
        assert_eq!(transactions[0].amount, 5000);
    }

    #[tokio::test]
    async fn debit_is_stored_as_negative_amount() {
        let state = get_test_state();
        let session_id = SessionId::new();
        let jar = set_session_cookie(PrivateCookieJar::new(state.cookie_key.clone()), session_id);

        create_transaction_endpoint(
            State(state.clone()),
            jar,
            Ok(Json(request("Fatura do cartao", 1000, TransactionType::Debit))),
        )
        .await
        .expect("could not create transaction");

        let transactions =
            get_transactions(session_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(transactions[0].amount, -1000);
    }

    #[tokio::test]
    async fn new_session_sets_cookie() {
        let state = get_test_state();

        let response = create_transaction_endpoint(
            State(state.clone()),
            PrivateCookieJar::new(state.cookie_key.clone()),
            Ok(Json(request("Coffee", 450, TransactionType::Debit))),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().get(SET_COOKIE).is_some());
    }

    #[tokio::test]
    async fn empty_title_creates_nothing() {
        let state = get_test_state();

        let result = create_transaction_endpoint(
            State(state.clone()),
            PrivateCookieJar::new(state.cookie_key.clone()),
            Ok(Json(request("  ", 450, TransactionType::Credit))),
        )
        .await;

        assert!(matches!(result, Err(Error::EmptyTitle)));
        assert_eq!(count_transactions(&state.db_connection.lock().unwrap()).unwrap(), 0);
    }

    #[tokio::test]
    async fn out_of_range_amount_creates_nothing() {
        let state = get_test_state();

        let result = create_transaction_endpoint(
            State(state.clone()),
            PrivateCookieJar::new(state.cookie_key.clone()),
            Ok(Json(request("Overflow", i64::MIN, TransactionType::Credit))),
        )
        .await;

        assert!(matches!(result, Err(Error::AmountOutOfRange(i64::MIN))));
        assert_eq!(count_transactions(&state.db_connection.lock().unwrap()).unwrap(), 0);
    }
}
