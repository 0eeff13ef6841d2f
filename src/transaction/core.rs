//! Defines the core data models and database queries for transactions.

use std::str::FromStr;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, session::SessionId};

// ============================================================================
// MODELS
// ============================================================================

/// Alias for the type used for transaction IDs.
pub type TransactionId = Uuid;

/// Parse a transaction ID taken from a request path.
///
/// Returns `None` if `raw_id` is not a valid ID, in which case it cannot
/// refer to any transaction.
pub fn parse_transaction_id(raw_id: &str) -> Option<TransactionId> {
    Uuid::parse_str(raw_id).ok()
}

/// A credit or debit, i.e. an event where money was either earned or spent.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text label describing what the transaction was for.
    pub title: String,
    /// The amount of money earned (positive) or spent (negative).
    pub amount: i64,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// The session that created the transaction.
    pub session_id: SessionId,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(title: TransactionTitle, amount: i64, session_id: SessionId) -> TransactionBuilder {
        TransactionBuilder {
            title,
            amount,
            session_id,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The ID is assigned by [create_transaction] when the transaction is
/// inserted.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The label of the transaction.
    pub title: TransactionTitle,

    /// The signed amount of the transaction in minor currency units.
    ///
    /// Positive values represent credits, negative values represent debits.
    /// Use [TransactionType::signed_amount] to get the amount for a request
    /// that carries an unsigned magnitude and a type.
    pub amount: i64,

    /// The session that owns the transaction.
    pub session_id: SessionId,

    /// When the transaction was recorded. Defaults to now.
    pub created_at: OffsetDateTime,
}

impl TransactionBuilder {
    /// Set the creation time for the transaction.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Whether a transaction adds money to the balance or takes it away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, stored as a positive amount.
    Credit,
    /// Money spent, stored as a negative amount.
    Debit,
}

impl TransactionType {
    /// Apply the sign for this transaction type to the magnitude of `amount`.
    ///
    /// The sign of `amount` itself is ignored, so both `1000` and `-1000`
    /// give `-1000` for a debit.
    ///
    /// # Errors
    ///
    /// Returns [Error::AmountOutOfRange] if `amount` is `i64::MIN`, whose
    /// magnitude does not fit in an `i64`.
    pub fn signed_amount(self, amount: i64) -> Result<i64, Error> {
        let magnitude = amount
            .checked_abs()
            .ok_or(Error::AmountOutOfRange(amount))?;

        Ok(match self {
            TransactionType::Credit => magnitude,
            TransactionType::Debit => -magnitude,
        })
    }
}

/// The label of a transaction, guaranteed to not be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionTitle(String);

impl TransactionTitle {
    /// Create a transaction title, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyTitle] if `title` is empty
    /// or only whitespace.
    pub fn new(title: &str) -> Result<Self, Error> {
        let title = title.trim();

        if title.is_empty() {
            Err(Error::EmptyTitle)
        } else {
            Ok(Self(title.to_string()))
        }
    }
}

impl AsRef<str> for TransactionTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TransactionTitle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionTitle::new(s)
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// A fresh ID is generated for the transaction.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (id, title, amount, created_at, session_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, title, amount, created_at, session_id",
        )?
        .query_one(
            (
                Uuid::new_v4(),
                builder.title.as_ref(),
                builder.amount,
                builder.created_at,
                builder.session_id,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction with `id` that belongs to `session_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction in the session,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    session_id: SessionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, title, amount, created_at, session_id FROM \"transaction\"
             WHERE id = :id AND session_id = :session_id",
        )?
        .query_one(
            rusqlite::named_params! { ":id": id, ":session_id": session_id },
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve all the transactions that belong to `session_id`, oldest first.
///
/// Transactions created at the same instant are ordered by ID.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_transactions(
    session_id: SessionId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, title, amount, created_at, session_id FROM \"transaction\"
             WHERE session_id = :session_id
             ORDER BY created_at ASC, id ASC",
        )?
        .query_map(&[(":session_id", &session_id)], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get the balance of a session, i.e. the sum of the amounts of all its
/// transactions. A session without transactions has a balance of zero.
///
/// The sum is taken as an `i128` so that any number of `i64` amounts add up
/// exactly.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_balance(session_id: SessionId, connection: &Connection) -> Result<i128, Error> {
    connection
        .prepare("SELECT amount FROM \"transaction\" WHERE session_id = :session_id")?
        .query_map(&[(":session_id", &session_id)], |row| row.get::<_, i64>(0))?
        .map(|maybe_amount| maybe_amount.map(i128::from).map_err(Error::from))
        .sum()
}

/// Get the total number of transactions in the database across all sessions.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id BLOB PRIMARY KEY,
                title TEXT NOT NULL,
                amount INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                session_id BLOB NOT NULL
                )",
        (),
    )?;

    // Every query is scoped by session.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_session ON \"transaction\"(session_id, created_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let amount = row.get(2)?;
    let created_at = row.get(3)?;
    let session_id = row.get(4)?;

    Ok(Transaction {
        id,
        title,
        amount,
        created_at,
        session_id,
    })
}

// ============================================================================
// TESTS
// ============================================================================
