//! Defines the endpoint for the balance of a session's transactions.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    session::SessionId,
    transaction::{get_balance, state::TransactionState},
};

/// The totals for a session.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of the signed amounts of all the session's transactions.
    ///
    /// Wider than a single amount so that the sum is always exact.
    pub amount: i128,
}

/// The response body for the summary endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// The totals for the caller's session.
    pub summary: Summary,
}

/// A route handler for getting the balance of the caller's session.
pub async fn get_summary_endpoint(
    State(state): State<TransactionState>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Json<SummaryResponse>, Error> {
    let connection = state.connection()?;

    let amount = get_balance(session_id, &connection)
        .inspect_err(|error| tracing::error!("could not get balance for {session_id}: {error}"))?;

    Ok(Json(SummaryResponse {
        summary: Summary { amount },
    }))
}
