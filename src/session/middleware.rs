//! Session middleware that rejects requests without a session cookie.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{AppState, Error, session::cookie::get_session_id_from_cookies};

/// The state needed for the session middleware
#[derive(Clone)]
pub struct SessionState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
}

impl FromRef<AppState> for SessionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<SessionState> for Key {
    fn from_ref(state: &SessionState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a valid session cookie.
/// The session ID is placed into the request and the request executed
/// normally if the cookie is valid, otherwise the request is rejected with
/// [Error::MissingSession] before it reaches the route handler.
///
/// **Note**: Route handlers can use the function argument `Extension(session_id): Extension<SessionId>` to receive the session ID.
///
/// **Note**: The app state must contain an `axum_extra::extract::cookie::Key` for decrypting the cookie contents.
pub async fn session_guard(
    State(state): State<SessionState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Rejecting request.");
            return Error::MissingSession.into_response();
        }
    };
    let session_id = match get_session_id_from_cookies(&jar) {
        Ok(session_id) => session_id,
        Err(error) => {
            tracing::debug!("Rejecting {} {}: {error}", parts.method, parts.uri);
            return error.into_response();
        }
    };

    parts.extensions.insert(session_id);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}
