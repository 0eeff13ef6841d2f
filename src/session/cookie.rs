//! Defines functions for reading and issuing the session cookie.

use axum::{http::header::SET_COOKIE, response::IntoResponse};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key, SameSite},
};

use crate::{Error, session::SessionId};

/// The name of the cookie holding the session ID.
pub(crate) const COOKIE_SESSION_ID: &str = "session_id";

/// Add a session cookie holding `session_id` to the cookie jar.
///
/// Sessions do not expire, so the cookie is made permanent.
///
/// Returns the cookie jar with the cookie added.
pub(crate) fn set_session_cookie(jar: PrivateCookieJar, session_id: SessionId) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION_ID, session_id.to_string()))
            .path("/")
            .permanent()
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Encrypt `session_id` with `key` into the value a client must send in the
/// `session_id` cookie to act as that session.
///
/// Returns `None` if the encrypted cookie could not be read back.
pub fn session_cookie_value(key: Key, session_id: SessionId) -> Option<String> {
    let response = set_session_cookie(PrivateCookieJar::new(key), session_id).into_response();
    let header = response.headers().get(SET_COOKIE)?.to_str().ok()?;

    Cookie::parse(header)
        .ok()
        .map(|cookie| cookie.value().to_owned())
}

/// Read the session ID from the session cookie in `jar`.
///
/// # Errors
///
/// Returns [Error::MissingSession] if the cookie is missing, could not be
/// decrypted, or does not hold a valid session ID.
pub(crate) fn get_session_id_from_cookies(jar: &PrivateCookieJar) -> Result<SessionId, Error> {
    let cookie = jar.get(COOKIE_SESSION_ID).ok_or(Error::MissingSession)?;

    cookie
        .value_trimmed()
        .parse()
        .map_err(|_| Error::MissingSession)
}

/// Get the session ID from `jar`, or mint a new one and add it to the jar if
/// there is none.
///
/// Only the jar returned for a new session carries a cookie to be sent back
/// to the client.
pub(crate) fn resolve_session(jar: PrivateCookieJar) -> (PrivateCookieJar, SessionId) {
    match get_session_id_from_cookies(&jar) {
        Ok(session_id) => (jar, session_id),
        Err(_) => {
            let session_id = SessionId::new();
            tracing::debug!("Starting new session {session_id}");

            (set_session_cookie(jar, session_id), session_id)
        }
    }
}

#[cfg(test)]
mod cookie_tests {
    use axum::{
        http::{HeaderMap, HeaderValue, header::COOKIE},
        response::IntoResponse,
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, SameSite},
    };

    use crate::{Error, create_cookie_key, session::SessionId};

    use super::{
        COOKIE_SESSION_ID, get_session_id_from_cookies, resolve_session, session_cookie_value,
        set_session_cookie,
    };

    fn get_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(create_cookie_key("foobar"))
    }

    #[test]
    fn can_set_cookie() {
        let session_id = SessionId::new();

        let jar = set_session_cookie(get_jar(), session_id);
        let cookie = jar.get(COOKIE_SESSION_ID).unwrap();

        assert_eq!(cookie.value(), session_id.to_string());
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert!(cookie.expires_datetime().is_some());
    }

    #[test]
    fn get_session_id_from_cookie_succeeds() {
        let session_id = SessionId::new();
        let jar = set_session_cookie(get_jar(), session_id);

        let got = get_session_id_from_cookies(&jar).unwrap();

        assert_eq!(got, session_id);
    }

    #[test]
    fn get_session_id_fails_without_cookie() {
        let result = get_session_id_from_cookies(&get_jar());

        assert!(matches!(result, Err(Error::MissingSession)));
    }

    #[test]
    fn get_session_id_fails_on_invalid_value() {
        let jar = get_jar().add(Cookie::new(COOKIE_SESSION_ID, "FOOBAR"));

        let result = get_session_id_from_cookies(&jar);

        assert!(matches!(result, Err(Error::MissingSession)));
    }

    #[test]
    fn resolve_session_reuses_existing_session() {
        let session_id = SessionId::new();
        let jar = set_session_cookie(get_jar(), session_id);

        let (_, got) = resolve_session(jar);

        assert_eq!(got, session_id);
    }

    #[test]
    fn resolve_session_mints_new_session() {
        let (jar, session_id) = resolve_session(get_jar());

        assert_eq!(get_session_id_from_cookies(&jar).unwrap(), session_id);
        assert!(
            jar.into_response()
                .headers()
                .contains_key(axum::http::header::SET_COOKIE),
            "expected a new session to set a cookie"
        );
    }

    #[test]
    fn session_cookie_value_is_accepted_as_cookie() {
        let session_id = SessionId::new();
        let value = session_cookie_value(create_cookie_key("foobar"), session_id)
            .expect("could not encrypt session cookie");
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{COOKIE_SESSION_ID}={value}")).unwrap(),
        );

        let jar = PrivateCookieJar::from_headers(&headers, create_cookie_key("foobar"));

        assert_ne!(value, session_id.to_string());
        assert_eq!(get_session_id_from_cookies(&jar).unwrap(), session_id);
    }
}
