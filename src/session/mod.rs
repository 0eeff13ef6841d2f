//! Anonymous sessions identified by an encrypted cookie.

mod cookie;
mod id;
mod middleware;

pub(crate) use cookie::resolve_session;
pub use cookie::session_cookie_value;
pub use id::SessionId;
pub use middleware::session_guard;

#[cfg(test)]
pub(crate) use cookie::{COOKIE_SESSION_ID, set_session_cookie};
