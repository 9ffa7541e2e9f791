//! Authentication module
//!
//! Session login and logout against the management API.
//!
//! The token shape depends on the API version: up to 29.0 the server returns
//! a single `x-vcloud-authorization` token, later versions return a token type
//! and access token that are sent back as an `Authorization` header. The
//! choice is made once, when the session opens.

mod session;
mod types;

pub use session::{SessionManager, SESSIONS_PATH, SESSION_PATH};
pub use types::{
    ApiVersion, AuthContext, Credentials, TokenScheme, ACCESS_TOKEN_HEADER, LEGACY_TOKEN_CUTOFF,
    LEGACY_TOKEN_HEADER, TOKEN_TYPE_HEADER,
};

#[cfg(test)]
mod tests;
