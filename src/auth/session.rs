//! Session manager
//!
//! Logs in with Basic credentials, lifts the session token out of the
//! response headers and logs out again when the run is done.

use super::types::{
    ApiVersion, AuthContext, Credentials, TokenScheme, ACCESS_TOKEN_HEADER, LEGACY_TOKEN_HEADER,
    TOKEN_TYPE_HEADER,
};
use crate::error::{Error, Result};
use crate::http::{HttpExecutor, HttpRequest, HttpResponse};
use crate::types::ErrorPolicy;
use tracing::{debug, error, info, warn};

/// Login endpoint, relative to the server root
pub const SESSIONS_PATH: &str = "/api/sessions";

/// Logout endpoint, relative to the server root
pub const SESSION_PATH: &str = "/api/session";

/// Opens and closes API sessions
pub struct SessionManager<'a> {
    executor: &'a dyn HttpExecutor,
    server: String,
    api_version: ApiVersion,
    login_policy: ErrorPolicy,
    teardown_policy: ErrorPolicy,
}

impl<'a> SessionManager<'a> {
    /// Create a session manager.
    ///
    /// Login failures abort by default; logout failures are reported and
    /// swallowed by default.
    pub fn new(
        executor: &'a dyn HttpExecutor,
        server: impl Into<String>,
        api_version: ApiVersion,
    ) -> Self {
        Self {
            executor,
            server: server.into().trim_end_matches('/').to_string(),
            api_version,
            login_policy: ErrorPolicy::Fail,
            teardown_policy: ErrorPolicy::Report,
        }
    }

    /// Set what happens when login comes back with an unexpected status
    #[must_use]
    pub fn with_login_policy(mut self, policy: ErrorPolicy) -> Self {
        self.login_policy = policy;
        self
    }

    /// Set what happens when logout comes back with an unexpected status
    #[must_use]
    pub fn with_teardown_policy(mut self, policy: ErrorPolicy) -> Self {
        self.teardown_policy = policy;
        self
    }

    /// Token scheme this manager will negotiate
    pub fn scheme(&self) -> TokenScheme {
        TokenScheme::for_version(self.api_version)
    }

    /// Log in.
    ///
    /// Returns `Ok(None)` when login failed under `ErrorPolicy::Report`.
    /// Transport failures always propagate.
    pub async fn open_session(&self, credentials: &Credentials) -> Result<Option<AuthContext>> {
        let request = HttpRequest::post(format!("{}{SESSIONS_PATH}", self.server))
            .header("Authorization", credentials.basic_authorization())
            .header("Accept", self.api_version.accept_header())
            .expect(200);

        debug!(
            "Opening session for {}@{} (API {})",
            credentials.username, credentials.org, self.api_version
        );

        let outcome = match self.executor.execute(request).await {
            Ok(response) => self.extract_context(&response),
            Err(Error::HttpStatus { status, body }) => Err(Error::authentication(status, body)),
            Err(e) => return Err(e),
        };

        match outcome {
            Ok(context) => {
                info!(
                    "Session opened as {}@{} using {} token",
                    credentials.username, credentials.org, context.scheme
                );
                Ok(Some(context))
            }
            Err(e) if self.login_policy.is_fail() => Err(e),
            Err(e) => {
                error!("{e}");
                Ok(None)
            }
        }
    }

    /// Log out.
    ///
    /// Under `ErrorPolicy::Report` any failure, transport included, is logged
    /// and `Ok(())` returned.
    pub async fn close_session(&self, context: &AuthContext) -> Result<()> {
        let headers = context.headers();
        let request = HttpRequest::delete(format!("{}{SESSION_PATH}", self.server))
            .headers(headers.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .expect(204);

        let outcome = match self.executor.execute(request).await {
            Ok(_) => Ok(()),
            Err(Error::HttpStatus { status, body }) => Err(Error::teardown(status, body)),
            Err(e) => Err(Error::teardown(0, e.to_string())),
        };

        match outcome {
            Ok(()) => {
                info!("Session closed");
                Ok(())
            }
            Err(e) if self.teardown_policy.is_fail() => Err(e),
            Err(e) => {
                warn!("{e}");
                Ok(())
            }
        }
    }

    /// Pull the auth header out of a login response
    fn extract_context(&self, response: &HttpResponse) -> Result<AuthContext> {
        let missing = |header: &str| {
            Error::authentication(
                response.status,
                format!("login response has no '{header}' header"),
            )
        };

        match self.scheme() {
            TokenScheme::Legacy => {
                let token = response
                    .header(LEGACY_TOKEN_HEADER)
                    .ok_or_else(|| missing(LEGACY_TOKEN_HEADER))?;
                Ok(AuthContext::legacy(self.api_version, token))
            }
            TokenScheme::Bearer => {
                let token_type = response
                    .header(TOKEN_TYPE_HEADER)
                    .ok_or_else(|| missing(TOKEN_TYPE_HEADER))?;
                let token = response
                    .header(ACCESS_TOKEN_HEADER)
                    .ok_or_else(|| missing(ACCESS_TOKEN_HEADER))?;
                Ok(AuthContext::bearer(self.api_version, token_type, token))
            }
        }
    }
}
