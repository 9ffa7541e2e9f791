//! Session authentication types
//!
//! Credentials going in, the negotiated auth header coming out, and the API
//! version that decides which token shape the server hands back.

use crate::error::{Error, Result};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Legacy session header, both returned by login and sent on later calls
pub const LEGACY_TOKEN_HEADER: &str = "x-vcloud-authorization";

/// Header carrying the token type (e.g. `Bearer`) on newer API versions
pub const TOKEN_TYPE_HEADER: &str = "x-vmware-vcloud-token-type";

/// Header carrying the access token on newer API versions
pub const ACCESS_TOKEN_HEADER: &str = "x-vmware-vcloud-access-token";

/// Highest API version that still uses the legacy token header
pub const LEGACY_TOKEN_CUTOFF: ApiVersion = ApiVersion::new(29, 0);

/// A `major.minor` API version, compared numerically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    /// Major component
    pub major: u32,
    /// Minor component
    pub minor: u32,
}

impl ApiVersion {
    /// Create a version
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Accept header value pinning this version
    pub fn accept_header(&self) -> String {
        format!("application/*+xml;version={self}")
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        LEGACY_TOKEN_CUTOFF
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::invalid_value("api_version", format!("'{s}' is not MAJOR.MINOR"));

        let s = s.trim();
        let (major, minor) = match s.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (s, "0"),
        };

        let major = major.parse().map_err(|_| invalid())?;
        let minor = minor.parse().map_err(|_| invalid())?;
        Ok(Self { major, minor })
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        // YAML may hand us `29.0` as a float
        let raw = serde_yaml::Value::deserialize(deserializer)?;
        let text = match raw {
            serde_yaml::Value::String(s) => s,
            serde_yaml::Value::Number(n) => n.to_string(),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "expected a version, got {other:?}"
                )))
            }
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// How the session token is carried on calls after login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenScheme {
    /// `x-vcloud-authorization: <token>`
    Legacy,
    /// `Authorization: <tokenType> <accessToken>`
    Bearer,
}

impl TokenScheme {
    /// Pick the scheme for an API version
    pub fn for_version(version: ApiVersion) -> Self {
        if version <= LEGACY_TOKEN_CUTOFF {
            Self::Legacy
        } else {
            Self::Bearer
        }
    }
}

impl fmt::Display for TokenScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy ({LEGACY_TOKEN_HEADER})"),
            Self::Bearer => write!(f, "bearer (Authorization)"),
        }
    }
}

/// Login credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// User name
    pub username: String,
    /// Password
    pub password: String,
    /// Organization the user logs into (`System` for provider admins)
    pub org: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        org: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            org: org.into(),
        }
    }

    /// `Basic base64(user@org:password)`
    pub fn basic_authorization(&self) -> String {
        let raw = format!("{}@{}:{}", self.username, self.org, self.password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(raw);
        format!("Basic {encoded}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("org", &self.org)
            .finish()
    }
}

/// An open session: the header to send on every later call
#[derive(Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Token scheme fixed at login
    pub scheme: TokenScheme,
    /// API version the session was opened with
    pub api_version: ApiVersion,
    /// Name of the auth header
    pub header_name: String,
    /// Value of the auth header
    pub header_value: String,
}

impl AuthContext {
    /// Build a legacy-token context
    pub fn legacy(api_version: ApiVersion, token: impl Into<String>) -> Self {
        Self {
            scheme: TokenScheme::Legacy,
            api_version,
            header_name: LEGACY_TOKEN_HEADER.to_string(),
            header_value: token.into(),
        }
    }

    /// Build a bearer-token context
    pub fn bearer(api_version: ApiVersion, token_type: &str, token: &str) -> Self {
        Self {
            scheme: TokenScheme::Bearer,
            api_version,
            header_name: "Authorization".to_string(),
            header_value: format!("{token_type} {token}"),
        }
    }

    /// Headers every authenticated call carries
    pub fn headers(&self) -> Vec<(String, String)> {
        vec![
            (self.header_name.clone(), self.header_value.clone()),
            ("Accept".to_string(), self.api_version.accept_header()),
        ]
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("scheme", &self.scheme)
            .field("api_version", &self.api_version)
            .field("header_name", &self.header_name)
            .field("header_value", &"***")
            .finish()
    }
}
