//! Runtime settings
//!
//! Settings are layered, later layers winning:
//!
//! 1. YAML file (`--config`)
//! 2. Environment (`VCD_SERVER`, `VCD_USERNAME`, `VCD_PASSWORD`, `VCD_ORG`,
//!    `VCD_API_VERSION`)
//! 3. Command-line flags
//!
//! Each layer is a [`PartialSettings`]; [`PartialSettings::resolve`] applies
//! defaults and validates the merged result into [`Settings`].

use crate::auth::{ApiVersion, Credentials};
use crate::engine::RunConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::{QuerySpec, DEFAULT_PAGE_SIZE, DEFAULT_QUERY_TYPE};
use crate::types::ErrorPolicy;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Default login organization
pub const DEFAULT_ORG: &str = "System";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment variables read by [`PartialSettings::from_env`]
pub const ENV_SERVER: &str = "VCD_SERVER";
pub const ENV_USERNAME: &str = "VCD_USERNAME";
pub const ENV_PASSWORD: &str = "VCD_PASSWORD";
pub const ENV_ORG: &str = "VCD_ORG";
pub const ENV_API_VERSION: &str = "VCD_API_VERSION";

const MASK: &str = "********";

// ============================================================================
// Partial Settings
// ============================================================================

/// One layer of settings; unset fields fall through to earlier layers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialSettings {
    pub server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub org: Option<String>,
    pub api_version: Option<ApiVersion>,
    pub target_org: Option<String>,
    pub query_type: Option<String>,
    pub filter: Option<String>,
    pub page_size: Option<u32>,
    pub fail_fast: Option<bool>,
    pub accept_invalid_certs: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub requests_per_second: Option<u32>,
}

impl PartialSettings {
    /// Create an empty layer
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML layer
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a YAML layer from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Read the environment layer
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the environment layer from any variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Ok(Self {
            server: get(ENV_SERVER),
            username: get(ENV_USERNAME),
            password: get(ENV_PASSWORD),
            org: get(ENV_ORG),
            api_version: get(ENV_API_VERSION)
                .map(|v| v.parse::<ApiVersion>())
                .transpose()?,
            ..Self::default()
        })
    }

    /// Overlay `other` on top of `self`
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            server: other.server.or(self.server),
            username: other.username.or(self.username),
            password: other.password.or(self.password),
            org: other.org.or(self.org),
            api_version: other.api_version.or(self.api_version),
            target_org: other.target_org.or(self.target_org),
            query_type: other.query_type.or(self.query_type),
            filter: other.filter.or(self.filter),
            page_size: other.page_size.or(self.page_size),
            fail_fast: other.fail_fast.or(self.fail_fast),
            accept_invalid_certs: other.accept_invalid_certs.or(self.accept_invalid_certs),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            requests_per_second: other.requests_per_second.or(self.requests_per_second),
        }
    }

    /// Apply defaults and validate
    pub fn resolve(self) -> Result<Settings> {
        let server = required("server", self.server)?;
        url::Url::parse(&server)?;

        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be at least 1"));
        }

        if self.requests_per_second == Some(0) {
            return Err(Error::invalid_value(
                "requests_per_second",
                "must be at least 1 when set",
            ));
        }

        Ok(Settings {
            server,
            username: required("username", self.username)?,
            password: required("password", self.password)?,
            org: self.org.unwrap_or_else(|| DEFAULT_ORG.to_string()),
            api_version: self.api_version.unwrap_or_default(),
            target_org: self.target_org.filter(|t| !t.is_empty()),
            query_type: self
                .query_type
                .unwrap_or_else(|| DEFAULT_QUERY_TYPE.to_string()),
            filter: self.filter,
            page_size,
            fail_fast: self.fail_fast.unwrap_or(true),
            accept_invalid_certs: self.accept_invalid_certs.unwrap_or(false),
            timeout_secs,
            requests_per_second: self.requests_per_second,
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    match value {
        None => Err(Error::missing_field(field)),
        Some(v) if v.trim().is_empty() => Err(Error::invalid_value(field, "must not be empty")),
        Some(v) => Ok(v),
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Fully resolved settings
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub server: String,
    pub username: String,
    #[serde(serialize_with = "masked")]
    pub password: String,
    pub org: String,
    pub api_version: ApiVersion,
    pub target_org: Option<String>,
    pub query_type: String,
    /// Explicit filter; defaults to `orgName==<target_org>`
    pub filter: Option<String>,
    pub page_size: u32,
    pub fail_fast: bool,
    pub accept_invalid_certs: bool,
    pub timeout_secs: u64,
    pub requests_per_second: Option<u32>,
}

impl Settings {
    /// Resolve settings from an optional file, the environment and overrides
    pub fn load(config_path: Option<&Path>, overrides: PartialSettings) -> Result<Self> {
        let file = match config_path {
            Some(path) => PartialSettings::from_file(path)?,
            None => PartialSettings::default(),
        };

        file.merge(PartialSettings::from_env()?)
            .merge(overrides)
            .resolve()
    }

    /// Login credentials
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password, &self.org)
    }

    /// Policy for a failed login or page; logout failures are always reported
    pub fn error_policy(&self) -> ErrorPolicy {
        ErrorPolicy::from_fail_fast(self.fail_fast)
    }

    /// HTTP client settings
    pub fn http_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .accept_invalid_certs(self.accept_invalid_certs);

        let builder = match self.requests_per_second {
            Some(rps) => builder.rate_limit(RateLimiterConfig::per_second(rps)),
            None => builder.no_rate_limit(),
        };
        builder.build()
    }

    /// The query to run.
    ///
    /// Needs either a target organization or an explicit filter.
    pub fn query(&self) -> Result<QuerySpec> {
        let filter = match (&self.filter, &self.target_org) {
            (Some(filter), _) => filter.clone(),
            (None, Some(target)) => format!("orgName=={target}"),
            (None, None) => return Err(Error::missing_field("target_org")),
        };

        Ok(QuerySpec::org_networks(&self.server, "")
            .with_query_type(&self.query_type)
            .with_filter(filter)
            .with_page_size(self.page_size))
    }

    /// Everything the engine needs for one run
    pub fn run_config(&self) -> Result<RunConfig> {
        Ok(self.build_run_config(self.query()?))
    }

    /// Run config for session-only commands, which need no query target
    pub fn session_config(&self) -> RunConfig {
        let query = self.query().unwrap_or_else(|_| {
            QuerySpec::org_networks(&self.server, "")
                .with_query_type(&self.query_type)
                .with_filter("")
        });
        self.build_run_config(query)
    }

    fn build_run_config(&self, query: QuerySpec) -> RunConfig {
        RunConfig::new(&self.server, self.credentials(), self.api_version, query)
            .with_login_policy(self.error_policy())
            .with_page_policy(self.error_policy())
    }

    /// YAML rendering with the password masked
    pub fn to_masked_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &MASK)
            .field("org", &self.org)
            .field("api_version", &self.api_version)
            .field("target_org", &self.target_org)
            .field("query_type", &self.query_type)
            .field("filter", &self.filter)
            .field("page_size", &self.page_size)
            .field("fail_fast", &self.fail_fast)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("timeout_secs", &self.timeout_secs)
            .field("requests_per_second", &self.requests_per_second)
            .finish()
    }
}

fn masked<S: Serializer>(_: &str, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(MASK)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    fn base() -> PartialSettings {
        PartialSettings {
            server: Some("https://vcd.example.com".to_string()),
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            ..PartialSettings::default()
        }
    }

    #[test]
    fn test_defaults() {
        let settings = base().resolve().unwrap();

        assert_eq!(settings.org, "System");
        assert_eq!(settings.api_version, ApiVersion::new(29, 0));
        assert_eq!(settings.query_type, "adminOrgNetwork");
        assert_eq!(settings.page_size, 128);
        assert!(settings.fail_fast);
        assert!(!settings.accept_invalid_certs);
        assert_eq!(settings.timeout_secs, 300);
        assert_eq!(settings.requests_per_second, None);
        assert_eq!(settings.error_policy(), ErrorPolicy::Fail);
    }

    #[test]
    fn test_yaml_file_layer() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r"
server: https://vcd.example.com
username: admin
password: secret
org: Provider
api_version: 31.0
target_org: Tenant
page_size: 25
fail_fast: false
"
        )
        .unwrap();

        let settings = PartialSettings::from_file(file.path())
            .unwrap()
            .resolve()
            .unwrap();

        assert_eq!(settings.org, "Provider");
        assert_eq!(settings.api_version, ApiVersion::new(31, 0));
        assert_eq!(settings.target_org.as_deref(), Some("Tenant"));
        assert_eq!(settings.page_size, 25);
        assert_eq!(settings.error_policy(), ErrorPolicy::Report);
    }

    #[test]
    fn test_missing_file() {
        let err = PartialSettings::from_file("/nonexistent/vcd.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_unknown_yaml_key_is_rejected() {
        assert!(PartialSettings::from_yaml("sever: https://typo").is_err());
    }

    #[test]
    fn test_env_layer() {
        let vars: HashMap<&str, &str> = [
            ("VCD_SERVER", "https://env.example.com"),
            ("VCD_PASSWORD", "from-env"),
            ("VCD_API_VERSION", "32.0"),
            ("VCD_ORG", ""),
        ]
        .into_iter()
        .collect();

        let env = PartialSettings::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();

        assert_eq!(env.server.as_deref(), Some("https://env.example.com"));
        assert_eq!(env.password.as_deref(), Some("from-env"));
        assert_eq!(env.api_version, Some(ApiVersion::new(32, 0)));
        assert_eq!(env.org, None);
        assert_eq!(env.username, None);
    }

    #[test]
    fn test_env_bad_version() {
        let err = PartialSettings::from_lookup(|k| {
            (k == "VCD_API_VERSION").then(|| "latest".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_later_layers_win() {
        let file = base();
        let env = PartialSettings {
            password: Some("env-pass".to_string()),
            org: Some("EnvOrg".to_string()),
            ..PartialSettings::default()
        };
        let cli = PartialSettings {
            org: Some("CliOrg".to_string()),
            ..PartialSettings::default()
        };

        let settings = file.merge(env).merge(cli).resolve().unwrap();
        assert_eq!(settings.server, "https://vcd.example.com");
        assert_eq!(settings.password, "env-pass");
        assert_eq!(settings.org, "CliOrg");
    }

    #[test]
    fn test_validation() {
        let err = PartialSettings {
            server: None,
            ..base()
        }
        .resolve()
        .unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "server"));

        let err = PartialSettings {
            password: Some("  ".to_string()),
            ..base()
        }
        .resolve()
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "password"));

        let err = PartialSettings {
            page_size: Some(0),
            ..base()
        }
        .resolve()
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "page_size"));

        let err = PartialSettings {
            server: Some("not a url".to_string()),
            ..base()
        }
        .resolve()
        .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_query_needs_target_or_filter() {
        let settings = base().resolve().unwrap();
        assert!(matches!(
            settings.query().unwrap_err(),
            Error::MissingConfigField { .. }
        ));

        let settings = PartialSettings {
            target_org: Some("Tenant".to_string()),
            page_size: Some(64),
            ..base()
        }
        .resolve()
        .unwrap();
        let query = settings.query().unwrap();
        assert_eq!(query.filter, "orgName==Tenant");
        assert_eq!(query.page_size, 64);
        assert_eq!(query.endpoint(), "https://vcd.example.com/api/query");

        let settings = PartialSettings {
            target_org: Some("Tenant".to_string()),
            filter: Some("name==web*".to_string()),
            ..base()
        }
        .resolve()
        .unwrap();
        assert_eq!(settings.query().unwrap().filter, "name==web*");
    }

    #[test]
    fn test_password_is_masked() {
        let settings = base().resolve().unwrap();

        let yaml = settings.to_masked_yaml().unwrap();
        assert!(yaml.contains("password: '********'") || yaml.contains("password: \"********\""));
        assert!(!yaml.contains("secret"));
        assert!(!format!("{settings:?}").contains("secret"));
    }

    #[test]
    fn test_http_config() {
        let settings = PartialSettings {
            accept_invalid_certs: Some(true),
            timeout_secs: Some(30),
            requests_per_second: Some(5),
            ..base()
        }
        .resolve()
        .unwrap();

        let http = settings.http_config();
        assert!(http.accept_invalid_certs);
        assert_eq!(http.timeout, Duration::from_secs(30));
        assert_eq!(http.rate_limit, Some(RateLimiterConfig::per_second(5)));
    }

    #[test]
    fn test_fail_fast_drives_login_and_page_policy() {
        let strict = PartialSettings {
            target_org: Some("Tenant".to_string()),
            ..base()
        }
        .resolve()
        .unwrap()
        .run_config()
        .unwrap();
        assert_eq!(strict.login_policy, ErrorPolicy::Fail);
        assert_eq!(strict.page_policy, ErrorPolicy::Fail);
        assert_eq!(strict.teardown_policy, ErrorPolicy::Report);

        let lenient = PartialSettings {
            fail_fast: Some(false),
            ..base()
        }
        .resolve()
        .unwrap()
        .session_config();
        assert_eq!(lenient.login_policy, ErrorPolicy::Report);
        assert_eq!(lenient.page_policy, ErrorPolicy::Report);
        assert_eq!(lenient.teardown_policy, ErrorPolicy::Report);
    }
}
