//! Engine types
//!
//! What a run needs going in, and what it hands to reporting coming out.

use crate::aggregate::FinalAggregate;
use crate::auth::{ApiVersion, Credentials, TokenScheme};
use crate::pagination::{Page, PaginationPlan, QuerySpec};
use crate::types::ErrorPolicy;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Inputs for one query run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Server root URL
    pub server: String,
    /// Login credentials
    pub credentials: Credentials,
    /// API version sent in `Accept` and used to pick the token scheme
    pub api_version: ApiVersion,
    /// The query to page through
    pub query: QuerySpec,
    /// What a failed login does
    pub login_policy: ErrorPolicy,
    /// What a failed page does
    pub page_policy: ErrorPolicy,
    /// What a failed logout does
    pub teardown_policy: ErrorPolicy,
}

impl RunConfig {
    /// Create a run config; login and page failures abort, logout failures
    /// are reported
    pub fn new(
        server: impl Into<String>,
        credentials: Credentials,
        api_version: ApiVersion,
        query: QuerySpec,
    ) -> Self {
        Self {
            server: server.into(),
            credentials,
            api_version,
            query,
            login_policy: ErrorPolicy::Fail,
            page_policy: ErrorPolicy::Fail,
            teardown_policy: ErrorPolicy::Report,
        }
    }

    /// Set the login failure policy
    #[must_use]
    pub fn with_login_policy(mut self, policy: ErrorPolicy) -> Self {
        self.login_policy = policy;
        self
    }

    /// Set the page failure policy
    #[must_use]
    pub fn with_page_policy(mut self, policy: ErrorPolicy) -> Self {
        self.page_policy = policy;
        self
    }

    /// Set the logout failure policy
    #[must_use]
    pub fn with_teardown_policy(mut self, policy: ErrorPolicy) -> Self {
        self.teardown_policy = policy;
        self
    }
}

/// Statistics for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Wall time in milliseconds
    pub duration_ms: u64,
    /// HTTP requests issued, login and logout included
    pub requests: u32,
    /// Pages fetched successfully
    pub pages_fetched: u32,
    /// Pages skipped after a reported failure
    pub pages_failed: u32,
    /// Indexes of the skipped pages
    pub failed_pages: Vec<u32>,
}

impl Default for RunStats {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            duration_ms: 0,
            requests: 0,
            pages_fetched: 0,
            pages_failed: 0,
            failed_pages: Vec::new(),
        }
    }
}

impl RunStats {
    /// Start the clock
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a page
    pub fn add_page(&mut self, page: &Page) {
        if page.is_failed() {
            self.pages_failed += 1;
            self.failed_pages.push(page.index);
        } else {
            self.pages_fetched += 1;
        }
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Everything a report is rendered from
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Query type that was paged
    pub query_type: String,
    /// Filter expression that was applied
    pub filter: String,
    /// Token scheme in use; `None` when no session was established
    pub scheme: Option<TokenScheme>,
    /// Pagination plan; `None` when no session was established
    pub plan: Option<PaginationPlan>,
    /// Deduplicated, sorted result
    pub result: FinalAggregate,
    pub stats: RunStats,
}

impl RunReport {
    /// A report for a run that never got a session
    pub fn without_session(query: &QuerySpec, stats: RunStats) -> Self {
        Self {
            query_type: query.query_type.clone(),
            filter: query.filter.clone(),
            scheme: None,
            plan: None,
            result: FinalAggregate::default(),
            stats,
        }
    }

    /// Whether a session was established
    pub fn has_session(&self) -> bool {
        self.scheme.is_some()
    }
}
