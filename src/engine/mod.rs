//! Execution engine module
//!
//! Drives one query run end to end.
//!
//! # Overview
//!
//! The engine module provides:
//! - `QueryEngine` - Opens a session, pages the query, folds and tears down
//! - `RunConfig` - Inputs for a run
//! - `RunReport` / `RunStats` - What a run produced

mod types;

pub use types::{RunConfig, RunReport, RunStats};

use crate::aggregate::{AggregateResult, FinalAggregate};
use crate::auth::{AuthContext, SessionManager, TokenScheme};
use crate::error::{Error, Result};
use crate::http::{HttpExecutor, HttpRequest, HttpResponse};
use crate::pagination::{PaginationPlan, QueryPaginator};
use crate::types::ErrorPolicy;
use async_trait::async_trait;
use futures::{pin_mut, StreamExt};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;
use tracing::{info, warn};

/// Query engine for one server connection
pub struct QueryEngine {
    /// HTTP executor
    executor: Box<dyn HttpExecutor>,
}

impl QueryEngine {
    /// Create a new engine
    pub fn new(executor: impl HttpExecutor + 'static) -> Self {
        Self {
            executor: Box::new(executor),
        }
    }

    /// Run the query.
    ///
    /// The session is closed after the last page, and also after a fatal page
    /// error, before that error is returned. A page error wins over a teardown
    /// error, which is then only logged. A soft-failed login yields an empty
    /// report.
    pub async fn run(&self, config: &RunConfig) -> Result<RunReport> {
        let started = Instant::now();
        let mut stats = RunStats::new();
        let executor = CountingExecutor::new(self.executor.as_ref());

        let sessions = SessionManager::new(&executor, &config.server, config.api_version)
            .with_login_policy(config.login_policy)
            .with_teardown_policy(config.teardown_policy);

        let Some(auth) = sessions.open_session(&config.credentials).await? else {
            warn!("No session established; skipping query");
            stats.requests = executor.requests();
            stats.set_duration(elapsed_ms(started));
            return Ok(RunReport::without_session(&config.query, stats));
        };

        let collected = collect(&executor, &auth, config, &mut stats).await;
        let closed = sessions.close_session(&auth).await;

        stats.requests = executor.requests();
        stats.set_duration(elapsed_ms(started));

        if let (Err(page_err), Err(teardown_err)) = (&collected, &closed) {
            warn!("Session teardown also failed after '{page_err}': {teardown_err}");
        }
        let (plan, result) = collected?;
        closed?;

        info!(
            "Run complete: {} unique networks, {} discarded, {} pages in {} ms",
            result.counts.unique,
            result.counts.discarded,
            stats.pages_fetched + stats.pages_failed,
            stats.duration_ms
        );

        Ok(RunReport {
            query_type: config.query.query_type.clone(),
            filter: config.query.filter.clone(),
            scheme: Some(auth.scheme),
            plan: Some(plan),
            result,
            stats,
        })
    }

    /// Open and close a session, returning the token scheme in use.
    ///
    /// Both ends are fatal here regardless of the run policies.
    pub async fn check(&self, config: &RunConfig) -> Result<TokenScheme> {
        let sessions =
            SessionManager::new(self.executor.as_ref(), &config.server, config.api_version)
                .with_login_policy(ErrorPolicy::Fail)
                .with_teardown_policy(ErrorPolicy::Fail);

        let auth = sessions
            .open_session(&config.credentials)
            .await?
            .ok_or_else(|| Error::Other("login returned no session".to_string()))?;
        sessions.close_session(&auth).await?;

        Ok(auth.scheme)
    }
}

/// Discover, page and fold
async fn collect(
    executor: &dyn HttpExecutor,
    auth: &AuthContext,
    config: &RunConfig,
    stats: &mut RunStats,
) -> Result<(PaginationPlan, FinalAggregate)> {
    let paginator =
        QueryPaginator::new(executor, auth, config.query.clone()).with_policy(config.page_policy);

    info!(
        "Querying {} where {}",
        config.query.query_type, config.query.filter
    );

    let (plan, pages) = paginator.fetch_all().await?;
    pin_mut!(pages);

    let mut aggregate = AggregateResult::new();
    while let Some(page) = pages.next().await {
        let page = page?;
        stats.add_page(&page);
        aggregate.fold(page);
    }

    Ok((plan, aggregate.finalize(plan.total_records)))
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Counts requests passing through to the wrapped executor
struct CountingExecutor<'a> {
    inner: &'a dyn HttpExecutor,
    requests: AtomicU32,
}

impl<'a> CountingExecutor<'a> {
    fn new(inner: &'a dyn HttpExecutor) -> Self {
        Self {
            inner,
            requests: AtomicU32::new(0),
        }
    }

    fn requests(&self) -> u32 {
        self.requests.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl<'a> HttpExecutor for CountingExecutor<'a> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.inner.execute(request).await
    }
}
