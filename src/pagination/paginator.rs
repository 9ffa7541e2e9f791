//! Sequential page walker
//!
//! One discovery request fixes the plan; pages `1..=last` are then fetched
//! one at a time, in order, with no retries.

use super::types::{Page, PaginationPlan, QuerySpec};
use crate::auth::AuthContext;
use crate::decode::{QueryPage, QueryRecordsDecoder};
use crate::error::{Error, Result};
use crate::http::{HttpExecutor, HttpRequest};
use crate::types::ErrorPolicy;
use futures::stream::{self, Stream};
use tracing::{debug, error};

/// Pages through a query
pub struct QueryPaginator<'a> {
    executor: &'a dyn HttpExecutor,
    auth: &'a AuthContext,
    query: QuerySpec,
    policy: ErrorPolicy,
    decoder: QueryRecordsDecoder,
}

impl<'a> QueryPaginator<'a> {
    /// Create a paginator; page failures abort by default
    pub fn new(executor: &'a dyn HttpExecutor, auth: &'a AuthContext, query: QuerySpec) -> Self {
        Self {
            executor,
            auth,
            query,
            policy: ErrorPolicy::Fail,
            decoder: QueryRecordsDecoder::new(),
        }
    }

    /// Set what happens when a page request fails
    #[must_use]
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Issue the unpaged discovery request and derive the plan.
    ///
    /// Failure here is always fatal and reported against page 1.
    pub async fn discover(&self) -> Result<PaginationPlan> {
        let first = self.request(None).await.map_err(|e| as_page_error(1, e))?;
        let plan = PaginationPlan::from_discovery(&first, self.query.page_size);

        if plan.page_size != self.query.page_size {
            debug!(
                "Server honored page size {} (requested {})",
                plan.page_size, self.query.page_size
            );
        }
        if !plan.pages_agree() {
            debug!(
                "Calculated {} pages but server reports last page {}",
                plan.calculated_total_pages, plan.last_page_from_server
            );
        }
        debug!(
            "Query plan: {} records, page size {}, pages 1..={}",
            plan.total_records, plan.page_size, plan.last_page_from_server
        );

        Ok(plan)
    }

    /// Fetch one page
    pub async fn fetch_page(&self, index: u32) -> Result<Page> {
        let decoded = self
            .request(Some(index))
            .await
            .map_err(|e| as_page_error(index, e))?;

        debug!("Page {index}: {} records", decoded.records.len());
        Ok(Page::new(index, decoded.records))
    }

    /// Fetch one page, applying the error policy
    async fn fetch_page_with_policy(&self, index: u32) -> Result<Page> {
        match self.fetch_page(index).await {
            Ok(page) => Ok(page),
            Err(e) if self.policy.is_fail() => Err(e),
            Err(e) => {
                error!("{e}; continuing");
                Ok(Page::failed(index, e.to_string()))
            }
        }
    }

    /// Lazy, finite walk over `plan.page_indexes()`.
    ///
    /// Under `ErrorPolicy::Fail` the stream ends after yielding the first
    /// error.
    pub fn pages(self, plan: &PaginationPlan) -> impl Stream<Item = Result<Page>> + 'a {
        let last = plan.last_page_from_server;

        stream::unfold(
            (self, 1u32, false),
            move |(paginator, index, stopped)| async move {
                if stopped || index > last {
                    return None;
                }
                let item = paginator.fetch_page_with_policy(index).await;
                let stop = item.is_err();
                Some((item, (paginator, index + 1, stop)))
            },
        )
    }

    /// Discover, then walk every page
    pub async fn fetch_all(
        self,
    ) -> Result<(PaginationPlan, impl Stream<Item = Result<Page>> + 'a)> {
        let plan = self.discover().await?;
        let pages = self.pages(&plan);
        Ok((plan, pages))
    }

    async fn request(&self, page: Option<u32>) -> Result<QueryPage> {
        let mut request = HttpRequest::get(self.query.endpoint()).expect(200);
        for (key, value) in self.query.params(page) {
            request = request.query(key, value);
        }
        for (key, value) in self.auth.headers() {
            request = request.header(key, value);
        }

        let response = self.executor.execute(request).await?;
        self.decoder.decode(&response.body)
    }
}

/// Attach the page index to a failed request
fn as_page_error(index: u32, err: Error) -> Error {
    match err {
        Error::HttpStatus { status, body } => Error::page_fetch(index, status, body),
        Error::Http(e) => {
            let status = e.status().map_or(0, |s| s.as_u16());
            Error::page_fetch(index, status, e.to_string())
        }
        other => other,
    }
}
