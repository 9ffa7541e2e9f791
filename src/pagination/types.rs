//! Pagination types
//!
//! The plan derived from the discovery response, the query being paged, and
//! the pages handed on to aggregation.

use crate::decode::QueryPage;
use crate::record::Record;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Matches the page index in a page link: `...&page=3&...`
static PAGE_PARAM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[?&;])page=(\d+)").expect("page regex is valid"));

/// Default query type for organization networks
pub const DEFAULT_QUERY_TYPE: &str = "adminOrgNetwork";

/// Default records per page
pub const DEFAULT_PAGE_SIZE: u32 = 128;

/// Query endpoint, relative to the server root
pub const QUERY_PATH: &str = "/api/query";

/// The query being paged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    /// Server root URL
    pub server: String,
    /// Query type, e.g. `adminOrgNetwork`
    pub query_type: String,
    /// Filter expression, e.g. `orgName==Tenant`; omitted when empty
    pub filter: String,
    /// Requested page size
    pub page_size: u32,
}

impl QuerySpec {
    /// Query the default network type filtered to one organization
    pub fn org_networks(server: impl Into<String>, target_org: &str) -> Self {
        Self {
            server: server.into().trim_end_matches('/').to_string(),
            query_type: DEFAULT_QUERY_TYPE.to_string(),
            filter: format!("orgName=={target_org}"),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the query type
    #[must_use]
    pub fn with_query_type(mut self, query_type: impl Into<String>) -> Self {
        self.query_type = query_type.into();
        self
    }

    /// Set the filter expression
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Set the requested page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Full query endpoint URL
    pub fn endpoint(&self) -> String {
        format!("{}{QUERY_PATH}", self.server.trim_end_matches('/'))
    }

    /// Query parameters, with `page` appended when given
    pub fn params(&self, page: Option<u32>) -> Vec<(String, String)> {
        let mut params = vec![
            ("type".to_string(), self.query_type.clone()),
            ("format".to_string(), "records".to_string()),
        ];
        if !self.filter.is_empty() {
            params.push(("filter".to_string(), self.filter.clone()));
        }
        params.push(("pageSize".to_string(), self.page_size.to_string()));
        if let Some(page) = page {
            params.push(("page".to_string(), page.to_string()));
        }
        params
    }
}

/// Paging facts learned from the discovery response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationPlan {
    /// Page size the server honored
    pub page_size: u32,
    /// Records matching the query, as reported by the server
    pub total_records: u64,
    /// `ceil(total_records / page_size)`
    pub calculated_total_pages: u32,
    /// Last page index from the server's `lastPage` link; drives the walk
    pub last_page_from_server: u32,
}

impl PaginationPlan {
    /// Derive the plan from the discovery response.
    ///
    /// `requested_page_size` is used only when the server omits `pageSize`.
    /// Without a `lastPage` link the response's own `page` (or 1) is the last
    /// page. The walk always covers at least one page.
    pub fn from_discovery(first: &QueryPage, requested_page_size: u32) -> Self {
        let page_size = first.page_size.unwrap_or(requested_page_size);
        let total_records = first.total.unwrap_or(first.records.len() as u64);
        let last_page_from_server = first
            .last_page_link()
            .and_then(parse_page_index)
            .or(first.page)
            .unwrap_or(1)
            .max(1);

        Self {
            page_size,
            total_records,
            calculated_total_pages: calculate_total_pages(total_records, page_size),
            last_page_from_server,
        }
    }

    /// Whether the calculated and server page counts agree
    pub fn pages_agree(&self) -> bool {
        self.calculated_total_pages == self.last_page_from_server
    }

    /// Page indexes to fetch, first to last
    pub fn page_indexes(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.last_page_from_server
    }
}

/// `ceil(total / page_size)`; 0 when the page size is 0
pub fn calculate_total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Extract the integer following `page=` in a link
pub fn parse_page_index(link: &str) -> Option<u32> {
    PAGE_PARAM_REGEX
        .captures(link)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// One fetched page of records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Page index, starting at 1
    pub index: u32,
    /// Records in server order
    pub records: Vec<Record>,
    /// Records present when the page was fetched
    pub initial_count: usize,
    /// Failure message when the page was skipped under `ErrorPolicy::Report`
    pub error: Option<String>,
}

impl Page {
    /// Create a page from fetched records
    pub fn new(index: u32, records: Vec<Record>) -> Self {
        let initial_count = records.len();
        Self {
            index,
            records,
            initial_count,
            error: None,
        }
    }

    /// An empty page standing in for one that failed to fetch
    pub fn failed(index: u32, message: impl Into<String>) -> Self {
        Self {
            index,
            records: Vec::new(),
            initial_count: 0,
            error: Some(message.into()),
        }
    }

    /// Whether the page holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the page stands in for a failed fetch
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}
