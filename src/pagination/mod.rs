//! Pagination module
//!
//! Page-number walk over the query service.
//!
//! # Overview
//!
//! An unpaged discovery request yields the honored page size, the record
//! total and a `lastPage` link. The link's page index is authoritative for
//! how many pages are fetched; the page count computed from the total is kept
//! for diagnostics only.

mod paginator;
mod types;

pub use paginator::QueryPaginator;
pub use types::{
    calculate_total_pages, parse_page_index, Page, PaginationPlan, QuerySpec, DEFAULT_PAGE_SIZE,
    DEFAULT_QUERY_TYPE, QUERY_PATH,
};
