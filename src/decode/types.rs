//! Decoded query response types

use crate::record::Record;

/// A `Link` element from a query response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryLink {
    /// Relation, e.g. `nextPage` or `lastPage`
    pub rel: String,
    /// Target URL
    pub href: String,
    /// Media type, if given
    pub media_type: Option<String>,
}

/// One decoded query response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPage {
    /// Root element name
    pub root: String,
    /// `total` attribute: records matching the query across all pages
    pub total: Option<u64>,
    /// `pageSize` attribute honored by the server
    pub page_size: Option<u32>,
    /// `page` attribute: index of this page
    pub page: Option<u32>,
    /// `Link` children
    pub links: Vec<QueryLink>,
    /// Record children, in document order
    pub records: Vec<Record>,
}

impl QueryPage {
    /// Find the link with the given relation
    pub fn link(&self, rel: &str) -> Option<&QueryLink> {
        self.links.iter().find(|l| l.rel == rel)
    }

    /// The `lastPage` link target
    pub fn last_page_link(&self) -> Option<&str> {
        self.link("lastPage").map(|l| l.href.as_str())
    }
}
