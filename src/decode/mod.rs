//! Response decoder module
//!
//! Parses query-service XML into records.
//!
//! # Overview
//!
//! A query response is a `QueryResultRecords` root whose attributes carry the
//! paging totals, followed by `Link` children and one element per record.
//! Record fields are the element's attributes.

mod types;
mod xml;

pub use types::{QueryLink, QueryPage};
pub use xml::QueryRecordsDecoder;
