//! Record aggregation
//!
//! Folds pages into a single deduplicated result set keyed by record urn:
//!
//! - [`AggregateResult`]: insertion-ordered records plus a urn index
//! - [`FoldOutcome`]: what one page contributed
//! - [`FinalAggregate`]: the sorted, reconciled result handed to reporting

mod aggregator;
mod types;

pub use aggregator::AggregateResult;
pub use types::{AggregateCounts, FinalAggregate, FoldOutcome, NetworkSummary};
