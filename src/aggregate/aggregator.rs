//! Deduplicating fold over pages

use super::types::{AggregateCounts, FinalAggregate, FoldOutcome, NetworkSummary};
use crate::pagination::Page;
use crate::record::Record;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Unique records seen so far in a run.
///
/// Records are kept in first-seen order; membership is checked against a urn
/// index. A record without a urn cannot collide and is always kept.
#[derive(Debug, Default)]
pub struct AggregateResult {
    records: Vec<Record>,
    index: HashSet<String>,
    observed: u64,
    duplicates: u64,
}

impl AggregateResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one page in, keeping records whose urn is not yet present
    pub fn fold(&mut self, page: Page) -> FoldOutcome {
        let mut outcome = FoldOutcome::default();

        for record in page.records {
            self.observed += 1;

            match record.urn() {
                Some(urn) => {
                    if self.index.insert(urn) {
                        self.records.push(record);
                        outcome.added += 1;
                    } else {
                        outcome.discarded += 1;
                    }
                }
                None => {
                    warn!(
                        "Record '{}' on page {} has no network urn; keeping it",
                        record.name(),
                        page.index
                    );
                    self.records.push(record);
                    outcome.added += 1;
                }
            }
        }

        self.duplicates += outcome.discarded as u64;
        debug!(
            "Page {}: {} of {} records kept, {} duplicates discarded",
            page.index, outcome.added, page.initial_count, outcome.discarded
        );

        outcome
    }

    /// Records kept so far, in first-seen order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of unique records
    pub fn unique(&self) -> u64 {
        self.records.len() as u64
    }

    /// Number of records seen across all folded pages
    pub fn observed(&self) -> u64 {
        self.observed
    }

    /// Number of duplicates dropped while folding
    pub fn duplicates(&self) -> u64 {
        self.duplicates
    }

    /// Reconcile against the server total and sort for presentation
    pub fn finalize(self, total_reported: u64) -> FinalAggregate {
        let unique = self.unique();
        let counts = AggregateCounts {
            total_reported,
            unique,
            discarded: total_reported.saturating_sub(unique),
            observed: self.observed,
            duplicates_observed: self.duplicates,
        };

        if total_reported != self.observed {
            warn!(
                "Server reported {total_reported} records but {} were observed",
                self.observed
            );
        }
        if !counts.reconciles() {
            warn!(
                "Counts do not reconcile: {} unique + {} discarded != {} reported",
                counts.unique, counts.discarded, counts.total_reported
            );
        }

        let mut networks: Vec<NetworkSummary> =
            self.records.iter().map(NetworkSummary::from_record).collect();
        networks.sort_by(NetworkSummary::display_order);

        FinalAggregate {
            counts,
            networks,
            records: self.records,
        }
    }
}
