//! Aggregation types

use crate::record::Record;
use serde::Serialize;
use std::cmp::Ordering;

/// What folding one page changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldOutcome {
    /// Records kept as new
    pub added: usize,
    /// Records dropped as duplicates
    pub discarded: usize,
}

/// Reconciliation counters for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateCounts {
    /// Total reported by the server
    pub total_reported: u64,
    /// Unique records kept
    pub unique: u64,
    /// `total_reported - unique`, saturating at zero
    pub discarded: u64,
    /// Records actually seen across all pages
    pub observed: u64,
    /// Duplicates actually dropped while folding
    pub duplicates_observed: u64,
}

impl AggregateCounts {
    /// `unique + discarded == total_reported`
    pub fn reconciles(&self) -> bool {
        self.unique + self.discarded == self.total_reported
    }

    /// `unique + duplicates_observed == observed`
    pub fn observed_reconciles(&self) -> bool {
        self.unique + self.duplicates_observed == self.observed
    }
}

/// One row of the sorted summary table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    pub name: String,
    pub urn: Option<String>,
    pub href: Option<String>,
}

impl NetworkSummary {
    /// Summarize a record
    pub fn from_record(record: &Record) -> Self {
        Self {
            name: record.name().to_string(),
            urn: record.urn(),
            href: record.href().map(str::to_string),
        }
    }

    /// Display order: name, then urn
    pub fn display_order(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.urn.cmp(&other.urn))
    }
}

/// The finalized result of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FinalAggregate {
    pub counts: AggregateCounts,
    /// Summary rows sorted by display name
    pub networks: Vec<NetworkSummary>,
    /// Unique records in the order they were first seen
    pub records: Vec<Record>,
}

impl FinalAggregate {
    /// Number of unique records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records were kept
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
