//! Network query records
//!
//! A record is the flat attribute map of one `*Record` element returned by the
//! query service. Its identity is a urn derived from the `href` attribute.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Namespace prefixed to every derived network urn
pub const URN_PREFIX: &str = "urn:vcloud:network:";

/// Path marker preceding the network id in a record href
const NETWORK_PATH: &str = "/api/network/";

/// Looser marker for admin links (`/api/admin/network/<id>`)
const ADMIN_NETWORK_PATH: &str = "/network/";

/// One network entity returned by the query service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Get a field value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// All fields, ordered by name
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The `href` attribute
    pub fn href(&self) -> Option<&str> {
        self.get("href")
    }

    /// Display name, empty when the record has no `name` attribute
    pub fn name(&self) -> &str {
        self.get("name").unwrap_or("")
    }

    /// Dedup key derived from `href`
    pub fn urn(&self) -> Option<String> {
        self.href().and_then(derive_urn)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Derive `urn:vcloud:network:<id>` from a network href.
///
/// The id is the path segment after `/api/network/`, falling back to the
/// segment after `/network/`. Returns `None` when neither marker is present
/// or the segment is empty.
pub fn derive_urn(href: &str) -> Option<String> {
    let rest = href
        .find(NETWORK_PATH)
        .map(|pos| &href[pos + NETWORK_PATH.len()..])
        .or_else(|| {
            href.rfind(ADMIN_NETWORK_PATH)
                .map(|pos| &href[pos + ADMIN_NETWORK_PATH.len()..])
        })?;

    let id = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if id.is_empty() {
        return None;
    }

    Some(format!("{URN_PREFIX}{id}"))
}
