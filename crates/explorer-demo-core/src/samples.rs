//! Sample-search catalog.
//!
//! Canned searches shown on `/queries/demo/<n>`. Their queries are kept as raw
//! JSON and go through the same normalizer as URL queries.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// One canned search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSearch {
    pub id: i64,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Partial query descriptors, in display order.
    pub queries: Vec<Value>,
}

/// Ordered list of sample searches, addressed by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleCatalog {
    searches: Vec<SampleSearch>,
}

impl SampleCatalog {
    #[must_use]
    pub const fn new(searches: Vec<SampleSearch>) -> Self {
        Self { searches }
    }

    /// Parse a catalog from a JSON array of searches.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Load a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&raw)?;
        tracing::debug!(path = %path.display(), count = catalog.len(), "loaded sample catalog");
        Ok(catalog)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.searches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SampleSearch> {
        self.searches.iter()
    }

    /// The search at `index`, or `SampleNotFound` when out of range.
    pub fn get(&self, index: usize) -> Result<&SampleSearch> {
        self.searches
            .get(index)
            .ok_or_else(|| Error::SampleNotFound(index.to_string()))
    }
}
