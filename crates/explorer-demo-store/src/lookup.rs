//! Reference lookup service.
//!
//! A [`LookupService`] turns a batch of ids into resolved objects. The
//! [`StaticLookupService`] answers from an in-memory directory, usually
//! loaded from a JSON fixture file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use explorer_demo_core::{
    Collection, ExplorerError, ExplorerResult, MediaSource, ReferenceId, ReferenceKind, Referent,
};
use serde::{Deserialize, Serialize};

/// One batched lookup: every id of `kind` on the descriptor with `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupRequest {
    /// State generation the request was planned under.
    pub generation: u64,
    pub index: u32,
    pub kind: ReferenceKind,
    pub ids: Vec<ReferenceId>,
}

/// Resolves reference ids to objects.
///
/// Results come back in the order of `ids`.
#[allow(async_fn_in_trait)]
pub trait LookupService {
    async fn sources_by_ids(&self, ids: &[ReferenceId]) -> ExplorerResult<Vec<MediaSource>>;

    async fn collections_by_ids(&self, ids: &[ReferenceId]) -> ExplorerResult<Vec<Collection>>;
}

/// Fixture file layout for [`StaticLookupService`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupDirectory {
    #[serde(default)]
    pub sources: Vec<MediaSource>,
    #[serde(default)]
    pub collections: Vec<Collection>,
}

/// In-memory lookup directory. Unknown ids fail the whole batch.
#[derive(Debug, Clone, Default)]
pub struct StaticLookupService {
    sources: HashMap<ReferenceId, MediaSource>,
    collections: HashMap<ReferenceId, Collection>,
}

impl StaticLookupService {
    #[must_use]
    pub fn new(directory: LookupDirectory) -> Self {
        Self {
            sources: index_by_id(directory.sources),
            collections: index_by_id(directory.collections),
        }
    }

    pub fn from_json_str(raw: &str) -> ExplorerResult<Self> {
        let directory: LookupDirectory = serde_json::from_str(raw)?;
        Ok(Self::new(directory))
    }

    pub fn load(path: &Path) -> ExplorerResult<Self> {
        let raw = fs::read_to_string(path)?;
        let service = Self::from_json_str(&raw)?;
        tracing::debug!(
            path = %path.display(),
            sources = service.sources.len(),
            collections = service.collections.len(),
            "loaded lookup fixtures"
        );
        Ok(service)
    }

    #[must_use]
    pub fn with_source(mut self, source: MediaSource) -> Self {
        self.sources.insert(source.media_id, source);
        self
    }

    #[must_use]
    pub fn with_collection(mut self, collection: Collection) -> Self {
        self.collections.insert(collection.tags_id, collection);
        self
    }
}

fn index_by_id<T: Referent>(items: Vec<T>) -> HashMap<ReferenceId, T> {
    items.into_iter().map(|item| (item.id(), item)).collect()
}

fn find_all<T: Referent + Clone>(
    directory: &HashMap<ReferenceId, T>,
    ids: &[ReferenceId],
) -> ExplorerResult<Vec<T>> {
    ids.iter()
        .map(|&id| {
            directory
                .get(&id)
                .cloned()
                .ok_or(ExplorerError::ReferenceNotFound { kind: T::KIND, id })
        })
        .collect()
}

impl LookupService for StaticLookupService {
    async fn sources_by_ids(&self, ids: &[ReferenceId]) -> ExplorerResult<Vec<MediaSource>> {
        find_all(&self.sources, ids)
    }

    async fn collections_by_ids(&self, ids: &[ReferenceId]) -> ExplorerResult<Vec<Collection>> {
        find_all(&self.collections, ids)
    }
}
