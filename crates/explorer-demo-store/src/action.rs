//! Actions accepted by the reducer.

use chrono::{DateTime, NaiveDate, Utc};
use explorer_demo_core::{Collection, MediaSource, Notice, QueryDescriptor, ReferenceKind};

use crate::state::LookupKey;

/// Resolved objects for one reference list of one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Sources(Vec<MediaSource>),
    Collections(Vec<Collection>),
}

impl Resolution {
    #[must_use]
    pub const fn kind(&self) -> ReferenceKind {
        match self {
            Self::Sources(_) => ReferenceKind::Sources,
            Self::Collections(_) => ReferenceKind::Collections,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Sources(items) => items.len(),
            Self::Collections(items) => items.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A user edit to one field of the selected descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEdit {
    Label(String),
    Q(String),
    Color(String),
    Description(Option<String>),
    StartDate(NaiveDate),
    EndDate(NaiveDate),
}

impl QueryEdit {
    pub(crate) fn apply(&self, query: &mut QueryDescriptor) {
        match self {
            Self::Label(label) => query.label.clone_from(label),
            Self::Q(q) => query.q.clone_from(q),
            Self::Color(color) => query.color.clone_from(color),
            Self::Description(description) => query.description.clone_from(description),
            Self::StartDate(date) => query.start_date = *date,
            Self::EndDate(date) => query.end_date = *date,
        }
    }
}

/// Every state transition of the demo query view.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the whole query list. Clears selection and lookup bookkeeping.
    LoadQueries(Vec<QueryDescriptor>),
    /// Select the live descriptor with this index.
    SelectQuery(u32),
    ClearSelection,
    /// Edit the selected descriptor; written through to the list entry.
    EditSelected(QueryEdit),
    /// Append a descriptor and select it.
    AddQuery(QueryDescriptor),
    /// Mark a descriptor deleted. It stays in the list.
    DeleteQuery(u32),
    LookupsStarted(Vec<LookupKey>),
    /// Merge a finished lookup into the descriptor with `index`.
    ReferencesResolved {
        generation: u64,
        index: u32,
        resolution: Resolution,
    },
    LookupFailed {
        generation: u64,
        key: LookupKey,
        message: String,
    },
    AddNotice(Notice),
    ClearNotices,
    MarkSearched(DateTime<Utc>),
    /// Back to the empty state.
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_reports_kind_and_len() {
        let r = Resolution::Collections(vec![Collection {
            tags_id: 1,
            label: "a".into(),
            description: None,
        }]);
        assert_eq!(r.kind(), ReferenceKind::Collections);
        assert_eq!(r.len(), 1);
        assert!(Resolution::Sources(Vec::new()).is_empty());
    }
}
