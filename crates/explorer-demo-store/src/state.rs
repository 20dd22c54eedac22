//! Application state for the demo query view.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use explorer_demo_core::{Notice, QueryDescriptor, ReferenceKind, next_free_index};
use serde::Serialize;

/// Default cap on retained notices.
pub const DEFAULT_NOTICE_LIMIT: usize = 20;

/// Identifies one in-flight lookup: a descriptor index and the list it fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LookupKey {
    pub index: u32,
    pub kind: ReferenceKind,
}

/// Aggregate state of the reference lookups for the loaded queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStatus {
    /// No queries loaded.
    Invalid,
    Pending,
    Succeeded,
    Failed,
}

/// Everything the demo query view renders from.
///
/// Treated as immutable: the reducer produces a new value for every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppState {
    pub queries: Vec<QueryDescriptor>,
    /// Snapshot of the selected descriptor; at most one.
    pub selected: Option<QueryDescriptor>,
    pub notices: Vec<Notice>,
    pub pending_lookups: BTreeSet<LookupKey>,
    pub failed_lookups: BTreeSet<LookupKey>,
    pub last_search_time: Option<DateTime<Utc>>,
    /// Bumped whenever the query list is replaced or reset; lookups issued
    /// under an older generation are dropped on arrival.
    pub generation: u64,
    #[serde(skip)]
    pub notice_limit: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            queries: Vec::new(),
            selected: None,
            notices: Vec::new(),
            pending_lookups: BTreeSet::new(),
            failed_lookups: BTreeSet::new(),
            last_search_time: None,
            generation: 0,
            notice_limit: DEFAULT_NOTICE_LIMIT,
        }
    }
}

impl AppState {
    #[must_use]
    pub fn with_notice_limit(notice_limit: usize) -> Self {
        Self {
            notice_limit,
            ..Self::default()
        }
    }

    /// The descriptor carrying `index`, if it is still in the list.
    #[must_use]
    pub fn query(&self, index: u32) -> Option<&QueryDescriptor> {
        self.queries.iter().find(|q| q.index == index)
    }

    /// Descriptors not logically deleted, in list order.
    pub fn live_queries(&self) -> impl Iterator<Item = &QueryDescriptor> {
        self.queries.iter().filter(|q| !q.deleted)
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<u32> {
        self.selected.as_ref().map(|q| q.index)
    }

    /// Index for the next added descriptor: one past the largest in use, or
    /// the first free slot once the top of the range is taken.
    #[must_use]
    pub fn next_index(&self) -> u32 {
        let taken: BTreeSet<u32> = self.queries.iter().map(|q| q.index).collect();
        let from = taken.last().map_or(0, |max| max.saturating_add(1));
        next_free_index(&taken, from).unwrap_or(from)
    }

    #[must_use]
    pub fn lookup_status(&self) -> LookupStatus {
        if self.queries.is_empty() {
            LookupStatus::Invalid
        } else if !self.pending_lookups.is_empty() {
            LookupStatus::Pending
        } else if !self.failed_lookups.is_empty() {
            LookupStatus::Failed
        } else {
            LookupStatus::Succeeded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn descriptor(index: u32) -> QueryDescriptor {
        let day = NaiveDate::from_ymd_opt(2017, 3, 1).unwrap();
        QueryDescriptor {
            index,
            label: format!("q{index}"),
            q: format!("q{index}"),
            color: "#1f77b4".into(),
            start_date: day,
            end_date: day,
            sources: Vec::new(),
            collections: Vec::new(),
            description: None,
            custom: false,
            deleted: false,
        }
    }

    #[test]
    fn empty_state_is_invalid() {
        let state = AppState::default();
        assert_eq!(state.lookup_status(), LookupStatus::Invalid);
        assert_eq!(state.next_index(), 0);
        assert_eq!(state.notice_limit, DEFAULT_NOTICE_LIMIT);
    }

    #[test]
    fn status_prefers_pending_over_failed() {
        let mut state = AppState {
            queries: vec![descriptor(0)],
            ..AppState::default()
        };
        assert_eq!(state.lookup_status(), LookupStatus::Succeeded);

        let key = LookupKey {
            index: 0,
            kind: ReferenceKind::Sources,
        };
        state.failed_lookups.insert(key);
        assert_eq!(state.lookup_status(), LookupStatus::Failed);

        state.pending_lookups.insert(LookupKey {
            index: 0,
            kind: ReferenceKind::Collections,
        });
        assert_eq!(state.lookup_status(), LookupStatus::Pending);
    }

    #[test]
    fn next_index_skips_past_gaps() {
        let state = AppState {
            queries: vec![descriptor(0), descriptor(5), descriptor(2)],
            ..AppState::default()
        };
        assert_eq!(state.next_index(), 6);
        assert_eq!(state.query(5).map(|q| q.q.as_str()), Some("q5"));
        assert!(state.query(3).is_none());
    }

    #[test]
    fn next_index_wraps_when_top_is_taken() {
        let state = AppState {
            queries: vec![descriptor(u32::MAX), descriptor(0)],
            ..AppState::default()
        };
        assert_eq!(state.next_index(), 1);
    }

    #[test]
    fn live_queries_skip_deleted() {
        let mut gone = descriptor(1);
        gone.deleted = true;
        let state = AppState {
            queries: vec![descriptor(0), gone],
            ..AppState::default()
        };
        assert_eq!(state.live_queries().count(), 1);
    }
}
