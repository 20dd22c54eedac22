//! The pure state transition function.
//!
//! `reduce` never mutates its input. Each call returns a fresh [`AppState`],
//! so any snapshot handed to a subscriber stays valid forever.

use explorer_demo_core::{QueryDescriptor, Reference};

use crate::action::{Action, Resolution};
use crate::state::{AppState, LookupKey};

/// Apply `action` to `state`, producing the next state.
#[must_use]
pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();
    match action {
        Action::LoadQueries(queries) => {
            next.queries = queries;
            next.selected = None;
            next.pending_lookups.clear();
            next.failed_lookups.clear();
            next.generation = state.generation.wrapping_add(1);
        }
        Action::SelectQuery(index) => {
            if let Some(query) = state.live_queries().find(|q| q.index == index) {
                next.selected = Some(query.clone());
            } else {
                tracing::debug!(index, "ignoring selection of missing query");
            }
        }
        Action::ClearSelection => next.selected = None,
        Action::EditSelected(edit) => {
            if let Some(selected) = next.selected.as_mut() {
                edit.apply(selected);
                let index = selected.index;
                if let Some(entry) = next.queries.iter_mut().find(|q| q.index == index) {
                    edit.apply(entry);
                }
            }
        }
        Action::AddQuery(mut query) => {
            if state.query(query.index).is_some() {
                query.index = state.next_index();
            }
            next.selected = Some(query.clone());
            next.queries.push(query);
        }
        Action::DeleteQuery(index) => {
            if let Some(entry) = next.queries.iter_mut().find(|q| q.index == index) {
                entry.deleted = true;
            }
            if state.selected_index() == Some(index) {
                next.selected = None;
            }
        }
        Action::LookupsStarted(keys) => {
            for key in keys {
                next.failed_lookups.remove(&key);
                next.pending_lookups.insert(key);
            }
        }
        Action::ReferencesResolved {
            generation,
            index,
            resolution,
        } => {
            if generation != state.generation {
                tracing::debug!(index, generation, "dropping lookup from a replaced query list");
                return next;
            }
            let key = LookupKey {
                index,
                kind: resolution.kind(),
            };
            next.pending_lookups.remove(&key);
            merge_resolution(&mut next, index, &resolution);
        }
        Action::LookupFailed {
            generation,
            key,
            message,
        } => {
            if generation != state.generation {
                return next;
            }
            tracing::warn!(index = key.index, kind = %key.kind, %message, "reference lookup failed");
            next.pending_lookups.remove(&key);
            next.failed_lookups.insert(key);
        }
        Action::AddNotice(notice) => {
            next.notices.push(notice);
            let excess = next.notices.len().saturating_sub(state.notice_limit);
            next.notices.drain(..excess);
        }
        Action::ClearNotices => next.notices.clear(),
        Action::MarkSearched(at) => next.last_search_time = Some(at),
        Action::Reset => {
            next = AppState {
                generation: state.generation.wrapping_add(1),
                ..AppState::with_notice_limit(state.notice_limit)
            };
        }
    }
    next
}

/// Replace one reference list of the descriptor carrying `index`, and of the
/// selection if it is that descriptor. Missing or deleted targets are left
/// alone; no entry is ever recreated.
fn merge_resolution(next: &mut AppState, index: u32, resolution: &Resolution) {
    let Some(entry) = next.queries.iter_mut().find(|q| q.index == index) else {
        tracing::debug!(index, kind = %resolution.kind(), "lookup target no longer exists");
        return;
    };
    if entry.deleted {
        tracing::debug!(index, kind = %resolution.kind(), "lookup target was deleted");
        return;
    }
    replace_references(entry, resolution);
    if let Some(selected) = next.selected.as_mut().filter(|s| s.index == index) {
        replace_references(selected, resolution);
    }
}

fn replace_references(query: &mut QueryDescriptor, resolution: &Resolution) {
    match resolution {
        Resolution::Sources(sources) => {
            query.sources = sources.iter().cloned().map(Reference::Resolved).collect();
        }
        Resolution::Collections(collections) => {
            query.collections = collections
                .iter()
                .cloned()
                .map(Reference::Resolved)
                .collect();
        }
    }
}
