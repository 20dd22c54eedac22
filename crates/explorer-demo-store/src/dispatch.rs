//! Planning and running reference lookups against a [`Store`].
//!
//! Lookups are planned and marked pending in one step, run by the caller, and
//! recorded one at a time in whatever order they finish.

use explorer_demo_core::{ExplorerError, ExplorerResult, ReferenceKind};

use crate::action::{Action, Resolution};
use crate::lookup::{LookupRequest, LookupService};
use crate::state::{AppState, LookupKey};
use crate::store::Store;

/// One lookup per reference list that still holds an unresolved entry.
///
/// The request carries every id of that list, resolved or not, since the
/// result replaces the list wholesale. Deleted descriptors are skipped.
#[must_use]
pub fn plan_lookups(state: &AppState) -> Vec<LookupRequest> {
    let mut requests = Vec::new();
    for query in state.live_queries() {
        for kind in [ReferenceKind::Sources, ReferenceKind::Collections] {
            if query.has_unresolved(kind) {
                requests.push(LookupRequest {
                    generation: state.generation,
                    index: query.index,
                    kind,
                    ids: query.reference_ids(kind),
                });
            }
        }
    }
    requests
}

/// A finished lookup, ready to be dispatched.
#[derive(Debug)]
pub struct LookupOutcome {
    pub generation: u64,
    pub key: LookupKey,
    pub result: ExplorerResult<Resolution>,
}

impl LookupOutcome {
    /// The action that records this outcome in state.
    #[must_use]
    pub fn to_action(&self) -> Action {
        match &self.result {
            Ok(resolution) => Action::ReferencesResolved {
                generation: self.generation,
                index: self.key.index,
                resolution: resolution.clone(),
            },
            Err(err) => Action::LookupFailed {
                generation: self.generation,
                key: self.key,
                message: err.to_string(),
            },
        }
    }
}

/// Run one request against `service`.
pub async fn run_lookup<S: LookupService>(service: &S, request: LookupRequest) -> LookupOutcome {
    let key = LookupKey {
        index: request.index,
        kind: request.kind,
    };
    tracing::debug!(
        index = request.index,
        kind = %request.kind,
        ids = request.ids.len(),
        "issuing reference lookup"
    );
    let result = match request.kind {
        ReferenceKind::Sources => service
            .sources_by_ids(&request.ids)
            .await
            .map(Resolution::Sources),
        ReferenceKind::Collections => service
            .collections_by_ids(&request.ids)
            .await
            .map(Resolution::Collections),
    };
    LookupOutcome {
        generation: request.generation,
        key,
        result,
    }
}

/// Tally of one resolve pass.
#[derive(Debug, Default)]
pub struct ResolveSummary {
    pub issued: usize,
    pub resolved: usize,
    /// Failed lookups, as `LookupFailed` errors.
    pub failures: Vec<ExplorerError>,
}

impl ResolveSummary {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn record(&mut self, result: ExplorerResult<()>) {
        match result {
            Ok(()) => self.resolved += 1,
            Err(err) => self.failures.push(err),
        }
    }
}

/// Plan the lookups for the current state and mark them pending.
pub fn start_lookups(store: &mut Store) -> Vec<LookupRequest> {
    let requests = plan_lookups(store.state());
    if !requests.is_empty() {
        store.dispatch(Action::LookupsStarted(
            requests
                .iter()
                .map(|r| LookupKey {
                    index: r.index,
                    kind: r.kind,
                })
                .collect(),
        ));
    }
    requests
}

/// Record one finished lookup. A failure comes back as `LookupFailed`.
pub fn finish_lookup(store: &mut Store, outcome: LookupOutcome) -> ExplorerResult<()> {
    store.dispatch(outcome.to_action());
    outcome
        .result
        .map(|_| ())
        .map_err(|err| ExplorerError::LookupFailed {
            kind: outcome.key.kind,
            index: outcome.key.index,
            message: err.to_string(),
        })
}
