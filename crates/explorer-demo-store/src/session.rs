//! Demo session controller.
//!
//! Drives the store from route changes and user intents: loads queries from a
//! shareable URL or a sample search, resolves their references, builds the
//! shareable path for a search, and resets everything on leave.

use std::sync::Arc;
use std::sync::mpsc::Receiver;

use chrono::{DateTime, NaiveDate, Utc};
use explorer_demo_core::dates::trailing_window;
use explorer_demo_core::url::DEMO_SEARCH_PREFIX;
use explorer_demo_core::{
    Config, DateRange, DemoRoute, ExplorerError, ExplorerResult, Notice, NoticeSink,
    NormalizeDefaults, QueryDescriptor, SampleCatalog, default_color, encode_search_path,
    normalize_queries, parse_demo_route, parse_url_queries, past_two_weeks,
};
use futures::StreamExt;
use futures::stream::FuturesUnordered;

use crate::action::{Action, QueryEdit};
use crate::dispatch::{LookupOutcome, ResolveSummary, finish_lookup, run_lookup, start_lookups};
use crate::lookup::{LookupRequest, LookupService};
use crate::state::{AppState, LookupStatus};
use crate::store::Store;

/// Label of a freshly added custom query.
pub const CUSTOM_QUERY_LABEL: &str = "enter query";

/// Description of a freshly added custom query.
pub const CUSTOM_QUERY_DESCRIPTION: &str = "new";

/// What a navigation did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateOutcome {
    /// The query list was replaced.
    Loaded { count: usize },
    /// Queries were already loaded; the first one was selected.
    SelectedFirst,
    Unchanged,
}

#[derive(Debug)]
pub struct DemoSession {
    store: Store,
    config: Config,
    catalog: SampleCatalog,
    last_path: Option<String>,
    last_handled_search: Option<DateTime<Utc>>,
}

impl DemoSession {
    #[must_use]
    pub fn new(config: Config, catalog: SampleCatalog) -> Self {
        let store = Store::new(AppState::with_notice_limit(config.max_notices));
        Self {
            store,
            config,
            catalog,
            last_path: None,
            last_handled_search: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub fn subscribe(&mut self) -> Receiver<Arc<AppState>> {
        self.store.subscribe()
    }

    /// Handle a route change, defaulting dates from the local clock.
    pub fn navigate(&mut self, path: &str) -> ExplorerResult<NavigateOutcome> {
        let defaults = NormalizeDefaults::now(&self.config);
        self.navigate_with(path, &defaults)
    }

    /// Handle a route change with explicit normalization defaults.
    ///
    /// A URL or sample failure emits exactly one error notice and leaves the
    /// query list untouched.
    pub fn navigate_with(
        &mut self,
        path: &str,
        defaults: &NormalizeDefaults,
    ) -> ExplorerResult<NavigateOutcome> {
        let route = match parse_demo_route(path) {
            Ok(route) => route,
            Err(err) => {
                if matches!(err, ExplorerError::SampleNotFound(_)) {
                    self.report(&err);
                }
                return Err(err);
            }
        };
        let loaded = match &route {
            DemoRoute::Search { json } => parse_url_queries(json, defaults),
            DemoRoute::Sample { index } => self
                .catalog
                .get(*index)
                .and_then(|sample| normalize_queries(&sample.queries, defaults)),
        };
        let queries = match loaded {
            Ok(queries) => queries,
            Err(err) => {
                self.report(&err);
                return Err(err);
            }
        };

        let path_changed = self.last_path.as_deref() != Some(path);
        let searched_since = self.state().last_search_time != self.last_handled_search;
        let needs_load = path_changed
            || self.state().lookup_status() == LookupStatus::Invalid
            || (route.is_editable() && searched_since);

        if needs_load {
            let count = queries.len();
            tracing::info!(path, count, "loading demo queries");
            self.store.dispatch(Action::LoadQueries(queries));
            self.last_path = Some(path.to_string());
            self.last_handled_search = self.state().last_search_time;
            return Ok(NavigateOutcome::Loaded { count });
        }
        if self.select_first_if_ready() {
            return Ok(NavigateOutcome::SelectedFirst);
        }
        Ok(NavigateOutcome::Unchanged)
    }

    /// Resolve every unresolved reference of the loaded queries, then select
    /// the first live query if lookups succeeded and nothing is selected.
    ///
    /// Each failed lookup is reported as an error notice.
    pub async fn resolve<S: LookupService>(&mut self, service: &S) -> ResolveSummary {
        let requests = self.begin_resolve();
        let mut summary = ResolveSummary {
            issued: requests.len(),
            ..ResolveSummary::default()
        };
        let mut in_flight: FuturesUnordered<_> = requests
            .into_iter()
            .map(|request| run_lookup(service, request))
            .collect();
        while let Some(outcome) = in_flight.next().await {
            summary.record(self.complete_lookup(outcome));
        }
        self.select_first_if_ready();
        summary
    }

    /// Mark the needed lookups pending and hand them to the caller, who runs
    /// them and feeds each outcome to [`Self::complete_lookup`]. Edits may
    /// land between completions.
    pub fn begin_resolve(&mut self) -> Vec<LookupRequest> {
        start_lookups(&mut self.store)
    }

    /// Merge one finished lookup; a failure is reported as an error notice.
    /// Selects the first live query once the last lookup succeeds.
    pub fn complete_lookup(&mut self, outcome: LookupOutcome) -> ExplorerResult<()> {
        let result = finish_lookup(&mut self.store, outcome);
        if let Err(err) = &result {
            self.report(err);
        }
        self.select_first_if_ready();
        result
    }

    pub fn select(&mut self, index: u32) {
        self.store.dispatch(Action::SelectQuery(index));
    }

    pub fn edit_selected(&mut self, edit: QueryEdit) {
        self.store.dispatch(Action::EditSelected(edit));
    }

    /// Append a blank custom query and select it. Returns its index.
    pub fn add_custom_query(&mut self) -> u32 {
        self.insert_custom_query(past_two_weeks())
    }

    /// [`Self::add_custom_query`] with the date window anchored on `today`.
    pub fn add_custom_query_on(&mut self, today: NaiveDate) -> u32 {
        self.insert_custom_query(trailing_window(today))
    }

    fn insert_custom_query(&mut self, window: DateRange) -> u32 {
        let state = self.state();
        let index = u32::try_from(state.queries.len())
            .ok()
            .filter(|len| state.query(*len).is_none())
            .unwrap_or_else(|| state.next_index());
        let query = QueryDescriptor {
            index,
            label: CUSTOM_QUERY_LABEL.to_string(),
            q: String::new(),
            color: default_color(usize::try_from(index).unwrap_or(usize::MAX)).to_string(),
            start_date: window.start,
            end_date: window.end,
            sources: Vec::new(),
            collections: self.config.default_collections(),
            description: Some(CUSTOM_QUERY_DESCRIPTION.to_string()),
            custom: true,
            deleted: false,
        };
        self.store.dispatch(Action::AddQuery(query));
        self.state().selected_index().unwrap_or(index)
    }

    pub fn delete_query(&mut self, index: u32) {
        self.store.dispatch(Action::DeleteQuery(index));
    }

    /// Stamp the search time and return the shareable path for the current
    /// queries.
    pub fn search(&mut self) -> ExplorerResult<String> {
        self.search_at(Utc::now())
    }

    /// [`Self::search`] with an explicit timestamp.
    pub fn search_at(&mut self, at: DateTime<Utc>) -> ExplorerResult<String> {
        if !self.state().queries.iter().any(QueryDescriptor::is_shareable) {
            return Err(ExplorerError::InvalidArgument(
                "no query with search text to share".to_string(),
            ));
        }
        self.store.dispatch(Action::MarkSearched(at));
        let path = encode_search_path(&self.state().queries);
        tracing::info!(%path, "search requested");
        Ok(path)
    }

    /// Drop all query state, as when the view is left.
    pub fn leave(&mut self) {
        self.store.dispatch(Action::Reset);
        self.last_path = None;
        self.last_handled_search = None;
    }

    /// Whether `path` is a shareable search route.
    #[must_use]
    pub fn is_search_path(path: &str) -> bool {
        path.trim_start_matches('#').starts_with(DEMO_SEARCH_PREFIX)
    }

    fn report(&mut self, err: &ExplorerError) {
        let notice = Notice::for_error(err);
        if err.is_recoverable() {
            tracing::warn!(error = %err, code = err.error_type(), "emitting error notice");
        } else {
            tracing::error!(error = %err, code = err.error_type(), "emitting error notice");
        }
        self.store.notify(notice);
    }

    fn select_first_if_ready(&mut self) -> bool {
        let state = self.state();
        if state.selected.is_some() || state.lookup_status() != LookupStatus::Succeeded {
            return false;
        }
        let Some(first) = state.live_queries().next().map(|q| q.index) else {
            return false;
        };
        self.store.dispatch(Action::SelectQuery(first));
        true
    }
}
