//! State container with observer subscriptions.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use explorer_demo_core::{Notice, NoticeSink};

use crate::action::Action;
use crate::reducer::reduce;
use crate::state::AppState;

/// Holds the current [`AppState`] and publishes every new snapshot.
///
/// Subscribers receive `Arc<AppState>` values over an mpsc channel; a
/// dropped receiver is pruned on the next publish.
#[derive(Debug)]
pub struct Store {
    state: Arc<AppState>,
    subscribers: Vec<Sender<Arc<AppState>>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl Store {
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
            subscribers: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Shared handle to the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Run `action` through the reducer. Subscribers are told only when the
    /// state actually changed.
    pub fn dispatch(&mut self, action: Action) {
        let next = reduce(&self.state, action);
        if next == *self.state {
            return;
        }
        self.state = Arc::new(next);
        self.publish();
    }

    /// Receive every state published from now on.
    pub fn subscribe(&mut self) -> Receiver<Arc<AppState>> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn publish(&mut self) {
        let snapshot = &self.state;
        self.subscribers
            .retain(|tx| tx.send(Arc::clone(snapshot)).is_ok());
    }
}

impl NoticeSink for Store {
    fn notify(&mut self, notice: Notice) {
        self.dispatch(Action::AddNotice(notice));
    }
}
