//! Application state and reference resolution for the Explorer demo
//!
//! This crate provides:
//! - An immutable [`AppState`] driven by a pure [`reduce`] function
//! - A [`Store`] that publishes every new state to channel subscribers
//! - The lookup service seam and the concurrent reference resolution pass
//! - [`DemoSession`], which turns route changes and user intents into actions

#![forbid(unsafe_code)]

pub mod action;
pub mod dispatch;
pub mod lookup;
pub mod reducer;
pub mod session;
pub mod state;
pub mod store;

pub use action::{Action, QueryEdit, Resolution};
pub use dispatch::{
    LookupOutcome, ResolveSummary, finish_lookup, plan_lookups, run_lookup, start_lookups,
};
pub use lookup::{LookupDirectory, LookupRequest, LookupService, StaticLookupService};
pub use reducer::reduce;
pub use session::{DemoSession, NavigateOutcome};
pub use state::{AppState, LookupKey, LookupStatus};
pub use store::Store;
