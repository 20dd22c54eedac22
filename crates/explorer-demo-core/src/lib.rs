//! Core types and URL handling for the Explorer demo
//!
//! This crate provides:
//! - Query descriptor models with resolvable source/collection references
//! - Shareable URL route parsing and encoding
//! - Normalization of URL query arrays into fully defaulted descriptors
//! - Configuration, notices, the sample-search catalog, and display statistics

#![forbid(unsafe_code)]

pub mod config;
pub mod dates;
pub mod error;
pub mod models;
pub mod normalize;
pub mod notice;
pub mod palette;
pub mod samples;
pub mod stats;
pub mod url;

// Re-export key types for convenience
pub use config::{Config, DEFAULT_COLLECTION_ID, DEFAULT_COLLECTION_LABEL, builtin_default_collections};
pub use dates::{DateRange, TRAILING_WINDOW_DAYS, past_two_weeks, trailing_window};
pub use error::{Error as ExplorerError, Result as ExplorerResult};
pub use models::{
    Collection, MediaSource, QueryDescriptor, Reference, ReferenceId, ReferenceKind, Referent,
};
pub use normalize::{NormalizeDefaults, next_free_index, normalize_queries, parse_url_queries};
pub use notice::{Notice, NoticeLevel, NoticeSink};
pub use palette::{MAX_COLORS, PALETTE, default_color};
pub use samples::{SampleCatalog, SampleSearch};
pub use url::{DemoRoute, encode_search_path, parse_demo_route};
