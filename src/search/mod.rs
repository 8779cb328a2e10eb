//! Ranked dictionary search.
//!
//! This module provides the three search modes (Hanzi, Pinyin and English
//! definitions), their ranking SQL, and the background orchestration around
//! them.

// Module declarations
pub(crate) mod engine;
pub(crate) mod query;
pub(crate) mod ranking;
pub(crate) mod searcher;

// Public re-exports (used via lib.rs)
pub use engine::{Lookup, QueryEngine};
pub use query::{SearchMode, SearchQuery, SearchResults};
pub use searcher::{SearchHandle, Searcher};
