//! Error types for tokenizing, storage and search.
//!
//! Each failure class keeps its own type so callers can tell a malformed query
//! apart from a broken store or a deliberately aborted search.

use std::path::PathBuf;
use thiserror::Error;

/// Why a Pinyin string could not be tokenized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("no syllables in input")]
    Empty,

    #[error("invalid character '{0}'")]
    InvalidCharacter(char),

    #[error("invalid tone digit '{0}' (expected 1-5)")]
    InvalidTone(char),

    #[error("tone digit '{0}' does not follow a syllable")]
    MisplacedTone(char),

    #[error("cannot split '{0}' into syllables")]
    Unparsable(String),

    #[error("conflicting tones on '{0}'")]
    ConflictingTones(String),
}

/// A Pinyin parse failure, carrying the input exactly as the caller passed it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pinyin '{input}': {kind}")]
pub struct PinyinParseError {
    pub input: String,
    pub kind: ParseErrorKind,
}

impl PinyinParseError {
    pub(crate) fn new(input: &str, kind: ParseErrorKind) -> Self {
        Self {
            input: input.to_string(),
            kind,
        }
    }
}

/// Error returned by the tone table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ToneError {
    /// Only the plain lower-case vowels `a e i o u ü` carry a tone mark.
    #[error("'{0}' is not a plain lower-case vowel")]
    InvalidVowel(char),
}

/// Failure inside the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("cannot prepare {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no dictionary table in {}", .0.display())]
    MissingSchema(PathBuf),

    #[error("malformed {column} column: {value:?}")]
    Corrupt { column: &'static str, value: String },
}

/// Anything that can go wrong between accepting a query and returning results.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Parse(#[from] PinyinParseError),

    #[error("invalid search request: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The search was aborted through its cancellation token.
    #[error("search cancelled")]
    Cancelled,

    /// The background task was dropped by the runtime before it produced a result.
    #[error("search task interrupted")]
    Interrupted,
}

impl SearchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<rusqlite::Error> for SearchError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Store(StoreError::Sqlite(error))
    }
}
