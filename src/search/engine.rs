//! Query execution against the dictionary store.

use super::ranking::{self, RankedQuery};
use crate::cancel::CancellationToken;
use crate::entry::DictionaryEntry;
use crate::error::SearchError;
use crate::pinyin::PinyinSyllable;
use crate::store::DictionaryStore;
use rusqlite::ToSql;
use std::time::Instant;

/// A prepared search input, tagged by mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Hanzi(String),
    Pinyin(Vec<PinyinSyllable>),
    Reverse(String),
}

/// Runs ranked searches on a [`DictionaryStore`].
#[derive(Debug, Clone)]
pub struct QueryEngine {
    store: DictionaryStore,
}

impl QueryEngine {
    pub fn new(store: DictionaryStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DictionaryStore {
        &self.store
    }

    pub fn search_pinyin(
        &self,
        syllables: &[PinyinSyllable],
        limit: i64,
        offset: i64,
        token: Option<&CancellationToken>,
    ) -> Result<Vec<DictionaryEntry>, SearchError> {
        if syllables.is_empty() {
            return Err(SearchError::Validation("no syllables to search for".to_string()));
        }
        self.execute(ranking::pinyin(syllables), limit, offset, token)
    }

    pub fn search_hanzi(
        &self,
        text: &str,
        limit: i64,
        offset: i64,
        token: Option<&CancellationToken>,
    ) -> Result<Vec<DictionaryEntry>, SearchError> {
        self.execute(ranking::hanzi(non_blank(text)?), limit, offset, token)
    }

    pub fn search_reverse(
        &self,
        text: &str,
        limit: i64,
        offset: i64,
        token: Option<&CancellationToken>,
    ) -> Result<Vec<DictionaryEntry>, SearchError> {
        self.execute(ranking::reverse(non_blank(text)?), limit, offset, token)
    }

    /// Dispatch on the lookup's mode.
    pub fn run(
        &self,
        lookup: &Lookup,
        limit: i64,
        offset: i64,
        token: Option<&CancellationToken>,
    ) -> Result<Vec<DictionaryEntry>, SearchError> {
        match lookup {
            Lookup::Hanzi(text) => self.search_hanzi(text, limit, offset, token),
            Lookup::Pinyin(syllables) => self.search_pinyin(syllables, limit, offset, token),
            Lookup::Reverse(text) => self.search_reverse(text, limit, offset, token),
        }
    }

    fn execute(
        &self,
        query: RankedQuery,
        limit: i64,
        offset: i64,
        token: Option<&CancellationToken>,
    ) -> Result<Vec<DictionaryEntry>, SearchError> {
        if limit < 0 || offset < 0 {
            return Err(SearchError::Validation(format!(
                "limit and offset must be non-negative, got {limit} and {offset}"
            )));
        }

        let start = Instant::now();
        let mut params: Vec<&dyn ToSql> = query
            .patterns
            .iter()
            .map(|pattern| pattern as &dyn ToSql)
            .collect();
        params.push(&limit);
        params.push(&offset);

        let entries = self.store.query_entries(&query.sql, &params, token)?;
        tracing::debug!(
            "Query {:?} (limit {}, offset {}) returned {} entries in {:?}",
            query.patterns.first(),
            limit,
            offset,
            entries.len(),
            start.elapsed()
        );
        Ok(entries)
    }
}

fn non_blank(text: &str) -> Result<&str, SearchError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SearchError::Validation("query text is blank".to_string()));
    }
    Ok(text)
}
