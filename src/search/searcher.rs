//! Search orchestration: mode classification, dispatch and result handles.
//!
//! Every search runs on the runtime's blocking pool with its own
//! [`CancellationToken`]. Parse and validation errors are reported by
//! [`Searcher::find`] itself, before anything is spawned.

use super::engine::{Lookup, QueryEngine};
use super::query::{SearchMode, SearchQuery, SearchResults};
use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::entry::DictionaryEntry;
use crate::error::{SearchError, StoreError};
use crate::pinyin::Tokenizer;
use crate::store::DictionaryStore;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};

type SearchTask = JoinHandle<Result<Vec<DictionaryEntry>, SearchError>>;

#[derive(Debug, Clone)]
pub struct Searcher {
    engine: Arc<QueryEngine>,
    tokenizer: Tokenizer,
    runtime: Handle,
    page_size: u32,
}

impl Searcher {
    pub fn new(engine: QueryEngine, tokenizer: Tokenizer, runtime: Handle, page_size: u32) -> Self {
        Self {
            engine: Arc::new(engine),
            tokenizer,
            runtime,
            page_size,
        }
    }

    /// Open the configured store and wire up a searcher around it.
    ///
    /// Also installs logging with the configured filter if nothing has yet.
    pub fn open(config: &Config, runtime: Handle) -> Result<Self, StoreError> {
        crate::logging::init(&config.log_filter);
        let store = DictionaryStore::open(&config.database)?;
        tracing::info!("Opened dictionary at {}", store.path().display());
        Ok(Self::new(
            QueryEngine::new(store),
            Tokenizer::default(),
            runtime,
            config.page_size,
        ))
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    /// Modes that apply to raw input.
    ///
    /// Blank text has none; anything outside the Latin script is Hanzi;
    /// Latin text is always searchable in definitions and additionally as
    /// Pinyin when it tokenizes.
    pub fn classify(&self, text: &str) -> BTreeSet<SearchMode> {
        let text = text.trim();
        if text.is_empty() {
            BTreeSet::new()
        } else if !text.chars().all(is_latin) {
            BTreeSet::from([SearchMode::Hanzi])
        } else if self.tokenizer.is_valid(text) {
            BTreeSet::from([SearchMode::Pinyin, SearchMode::Reverse])
        } else {
            BTreeSet::from([SearchMode::Reverse])
        }
    }

    /// First page of a search, at the configured page size.
    pub fn query(&self, mode: SearchMode, text: &str) -> Result<SearchQuery, SearchError> {
        SearchQuery::new(mode, text, i64::from(self.page_size), 0)
    }

    /// Start a search in the background.
    ///
    /// Pinyin text is tokenized here, so a malformed query fails immediately
    /// with [`SearchError::Parse`].
    pub fn find(&self, query: &SearchQuery) -> Result<SearchHandle, SearchError> {
        let limit = i64::from(query.page_size());
        let offset = i64::try_from(query.offset()?)
            .map_err(|_| SearchError::Validation("page offset out of range".to_string()))?;

        let lookup = match query.mode() {
            SearchMode::Hanzi => Lookup::Hanzi(query.text().trim().to_string()),
            SearchMode::Pinyin => Lookup::Pinyin(self.tokenizer.tokenize(query.text())?),
            SearchMode::Reverse => Lookup::Reverse(query.text().trim().to_string()),
        };
        tracing::debug!("Dispatching {:?} (limit {}, offset {})", lookup, limit, offset);

        let token = Arc::new(CancellationToken::new());
        let task = {
            let engine = Arc::clone(&self.engine);
            let token = Arc::clone(&token);
            self.runtime
                .spawn_blocking(move || engine.run(&lookup, limit, offset, Some(&*token)))
        };

        Ok(SearchHandle {
            task,
            token,
            page_size: query.page_size(),
        })
    }
}

/// Latin-script characters (Basic Latin through Latin Extended-B, plus
/// Latin Extended Additional).
fn is_latin(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}')
}

/// An in-flight search.
///
/// Dropping a handle whose search has not finished cancels the search.
#[derive(Debug)]
pub struct SearchHandle {
    task: SearchTask,
    token: Arc<CancellationToken>,
    page_size: u32,
}

impl SearchHandle {
    /// Abort the search. Waiting on it then yields [`SearchError::Cancelled`].
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The token bound to this search, for cancelling from another thread.
    pub fn cancellation_token(&self) -> Arc<CancellationToken> {
        Arc::clone(&self.token)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Block the current thread until the search completes.
    ///
    /// Must not be called from inside an async task; use
    /// [`results_async`](Self::results_async) there.
    pub fn results(mut self) -> Result<SearchResults, SearchError> {
        let joined = futures::executor::block_on(&mut self.task);
        settle(joined, self.page_size)
    }

    pub async fn results_async(mut self) -> Result<SearchResults, SearchError> {
        let joined = (&mut self.task).await;
        settle(joined, self.page_size)
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        if !self.task.is_finished() {
            tracing::debug!("Search handle dropped before completion");
            self.token.cancel();
        }
    }
}

fn settle(
    joined: Result<Result<Vec<DictionaryEntry>, SearchError>, JoinError>,
    page_size: u32,
) -> Result<SearchResults, SearchError> {
    match joined {
        Ok(entries) => Ok(SearchResults {
            entries: entries?,
            page_size,
        }),
        // Surface the task's panic on the waiting thread.
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            tracing::warn!("Search task did not complete: {}", e);
            Err(SearchError::Interrupted)
        }
    }
}
