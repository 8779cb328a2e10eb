pub mod cancel;
pub mod config;
pub mod entry;
pub mod error;
pub mod logging;
pub mod pinyin;
pub mod search;
pub mod store;

pub use cancel::CancellationToken;
pub use config::Config;
pub use entry::DictionaryEntry;
pub use error::{ParseErrorKind, PinyinParseError, SearchError, StoreError, ToneError};
pub use pinyin::{PinyinSyllable, SyllableCatalog, Tokenizer, Tone, ToneTable};
pub use search::{Lookup, QueryEngine, SearchHandle, SearchMode, SearchQuery, SearchResults, Searcher};
pub use store::DictionaryStore;
