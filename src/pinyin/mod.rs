//! Pinyin romanization: syllable inventory, tones and tokenization.

// Module declarations
pub(crate) mod catalog;
pub(crate) mod syllable;
pub(crate) mod tokenize;
pub(crate) mod tone;

// Public re-exports (used via lib.rs)
pub use catalog::SyllableCatalog;
pub use syllable::PinyinSyllable;
pub use tokenize::Tokenizer;
pub use tone::{NEUTRAL_MARK, Tone, ToneTable};
