//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Every test gets its own SQLite file inside a fresh temporary directory,
//! seeded with [`SAMPLE_ENTRIES`]. Nothing is shared between tests, so they
//! can run in parallel and in any order.
//!
//! # Available Fixtures
//!
//! - `dictionary`: a seeded, isolated [`TestDictionary`]

use rstest::fixture;
use std::path::Path;
use tempfile::TempDir;
use zhdict::{DictionaryEntry, DictionaryStore, PinyinSyllable, QueryEngine, Tone};

/// `(simplified, pinyin, definitions)`; the traditional form is stored as the
/// simplified one.
pub const SAMPLE_ENTRIES: &[(&str, &str, &[&str])] = &[
    ("你好", "ni3 hao3", &["hello", "hi"]),
    ("好", "hao3", &["good", "well", "proper"]),
    ("好", "hao4", &["to be fond of"]),
    ("号", "hao4", &["ordinal number", "day of a month"]),
    ("好人", "hao3 ren2", &["good person"]),
    ("好好", "hao3 hao3", &["well", "carefully"]),
    ("汉", "han4", &["Han ethnic group", "Chinese"]),
    ("行", "hang2", &["row", "line", "profession"]),
    ("汉语", "han4 yu3", &["Chinese language"]),
    ("照", "zhao4", &["to shine", "to photograph"]),
    ("中国", "zhong1 guo2", &["China"]),
    ("广州", "guang3 zhou1", &["Guangzhou"]),
    ("善", "shan4", &["good", "virtuous"]),
    ("良好", "liang2 hao3", &["good", "favorable"]),
    ("好处", "hao3 chu5", &["benefit", "good points"]),
    ("美好", "mei3 hao3", &["beautiful", "fine", "good"]),
    ("好看", "hao3 kan4", &["good-looking", "nice"]),
    ("善良", "shan4 liang2", &["kind-hearted", "goodness"]),
    ("百分之百", "bai3 fen1 zhi1 bai3", &["100%", "absolutely"]),
    ("千", "qian1", &["thousand", "1000"]),
    ("女儿", "nü3 er2", &["daughter"]),
    ("第二", "di4 er4", &["second", "the second one"]),
    ("吗", "ma5", &["(question particle)"]),
    ("妈", "ma1", &["mother", "mom"]),
];

/// Parse the numbered pinyin used in [`SAMPLE_ENTRIES`].
pub fn syllables(numbered: &str) -> Vec<PinyinSyllable> {
    numbered
        .split_whitespace()
        .map(|token| {
            let (letters, digit) = token.split_at(token.len() - 1);
            let tone = digit
                .chars()
                .next()
                .and_then(Tone::from_digit)
                .unwrap_or_else(|| panic!("Missing tone digit in '{}'", token));
            PinyinSyllable::new(letters, tone)
        })
        .collect()
}

pub fn sample_entries() -> Vec<DictionaryEntry> {
    SAMPLE_ENTRIES
        .iter()
        .map(|(simplified, pinyin, definitions)| {
            DictionaryEntry::new(
                *simplified,
                *simplified,
                syllables(pinyin),
                definitions.iter().map(|d| d.to_string()).collect(),
            )
        })
        .collect()
}

/// A seeded dictionary in a temporary directory, removed on drop.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TestDictionary {
    _temp: TempDir,
    pub store: DictionaryStore,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TestDictionary {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let store = DictionaryStore::create(temp.path().join("cedict.db"))
            .expect("Failed to create dictionary store");
        store
            .insert_entries(&sample_entries())
            .expect("Failed to seed dictionary store");
        Self { _temp: temp, store }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn engine(&self) -> QueryEngine {
        QueryEngine::new(self.store.clone())
    }
}

impl Default for TestDictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[fixture]
pub fn dictionary() -> TestDictionary {
    zhdict::logging::init("debug");
    TestDictionary::new()
}

/// Simplified forms of `entries`, for order assertions.
#[allow(dead_code)]
pub fn simplified(entries: &[DictionaryEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.simplified.as_str()).collect()
}

/// `simplified + numbered pinyin`, for telling homographs apart.
#[allow(dead_code)]
pub fn labels(entries: &[DictionaryEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| {
            let pinyin: Vec<String> = e.pinyin.iter().map(ToString::to_string).collect();
            format!("{} {}", e.simplified, pinyin.join(" "))
        })
        .collect()
}
