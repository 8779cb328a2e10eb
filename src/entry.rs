//! Dictionary entries and their column encodings.
//!
//! The pinyin column stores `" " + letters + digit` per syllable plus one
//! trailing space (`" ni3 hao3 "`). The definitions column stores `"/"`
//! followed by `" " + definition + " /"` per definition (`"/ hello / hi /"`).
//! The padding is what the ranking queries match against, so both encodings
//! must stay bit-exact.

use crate::error::StoreError;
use crate::pinyin::{PinyinSyllable, Tone, ToneTable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub traditional: String,
    pub simplified: String,
    pub pinyin: Vec<PinyinSyllable>,
    pub definitions: Vec<String>,
}

impl DictionaryEntry {
    pub fn new(
        traditional: impl Into<String>,
        simplified: impl Into<String>,
        pinyin: Vec<PinyinSyllable>,
        definitions: Vec<String>,
    ) -> Self {
        Self {
            traditional: traditional.into(),
            simplified: simplified.into(),
            pinyin,
            definitions,
        }
    }

    /// Tone-marked reading, syllables separated by spaces (`nǐ hǎo`).
    pub fn display_pinyin(&self, tones: &ToneTable) -> String {
        self.pinyin
            .iter()
            .map(|syllable| tones.render(syllable))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Encode syllables for the pinyin column.
///
/// `Any` has no stored digit; it is written as `5` so that the column never
/// holds a LIKE wildcard.
pub fn format_pinyin(syllables: &[PinyinSyllable]) -> String {
    let mut out = String::with_capacity(syllables.len() * 6 + 1);
    for syllable in syllables {
        syllable.push_encoded(&mut out, '5');
    }
    out.push(' ');
    out
}

pub fn format_definitions(definitions: &[String]) -> String {
    let mut out = String::from("/");
    for definition in definitions {
        out.push(' ');
        out.push_str(definition.trim());
        out.push_str(" /");
    }
    out
}

/// Decode a stored pinyin column.
///
/// A syllable stored without a digit is read as neutral.
pub fn parse_pinyin_column(value: &str) -> Result<Vec<PinyinSyllable>, StoreError> {
    let corrupt = || StoreError::Corrupt {
        column: "pinyin",
        value: value.to_string(),
    };

    value
        .split_whitespace()
        .map(|token| -> Result<PinyinSyllable, StoreError> {
            let (letters, tone) = match token.char_indices().last() {
                Some((index, c)) if c.is_ascii_digit() => {
                    (&token[..index], Tone::from_digit(c).ok_or_else(corrupt)?)
                }
                _ => (token, Tone::Neutral),
            };
            if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_lowercase() || c == 'ü') {
                return Err(corrupt());
            }
            Ok(PinyinSyllable::new(letters, tone))
        })
        .collect()
}

/// Decode a stored definitions column.
pub fn parse_definitions_column(value: &str) -> Result<Vec<String>, StoreError> {
    let inner = value
        .strip_prefix('/')
        .and_then(|rest| if rest.is_empty() { Some(rest) } else { rest.strip_suffix('/') })
        .ok_or_else(|| StoreError::Corrupt {
            column: "definitions",
            value: value.to_string(),
        })?;

    Ok(inner
        .split(" /")
        .map(str::trim)
        .filter(|definition| !definition.is_empty())
        .map(str::to_string)
        .collect())
}
