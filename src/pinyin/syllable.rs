use super::tone::Tone;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One Pinyin syllable: lower-case letters plus a tone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinyinSyllable {
    pub letters: String,
    pub tone: Tone,
}

impl PinyinSyllable {
    pub fn new(letters: impl Into<String>, tone: Tone) -> Self {
        Self {
            letters: letters.into(),
            tone,
        }
    }

    /// Storage fragment: `" " + letters + digit`, with `wildcard` standing in
    /// for the digit of an `Any` syllable.
    pub(crate) fn push_encoded(&self, out: &mut String, wildcard: char) {
        out.push(' ');
        out.push_str(&self.letters);
        out.push(self.tone.digit().unwrap_or(wildcard));
    }
}

/// Numbered form (`ni3`), `Any` prints bare letters.
impl fmt::Display for PinyinSyllable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters)?;
        if let Some(digit) = self.tone.digit() {
            write!(f, "{}", digit)?;
        }
        Ok(())
    }
}
