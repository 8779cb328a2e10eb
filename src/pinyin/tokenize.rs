//! Pinyin tokenization: raw romanized text to a sequence of syllables.
//!
//! Input is lexed into *runs* (maximal letter sequences between whitespace,
//! apostrophes and tone digits), and each run is split into syllables by a
//! dynamic program over every legal segmentation. The cost of a segmentation
//! is compared lexicographically:
//!
//! 1. number of syllables (`xian` is one syllable, not `xi` + `an`);
//! 2. number of non-initial vowelless syllables (erhua `r` and the
//!    interjections `m`, `n`, `ng`, `hm`, `hng`), so a following `er` keeps
//!    its `e` (`dier` is `di` + `er`, not `die` + `r`);
//! 3. number of non-initial syllables starting with `a`, `e` or `o`, which
//!    standard orthography would have separated with an apostrophe
//!    (`faneng` is `fa` + `neng`, not `fan` + `eng`);
//! 4. on a full tie, the longer syllable comes first.
//!
//! Only the last run of the input may end in a partial syllable (`guangzh`),
//! and only when it has no segmentation into full syllables.

use super::catalog::SyllableCatalog;
use super::syllable::PinyinSyllable;
use super::tone::{Tone, ToneTable};
use crate::error::{ParseErrorKind, PinyinParseError};
use std::sync::Arc;

/// Syllables whose initial vowel calls for an apostrophe mid-word.
const APOSTROPHE_VOWELS: [char; 3] = ['a', 'e', 'o'];

/// Syllables without a vowel; mid-word they only ever close a word.
const BARE_SYLLABLES: [&str; 6] = ["r", "m", "n", "ng", "hm", "hng"];

/// A letter run awaiting segmentation.
#[derive(Debug, Default)]
struct Run {
    letters: Vec<char>,
    /// Tone carried by a diacritic on the letter at the same index.
    marks: Vec<Option<Tone>>,
    /// Tone digit that closed the run.
    digit: Option<Tone>,
}

impl Run {
    fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    fn text(&self) -> String {
        self.letters.iter().collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
struct Cost {
    syllables: usize,
    bare_syllables: usize,
    apostrophe_starts: usize,
}

/// Best choice for the suffix of a run starting at some index.
#[derive(Debug, Clone, Copy)]
struct Step {
    cost: Cost,
    end: usize,
    partial: bool,
}

/// Splits Pinyin text into syllables.
///
/// Cheap to clone; the catalog and tone table are shared.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    catalog: Arc<SyllableCatalog>,
    tones: Arc<ToneTable>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(Arc::new(SyllableCatalog::new()), Arc::new(ToneTable::new()))
    }
}

impl Tokenizer {
    pub fn new(catalog: Arc<SyllableCatalog>, tones: Arc<ToneTable>) -> Self {
        Self { catalog, tones }
    }

    pub fn catalog(&self) -> &Arc<SyllableCatalog> {
        &self.catalog
    }

    /// True if `text` tokenizes without error.
    pub fn is_valid(&self, text: &str) -> bool {
        self.tokenize(text).is_ok()
    }

    /// Tokenize `text` into syllables, in input order.
    ///
    /// Case-insensitive; `v` and `u:` are read as `ü`. Tone digits `1`-`5`
    /// bind to the preceding syllable, tone-marked vowels to the syllable that
    /// contains them, and everything else defaults to [`Tone::Any`].
    pub fn tokenize(&self, text: &str) -> Result<Vec<PinyinSyllable>, PinyinParseError> {
        let fail = |kind| PinyinParseError::new(text, kind);

        let normalized = normalize(text);
        let runs = self.lex(&normalized).map_err(fail)?;
        if runs.is_empty() {
            return Err(fail(ParseErrorKind::Empty));
        }

        let last = runs.len() - 1;
        let mut syllables = Vec::new();
        for (index, run) in runs.iter().enumerate() {
            let may_end_partial = index == last && run.digit.is_none();
            let spans = self
                .segment(&run.letters, false)
                .or_else(|| {
                    may_end_partial
                        .then(|| self.segment(&run.letters, true))
                        .flatten()
                })
                .ok_or_else(|| fail(ParseErrorKind::Unparsable(run.text())))?;

            let count = spans.len();
            for (i, (start, end, partial)) in spans.into_iter().enumerate() {
                let letters: String = run.letters[start..end].iter().collect();
                let digit = if i + 1 == count { run.digit } else { None };
                let tone = resolve_tone(&run.marks[start..end], digit)
                    .ok_or_else(|| fail(ParseErrorKind::ConflictingTones(letters.clone())))?;
                if partial && tone != Tone::Any {
                    return Err(fail(ParseErrorKind::Unparsable(letters)));
                }
                syllables.push(PinyinSyllable::new(letters, tone));
            }
        }

        tracing::trace!("Tokenized '{}' into {} syllables", text, syllables.len());
        Ok(syllables)
    }

    /// Split normalized input into letter runs.
    fn lex(&self, input: &str) -> Result<Vec<Run>, ParseErrorKind> {
        let mut runs = Vec::new();
        let mut current = Run::default();

        for c in input.chars() {
            if c.is_whitespace() || c == '\'' {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            } else if c.is_ascii_digit() {
                if current.is_empty() {
                    return Err(ParseErrorKind::MisplacedTone(c));
                }
                let tone = Tone::from_digit(c).ok_or(ParseErrorKind::InvalidTone(c))?;
                current.digit = Some(tone);
                runs.push(std::mem::take(&mut current));
            } else if c.is_ascii_lowercase() || c == 'ü' {
                current.letters.push(c);
                current.marks.push(None);
            } else if let Some((vowel, tone)) = self.tones.strip_mark(c) {
                current.letters.push(vowel);
                current.marks.push(Some(tone));
            } else {
                return Err(ParseErrorKind::InvalidCharacter(c));
            }
        }

        if !current.is_empty() {
            runs.push(current);
        }
        Ok(runs)
    }

    /// Cheapest segmentation of a run as `(start, end, partial)` spans.
    ///
    /// With `allow_partial`, the span reaching the end of the run may be a
    /// partial syllable.
    fn segment(&self, letters: &[char], allow_partial: bool) -> Option<Vec<(usize, usize, bool)>> {
        let n = letters.len();
        let max_len = self.catalog.max_syllable_len();
        let mut steps: Vec<Option<Step>> = vec![None; n + 1];

        for start in (0..n).rev() {
            let mut chosen: Option<Step> = None;
            let mut candidate = String::new();

            for end in start + 1..=n.min(start + max_len) {
                candidate.push(letters[end - 1]);
                if !self.catalog.has_syllable_with_prefix(&candidate) {
                    break;
                }

                let partial = if self.catalog.is_full_syllable(&candidate) {
                    false
                } else if allow_partial && end == n && self.catalog.is_partial_syllable(&candidate) {
                    true
                } else {
                    continue;
                };

                let rest = if end == n {
                    Cost::default()
                } else {
                    match steps[end] {
                        Some(step) => step.cost,
                        None => continue,
                    }
                };

                let starts_with_vowel = candidate
                    .chars()
                    .next()
                    .is_some_and(|c| APOSTROPHE_VOWELS.contains(&c));
                let is_bare = BARE_SYLLABLES.contains(&candidate.as_str());
                let cost = Cost {
                    syllables: rest.syllables + 1,
                    bare_syllables: rest.bare_syllables + usize::from(start > 0 && is_bare),
                    apostrophe_starts: rest.apostrophe_starts
                        + usize::from(start > 0 && starts_with_vowel),
                };

                // `<=` so a later (longer) candidate wins a tie.
                if chosen.is_none_or(|c| cost <= c.cost) {
                    chosen = Some(Step { cost, end, partial });
                }
            }

            steps[start] = chosen;
        }

        let mut spans = Vec::new();
        let mut start = 0;
        while start < n {
            let step = steps[start]?;
            spans.push((start, step.end, step.partial));
            start = step.end;
        }
        Some(spans)
    }
}

/// Lower-case, trim, and fold the `v` / `u:` spellings of `ü`.
fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .replace("u:", "ü")
        .replace('v', "ü")
}

/// Combine diacritic tones and a trailing digit; `None` on a conflict.
fn resolve_tone(marks: &[Option<Tone>], digit: Option<Tone>) -> Option<Tone> {
    let mut tone: Option<Tone> = digit;
    for mark in marks.iter().flatten() {
        match tone {
            Some(existing) if existing != *mark => return None,
            _ => tone = Some(*mark),
        }
    }
    Some(tone.unwrap_or(Tone::Any))
}
