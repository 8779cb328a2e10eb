//! Tones, tone diacritics and the vowel-placement rule.

use super::syllable::PinyinSyllable;
use crate::error::ToneError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Glyph prefixed to neutral-tone syllables when displayed.
pub const NEUTRAL_MARK: char = '·';

/// Plain vowels that accept a tone mark.
const VOWELS: [char; 6] = ['a', 'e', 'i', 'o', 'u', 'ü'];

/// Marked forms of [`VOWELS`], one row per tone (first..fourth).
const MARKED: [[char; 6]; 4] = [
    ['ā', 'ē', 'ī', 'ō', 'ū', 'ǖ'],
    ['á', 'é', 'í', 'ó', 'ú', 'ǘ'],
    ['ǎ', 'ě', 'ǐ', 'ǒ', 'ǔ', 'ǚ'],
    ['à', 'è', 'ì', 'ò', 'ù', 'ǜ'],
];

/// Tone of a syllable.
///
/// `Any` means the tone was not specified (search input only); `Neutral` is
/// the explicit fifth tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    First,
    Second,
    Third,
    Fourth,
    Neutral,
    Any,
}

impl Tone {
    /// Tones that carry a diacritic, in digit order.
    pub const MARKED: [Self; 4] = [Self::First, Self::Second, Self::Third, Self::Fourth];

    /// Parse a tone digit (`'1'..='5'`).
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(Self::First),
            '2' => Some(Self::Second),
            '3' => Some(Self::Third),
            '4' => Some(Self::Fourth),
            '5' => Some(Self::Neutral),
            _ => None,
        }
    }

    /// Storage digit; `Any` has none.
    pub fn digit(self) -> Option<char> {
        match self {
            Self::First => Some('1'),
            Self::Second => Some('2'),
            Self::Third => Some('3'),
            Self::Fourth => Some('4'),
            Self::Neutral => Some('5'),
            Self::Any => None,
        }
    }

    fn mark_row(self) -> Option<usize> {
        match self {
            Self::First => Some(0),
            Self::Second => Some(1),
            Self::Third => Some(2),
            Self::Fourth => Some(3),
            Self::Neutral | Self::Any => None,
        }
    }
}

/// Precomputed diacritic lookups, in both directions.
#[derive(Debug, Clone)]
pub struct ToneTable {
    marks: AHashMap<(Tone, char), char>,
    plain: AHashMap<char, (char, Tone)>,
}

impl Default for ToneTable {
    fn default() -> Self {
        let mut marks = AHashMap::with_capacity(VOWELS.len() * MARKED.len());
        let mut plain = AHashMap::with_capacity(VOWELS.len() * MARKED.len());

        for tone in Tone::MARKED {
            let Some(row) = tone.mark_row() else { continue };
            for (vowel, marked) in VOWELS.iter().zip(MARKED[row]) {
                marks.insert((tone, *vowel), marked);
                plain.insert(marked, (*vowel, tone));
            }
        }

        Self { marks, plain }
    }
}

impl ToneTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diacritic form of a plain vowel.
    ///
    /// `Neutral` and `Any` carry no mark, so the (validated) vowel comes back
    /// unchanged.
    pub fn diacritic(&self, tone: Tone, vowel: char) -> Result<char, ToneError> {
        if !VOWELS.contains(&vowel) {
            return Err(ToneError::InvalidVowel(vowel));
        }
        Ok(self.marks.get(&(tone, vowel)).copied().unwrap_or(vowel))
    }

    /// Split a tone-marked vowel into its plain vowel and tone.
    pub fn strip_mark(&self, marked: char) -> Option<(char, Tone)> {
        self.plain.get(&marked).copied()
    }

    /// Display form of a syllable: `ma`/First → `mā`, `ma`/Neutral → `·ma`.
    pub fn render(&self, syllable: &PinyinSyllable) -> String {
        match syllable.tone {
            Tone::Any => syllable.letters.clone(),
            Tone::Neutral => format!("{}{}", NEUTRAL_MARK, syllable.letters),
            tone => {
                let Some(position) = mark_position(&syllable.letters) else {
                    return syllable.letters.clone();
                };
                syllable
                    .letters
                    .chars()
                    .enumerate()
                    .map(|(i, c)| {
                        if i == position {
                            self.diacritic(tone, c).unwrap_or(c)
                        } else {
                            c
                        }
                    })
                    .collect()
            }
        }
    }
}

/// Character index of the vowel that takes the tone mark.
///
/// `a` wins, then `e`, then the `o` of `ou`, otherwise the last of `i o u ü`.
fn mark_position(letters: &str) -> Option<usize> {
    let chars: Vec<char> = letters.chars().collect();

    if let Some(i) = chars.iter().position(|&c| c == 'a') {
        return Some(i);
    }
    if let Some(i) = chars.iter().position(|&c| c == 'e') {
        return Some(i);
    }
    if let Some(i) = chars.windows(2).position(|w| w[0] == 'o' && w[1] == 'u') {
        return Some(i);
    }
    chars
        .iter()
        .rposition(|c| matches!(c, 'i' | 'o' | 'u' | 'ü'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn render(letters: &str, tone: Tone) -> String {
        ToneTable::new().render(&PinyinSyllable::new(letters, tone))
    }

    #[rstest]
    #[case("ma", Tone::First, "mā")]
    #[case("lü", Tone::Third, "lǚ")]
    #[case("ma", Tone::Neutral, "·ma")]
    #[case("ma", Tone::Any, "ma")]
    #[case("hao", Tone::Third, "hǎo")]
    #[case("xue", Tone::Second, "xué")]
    #[case("gou", Tone::Third, "gǒu")]
    #[case("liu", Tone::Second, "liú")]
    #[case("gui", Tone::Fourth, "guì")]
    #[case("nüe", Tone::Fourth, "nüè")]
    #[case("ng", Tone::Second, "ng")]
    fn test_render(#[case] letters: &str, #[case] tone: Tone, #[case] expected: &str) {
        check!(render(letters, tone) == expected);
    }

    #[rstest]
    #[case('A')]
    #[case('ā')]
    #[case('n')]
    #[case('Ü')]
    fn test_diacritic_rejects_non_vowels(#[case] input: char) {
        let table = ToneTable::new();
        check!(table.diacritic(Tone::First, input) == Err(ToneError::InvalidVowel(input)));
    }

    #[test]
    fn test_diacritic_unmarked_tones_keep_vowel() {
        let table = ToneTable::new();
        check!(table.diacritic(Tone::Neutral, 'a') == Ok('a'));
        check!(table.diacritic(Tone::Any, 'ü') == Ok('ü'));
    }

    #[test]
    fn test_strip_mark_inverts_diacritic() {
        let table = ToneTable::new();
        for tone in Tone::MARKED {
            for vowel in VOWELS {
                let marked = table.diacritic(tone, vowel).unwrap();
                check!(table.strip_mark(marked) == Some((vowel, tone)));
            }
        }
        check!(table.strip_mark('a').is_none());
    }

    #[test]
    fn test_digit_round_trip() {
        for digit in ['1', '2', '3', '4', '5'] {
            check!(Tone::from_digit(digit).and_then(Tone::digit) == Some(digit));
        }
        check!(Tone::from_digit('6').is_none());
        check!(Tone::Any.digit().is_none());
    }
}
