//! Ranked SQL for each search mode.
//!
//! Every query filters with `LIKE`, orders by a mode-specific match tier, and
//! breaks ties by `length(simplified)`, then the stored pinyin, then row id so
//! that pages never overlap. `LIMIT` and `OFFSET` are always the last two
//! parameters.

use crate::pinyin::PinyinSyllable;
use crate::store::ENTRY_COLUMNS;

/// LIKE wildcard standing in for the tone digit of a toneless syllable.
const TONE_WILDCARD: char = '_';

const TIEBREAK: &str = "length(simplified), pinyin, id";

/// SQL text plus the string parameters it binds before `LIMIT`/`OFFSET`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RankedQuery {
    pub(crate) sql: String,
    pub(crate) patterns: Vec<String>,
}

/// Pinyin lookup: the column encoding with `_` for unknown tones and no
/// trailing space, so `" han_"` matches `" han4 "` and `" hang2 "` alike.
pub(crate) fn pinyin_lookup(syllables: &[PinyinSyllable]) -> String {
    let mut lookup = String::new();
    for syllable in syllables {
        syllable.push_encoded(&mut lookup, TONE_WILDCARD);
    }
    lookup
}

/// Stored pinyin starts with the lookup; a lookup followed by a space (the
/// whole syllable sequence, not a longer syllable) ranks first.
pub(crate) fn pinyin(syllables: &[PinyinSyllable]) -> RankedQuery {
    RankedQuery {
        sql: format!(
            "SELECT {ENTRY_COLUMNS} FROM entries
             WHERE pinyin LIKE ?1 || '%'
             ORDER BY CASE WHEN pinyin LIKE ?1 || ' %' THEN 0 ELSE 1 END, {TIEBREAK}
             LIMIT ?2 OFFSET ?3"
        ),
        patterns: vec![pinyin_lookup(syllables)],
    }
}

/// Simplified form contains the text; prefix matches first.
pub(crate) fn hanzi(text: &str) -> RankedQuery {
    RankedQuery {
        sql: format!(
            r"SELECT {ENTRY_COLUMNS} FROM entries
              WHERE simplified LIKE '%' || ?1 || '%' ESCAPE '\'
              ORDER BY CASE WHEN simplified LIKE ?1 || '%' ESCAPE '\' THEN 0 ELSE 1 END, {TIEBREAK}
              LIMIT ?2 OFFSET ?3"
        ),
        patterns: vec![escape_like(text)],
    }
}

/// Definitions contain the text, ranked:
/// 0. the whole first definition,
/// 1. a whole later definition,
/// 2. a whole word inside a definition,
/// 3. any substring.
pub(crate) fn reverse(text: &str) -> RankedQuery {
    RankedQuery {
        sql: format!(
            r"SELECT {ENTRY_COLUMNS} FROM entries
              WHERE definitions LIKE '%' || ?1 || '%' ESCAPE '\'
              ORDER BY CASE
                  WHEN definitions LIKE '/ ' || ?1 || ' /%' ESCAPE '\' THEN 0
                  WHEN definitions LIKE '%/ ' || ?1 || ' /%' ESCAPE '\' THEN 1
                  WHEN definitions REGEXP ?2 THEN 2
                  ELSE 3
              END, {TIEBREAK}
              LIMIT ?3 OFFSET ?4"
        ),
        patterns: vec![escape_like(text), whole_word_pattern(text)],
    }
}

/// Escape `%`, `_` and the escape character itself for `LIKE ... ESCAPE '\'`.
pub(crate) fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn whole_word_pattern(text: &str) -> String {
    format!(r"(?i)(?:^|\W){}(?:$|\W)", regex::escape(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pinyin::Tone;
    use assert2::check;
    use regex::Regex;
    use rstest::rstest;

    #[test]
    fn test_pinyin_lookup_wildcards_unknown_tones() {
        let syllables = [
            PinyinSyllable::new("ni", Tone::Third),
            PinyinSyllable::new("hao", Tone::Any),
        ];
        check!(pinyin_lookup(&syllables) == " ni3 hao_");
    }

    #[rstest]
    #[case("100%", r"100\%")]
    #[case("snake_case", r"snake\_case")]
    #[case(r"a\b", r"a\\b")]
    #[case("你好", "你好")]
    fn test_escape_like(#[case] input: &str, #[case] expected: &str) {
        check!(escape_like(input) == expected);
    }

    #[rstest]
    #[case("/ to be good / well /", true)]
    #[case("/ GOOD-natured /", true)]
    #[case("/ goodness /", false)]
    fn test_whole_word_pattern(#[case] definitions: &str, #[case] expected: bool) {
        let pattern = Regex::new(&whole_word_pattern("good")).unwrap();
        check!(pattern.is_match(definitions) == expected);
    }

    #[test]
    fn test_whole_word_pattern_escapes_metacharacters() {
        let pattern = Regex::new(&whole_word_pattern("c++")).unwrap();
        check!(pattern.is_match("/ the c++ language /"));
        check!(!pattern.is_match("/ ccc /"));
    }

    #[test]
    fn test_limit_and_offset_come_last() {
        check!(pinyin(&[]).sql.contains("LIMIT ?2 OFFSET ?3"));
        check!(hanzi("好").sql.contains("LIMIT ?2 OFFSET ?3"));
        let reverse = reverse("good");
        check!(reverse.patterns.len() == 2);
        check!(reverse.sql.contains("LIMIT ?3 OFFSET ?4"));
    }
}
