//! Search requests and result pages.

use crate::entry::DictionaryEntry;
use crate::error::SearchError;
use serde::{Deserialize, Serialize};

/// Which column a search runs against.
///
/// Ordered so that sets of modes iterate Hanzi, Pinyin, Reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Hanzi,
    Pinyin,
    /// English definitions.
    Reverse,
}

/// One page of one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    mode: SearchMode,
    text: String,
    page_size: u32,
    page_index: u32,
}

impl SearchQuery {
    /// Build a query, validating the page bounds and text.
    ///
    /// Page numbers arrive signed from the outside world; negative values (or
    /// values beyond `u32::MAX`) are rejected rather than clamped.
    pub fn new(
        mode: SearchMode,
        text: impl Into<String>,
        page_size: i64,
        page_index: i64,
    ) -> Result<Self, SearchError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SearchError::Validation("query text is blank".to_string()));
        }
        Ok(Self {
            mode,
            text,
            page_size: non_negative("page size", page_size)?,
            page_index: non_negative("page index", page_index)?,
        })
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    /// Row offset of this page: `page_size * page_index`.
    pub fn offset(&self) -> Result<u64, SearchError> {
        u64::from(self.page_size)
            .checked_mul(u64::from(self.page_index))
            .ok_or_else(|| SearchError::Validation("page offset overflows".to_string()))
    }

    /// The same search, one page further.
    pub fn next_page(&self) -> Result<Self, SearchError> {
        let page_index = self
            .page_index
            .checked_add(1)
            .ok_or_else(|| SearchError::Validation("page index overflows".to_string()))?;
        Ok(Self {
            page_index,
            ..self.clone()
        })
    }
}

fn non_negative(name: &str, value: i64) -> Result<u32, SearchError> {
    u32::try_from(value)
        .map_err(|_| SearchError::Validation(format!("{name} must be between 0 and {}, got {value}", u32::MAX)))
}

/// A page of ranked entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub entries: Vec<DictionaryEntry>,
    pub page_size: u32,
}

impl SearchResults {
    /// True when the page came back short, so no further page exists.
    pub fn is_last_page(&self) -> bool {
        self.entries.len() < self.page_size as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    #[rstest]
    #[case(-1, 0)]
    #[case(0, -1)]
    #[case(i64::MIN, 0)]
    #[case(i64::from(u32::MAX) + 1, 0)]
    fn test_rejects_out_of_range_pages(#[case] page_size: i64, #[case] page_index: i64) {
        let_assert!(
            Err(SearchError::Validation(_)) =
                SearchQuery::new(SearchMode::Hanzi, "好", page_size, page_index)
        );
    }

    #[test]
    fn test_rejects_blank_text() {
        let_assert!(Err(SearchError::Validation(_)) = SearchQuery::new(SearchMode::Reverse, "  ", 10, 0));
    }

    #[test]
    fn test_offset_and_next_page() {
        let query = SearchQuery::new(SearchMode::Pinyin, "hao", 25, 2).unwrap();
        check!(query.offset().unwrap() == 50);

        let next = query.next_page().unwrap();
        check!(next.page_index() == 3);
        check!(next.page_size() == 25);
        check!(next.text() == "hao");
        check!(next.mode() == SearchMode::Pinyin);
    }

    #[test]
    fn test_zero_page_size_is_allowed() {
        let query = SearchQuery::new(SearchMode::Hanzi, "好", 0, 7).unwrap();
        check!(query.offset().unwrap() == 0);
    }

    #[test]
    fn test_next_page_overflow() {
        let query = SearchQuery::new(SearchMode::Hanzi, "好", 1, i64::from(u32::MAX)).unwrap();
        let_assert!(Err(SearchError::Validation(_)) = query.next_page());
    }

    #[rstest]
    #[case(0, 1, true)]
    #[case(2, 3, true)]
    #[case(3, 3, false)]
    #[case(0, 0, false)]
    fn test_is_last_page(#[case] count: usize, #[case] page_size: u32, #[case] expected: bool) {
        let results = SearchResults {
            entries: vec![
                crate::entry::DictionaryEntry::new("好", "好", Vec::new(), Vec::new());
                count
            ],
            page_size,
        };
        check!(results.is_last_page() == expected);
    }

    #[test]
    fn test_modes_are_ordered() {
        check!(SearchMode::Hanzi < SearchMode::Pinyin);
        check!(SearchMode::Pinyin < SearchMode::Reverse);
    }
}
