use serde::{Deserialize, Serialize};

use super::document::Document;

/// How query tokens combine into a candidate set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    And,
    Or,
}

/// Search parameters
#[derive(Clone, Debug)]
pub struct SearchOptions {
    pub mode: SearchMode,
    pub use_ranking: bool,
    pub limit: usize,
    pub offset: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            mode: SearchMode::And,
            use_ranking: true,
            limit: 10,
            offset: 0,
        }
    }
}

/// One page of search results.
///
/// `total` counts all candidates before pagination; `scores` covers only
/// the returned page and is present only for ranked searches.
#[derive(Clone, Debug, Default)]
pub struct SearchResult {
    pub documents: Vec<Document>,
    pub total: usize,
    pub scores: Option<Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_options_default() {
        let options = SearchOptions::default();
        assert_eq!(options.mode, SearchMode::And);
        assert!(options.use_ranking);
        assert_eq!(options.limit, 10);
        assert_eq!(options.offset, 0);
    }

    #[test]
    fn test_search_mode_serde() {
        assert_eq!(serde_json::to_string(&SearchMode::And).unwrap(), "\"and\"");
        assert_eq!(serde_json::to_string(&SearchMode::Or).unwrap(), "\"or\"");
    }
}
