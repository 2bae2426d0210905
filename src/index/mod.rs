//! Inverted index mapping tokens to posting lists of document ids.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Inverted index with incremental add/remove/update.
///
/// Posting lists hold distinct document ids in no observable order, and
/// empty lists are dropped eagerly. The struct serializes directly into
/// the on-disk `main_index` record, so the field names are contractual.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InvertedIndex {
    index: HashMap<String, Vec<String>>,
    doc_count: usize,
}

/// Index statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_documents: usize,
    pub total_tokens: usize,
    pub avg_docs_per_token: f64,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document under the given tokens.
    ///
    /// Duplicate tokens contribute a single posting. The document counter
    /// is incremented unconditionally, so callers must route known ids
    /// through [`InvertedIndex::update_document`] instead.
    pub fn add_document(&mut self, doc_id: &str, tokens: &[String]) {
        let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();

        for token in unique {
            let postings = self.index.entry(token.to_string()).or_default();
            if !postings.iter().any(|id| id == doc_id) {
                postings.push(doc_id.to_string());
            }
        }

        self.doc_count += 1;
    }

    /// Remove a document from every posting list it appears in.
    pub fn remove_document(&mut self, doc_id: &str) {
        self.index.retain(|_, postings| {
            postings.retain(|id| id != doc_id);
            !postings.is_empty()
        });

        self.doc_count = self.doc_count.saturating_sub(1);
    }

    /// Replace a document's postings: remove the old ones, add the new.
    pub fn update_document(&mut self, doc_id: &str, tokens: &[String]) {
        self.remove_document(doc_id);
        self.add_document(doc_id, tokens);
    }

    /// Documents containing ALL of the tokens. Empty input or any absent
    /// token yields an empty result.
    pub fn search_and(&self, tokens: &[String]) -> Vec<String> {
        let Some((first, rest)) = tokens.split_first() else {
            return Vec::new();
        };
        let Some(postings) = self.index.get(first) else {
            return Vec::new();
        };

        let mut result: HashSet<&str> = postings.iter().map(String::as_str).collect();

        for token in rest {
            let Some(postings) = self.index.get(token) else {
                return Vec::new();
            };
            let docs: HashSet<&str> = postings.iter().map(String::as_str).collect();
            result.retain(|id| docs.contains(id));

            if result.is_empty() {
                return Vec::new();
            }
        }

        result.into_iter().map(str::to_string).collect()
    }

    /// Documents containing ANY of the tokens. Absent tokens contribute
    /// nothing.
    pub fn search_or(&self, tokens: &[String]) -> Vec<String> {
        let mut result: HashSet<&str> = HashSet::new();

        for token in tokens {
            if let Some(postings) = self.index.get(token) {
                result.extend(postings.iter().map(String::as_str));
            }
        }

        result.into_iter().map(str::to_string).collect()
    }

    /// Number of documents containing the token
    pub fn doc_frequency(&self, token: &str) -> usize {
        self.index.get(token).map_or(0, Vec::len)
    }

    /// Number of currently indexed documents
    pub fn total_documents(&self) -> usize {
        self.doc_count
    }

    pub fn stats(&self) -> IndexStats {
        let total_postings: usize = self.index.values().map(Vec::len).sum();
        let avg_docs_per_token = if self.index.is_empty() {
            0.0
        } else {
            total_postings as f64 / self.index.len() as f64
        };

        IndexStats {
            total_documents: self.doc_count,
            total_tokens: self.index.len(),
            avg_docs_per_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_add_and_search() {
        let mut idx = InvertedIndex::new();
        idx.add_document("a", &tokens(&["rust", "systems"]));
        idx.add_document("b", &tokens(&["rust", "web"]));

        assert_eq!(idx.total_documents(), 2);
        assert_eq!(idx.doc_frequency("rust"), 2);
        assert_eq!(idx.doc_frequency("web"), 1);
        assert_eq!(idx.doc_frequency("absent"), 0);

        let mut hits = idx.search_and(&tokens(&["rust"]));
        hits.sort();
        assert_eq!(hits, vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_tokens_single_posting() {
        let mut idx = InvertedIndex::new();
        idx.add_document("a", &tokens(&["go", "go", "go"]));
        assert_eq!(idx.doc_frequency("go"), 1);
    }

    #[test]
    fn test_remove_drops_empty_posting_lists() {
        let mut idx = InvertedIndex::new();
        idx.add_document("a", &tokens(&["solo"]));
        idx.remove_document("a");

        assert_eq!(idx.total_documents(), 0);
        assert_eq!(idx.doc_frequency("solo"), 0);
        assert_eq!(idx.stats().total_tokens, 0);
    }

    #[test]
    fn test_counter_floors_at_zero() {
        let mut idx = InvertedIndex::new();
        idx.remove_document("ghost");
        assert_eq!(idx.total_documents(), 0);
    }

    #[test]
    fn test_update_replaces_postings() {
        let mut idx = InvertedIndex::new();
        idx.add_document("a", &tokens(&["apple"]));
        idx.update_document("a", &tokens(&["banana"]));

        assert_eq!(idx.total_documents(), 1);
        assert!(idx.search_and(&tokens(&["apple"])).is_empty());
        assert_eq!(idx.search_and(&tokens(&["banana"])), vec!["a"]);
    }

    #[test]
    fn test_search_and_intersects() {
        let mut idx = InvertedIndex::new();
        idx.add_document("a", &tokens(&["rust"]));
        idx.add_document("b", &tokens(&["go"]));
        idx.add_document("c", &tokens(&["rust", "go"]));

        assert_eq!(idx.search_and(&tokens(&["rust", "go"])), vec!["c"]);
        assert!(idx.search_and(&tokens(&["rust", "absent"])).is_empty());
        assert!(idx.search_and(&[]).is_empty());
    }

    #[test]
    fn test_search_or_unions() {
        let mut idx = InvertedIndex::new();
        idx.add_document("a", &tokens(&["rust"]));
        idx.add_document("b", &tokens(&["go"]));

        let mut hits = idx.search_or(&tokens(&["rust", "go", "absent"]));
        hits.sort();
        assert_eq!(hits, vec!["a", "b"]);
        assert!(idx.search_or(&[]).is_empty());
    }

    #[test]
    fn test_and_is_subset_of_or() {
        let mut idx = InvertedIndex::new();
        idx.add_document("a", &tokens(&["x", "y"]));
        idx.add_document("b", &tokens(&["x"]));
        idx.add_document("c", &tokens(&["y"]));

        let query = tokens(&["x", "y"]);
        let and_hits: HashSet<String> = idx.search_and(&query).into_iter().collect();
        let or_hits: HashSet<String> = idx.search_or(&query).into_iter().collect();
        assert!(and_hits.is_subset(&or_hits));
    }

    #[test]
    fn test_stats() {
        let mut idx = InvertedIndex::new();
        idx.add_document("a", &tokens(&["x", "y"]));
        idx.add_document("b", &tokens(&["x"]));

        let stats = idx.stats();
        assert_eq!(stats.total_documents, 2);
        assert_eq!(stats.total_tokens, 2);
        assert!((stats.avg_docs_per_token - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_serde_round_trip_and_field_names() {
        let mut idx = InvertedIndex::new();
        idx.add_document("a", &tokens(&["rust", "search"]));

        let value = serde_json::to_value(&idx).unwrap();
        assert!(value.get("index").is_some());
        assert_eq!(value.get("doc_count").unwrap(), 1);

        let parsed: InvertedIndex = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, idx);
    }
}
