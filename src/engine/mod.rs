//! The search engine: composes the analyzer, inverted index, document
//! statistics, BM25 ranking, and storage under one readers-writer lock.
//!
//! Writers hold the exclusive lock for the full mutation including the
//! persistence writes, so readers never observe a partially applied
//! upsert. Reads take the shared lock and may load documents from the
//! store while holding it, since the page id list is already snapshotted.

use std::collections::HashMap;
use std::path::Path;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::analyzer;
use crate::error::{CuttleError, Result};
use crate::index::{IndexStats, InvertedIndex};
use crate::models::{DocStats, Document, SearchMode, SearchOptions, SearchResult};
use crate::ranking;
use crate::storage::Storage;

/// In-memory state guarded by a single lock. The three pieces change
/// together; `avg_doc_length` is only meaningful relative to the other
/// two.
struct EngineState {
    index: InvertedIndex,
    doc_stats: HashMap<String, DocStats>,
    avg_doc_length: f64,
}

impl EngineState {
    fn recalculate_avg_length(&mut self) {
        if self.doc_stats.is_empty() {
            self.avg_doc_length = 0.0;
            return;
        }
        let total: u64 = self.doc_stats.values().map(|s| s.length).sum();
        self.avg_doc_length = total as f64 / self.doc_stats.len() as f64;
    }
}

/// Single-node search engine over a durable store.
pub struct SearchEngine {
    storage: Storage,
    state: RwLock<EngineState>,
}

impl SearchEngine {
    /// Open the engine over the store at `path`, loading any persisted
    /// index and statistics. A fresh store yields a working empty engine.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let storage = Storage::open(path)?;

        let index = storage.load_index()?;
        let doc_stats = storage.iter_doc_stats()?;

        let mut state = EngineState {
            index,
            doc_stats,
            avg_doc_length: 0.0,
        };
        state.recalculate_avg_length();

        info!(
            path = %storage.path().display(),
            documents = state.index.total_documents(),
            "search engine opened"
        );

        Ok(Self {
            storage,
            state: RwLock::new(state),
        })
    }

    /// Insert a document, or fully replace the one already stored under
    /// its id. On success the document, its statistics, and the index
    /// are durably persisted.
    pub fn upsert_document(&self, doc: Document) -> Result<()> {
        if doc.id.is_empty() {
            return Err(CuttleError::InvalidRequest(
                "document id must not be empty".to_string(),
            ));
        }

        let mut state = self.state.write();

        let tokens = analyzer::analyze(&doc.searchable_text());
        let stats = DocStats {
            id: doc.id.clone(),
            length: tokens.len() as u64,
            term_frequencies: analyzer::term_frequencies(&tokens),
        };

        // A known id must go through update, otherwise the document
        // counter would double-count it.
        if state.doc_stats.contains_key(&doc.id) {
            state.index.update_document(&doc.id, &tokens);
        } else {
            state.index.add_document(&doc.id, &tokens);
        }

        state.doc_stats.insert(doc.id.clone(), stats.clone());
        state.recalculate_avg_length();

        // Three separate writes; on failure the in-memory state is ahead
        // of the store until the next successful persist or a restart.
        self.storage.put_document(&doc)?;
        self.storage.put_doc_stats(&stats)?;
        self.storage.put_index(&state.index)?;

        debug!(doc_id = %doc.id, tokens = tokens.len(), "document upserted");
        Ok(())
    }

    /// Delete a document. Deleting an id that is not stored succeeds
    /// without touching any counters.
    pub fn delete_document(&self, doc_id: &str) -> Result<()> {
        let mut state = self.state.write();

        if state.doc_stats.remove(doc_id).is_some() {
            state.index.remove_document(doc_id);
            state.recalculate_avg_length();
        }

        self.storage.delete_document(doc_id)?;
        self.storage.delete_doc_stats(doc_id)?;
        self.storage.put_index(&state.index)?;

        debug!(doc_id = %doc_id, "document deleted");
        Ok(())
    }

    /// Fetch a stored document by id, without locking the index.
    pub fn get_document(&self, doc_id: &str) -> Result<Option<Document>> {
        self.storage.get_document(doc_id)
    }

    /// Run a keyword query and return one page of results.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResult> {
        let state = self.state.read();

        let query_tokens = analyzer::analyze(query);
        if query_tokens.is_empty() {
            return Ok(SearchResult::default());
        }

        let candidate_ids = match options.mode {
            SearchMode::And => state.index.search_and(&query_tokens),
            SearchMode::Or => state.index.search_or(&query_tokens),
        };
        let total = candidate_ids.len();

        let (sorted_ids, scores) = if options.use_ranking && total > 0 {
            let scored = ranking::rank_documents(
                &query_tokens,
                &candidate_ids,
                &state.doc_stats,
                &state.index,
                state.avg_doc_length,
            );
            let ids: Vec<String> = scored.iter().map(|s| s.doc_id.clone()).collect();
            let scores: Vec<f64> = scored.iter().map(|s| s.score).collect();
            (ids, Some(scores))
        } else {
            (candidate_ids, None)
        };

        let start = options.offset.min(sorted_ids.len());
        let end = (start + options.limit).min(sorted_ids.len());

        let page_ids = &sorted_ids[start..end];
        let page_scores = scores.map(|s| s[start..end].to_vec());

        // Stats and index can disagree with the store after a partial
        // write; ids that fail to load are dropped from the page.
        let mut documents = Vec::with_capacity(page_ids.len());
        for doc_id in page_ids {
            if let Ok(Some(doc)) = self.storage.get_document(doc_id) {
                documents.push(doc);
            }
        }

        Ok(SearchResult {
            documents,
            total,
            scores: page_scores,
        })
    }

    /// Index statistics
    pub fn stats(&self) -> IndexStats {
        self.state.read().index.stats()
    }

    /// Release the backing store.
    pub fn close(self) -> Result<()> {
        info!("search engine closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_engine() -> (TempDir, SearchEngine) {
        let tmp = TempDir::new().unwrap();
        let engine = SearchEngine::open(tmp.path().join("search.db")).unwrap();
        (tmp, engine)
    }

    #[test]
    fn test_fresh_store_is_empty() {
        let (_tmp, engine) = open_engine();
        let stats = engine.stats();
        assert_eq!(stats.total_documents, 0);
        assert_eq!(stats.total_tokens, 0);
    }

    #[test]
    fn test_avg_length_tracks_mutations() {
        let (_tmp, engine) = open_engine();

        engine
            .upsert_document(Document::new("1", "one two", ""))
            .unwrap();
        engine
            .upsert_document(Document::new("2", "one two three four", ""))
            .unwrap();
        assert!((engine.state.read().avg_doc_length - 3.0).abs() < 1e-9);

        engine.delete_document("2").unwrap();
        assert!((engine.state.read().avg_doc_length - 2.0).abs() < 1e-9);

        engine.delete_document("1").unwrap();
        assert_eq!(engine.state.read().avg_doc_length, 0.0);
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let (_tmp, engine) = open_engine();
        let err = engine
            .upsert_document(Document::new("", "title", "content"))
            .unwrap_err();
        assert!(matches!(err, CuttleError::InvalidRequest(_)));
    }

    #[test]
    fn test_doc_count_matches_stats_len() {
        let (_tmp, engine) = open_engine();

        engine
            .upsert_document(Document::new("1", "alpha", "beta"))
            .unwrap();
        engine
            .upsert_document(Document::new("1", "alpha", "gamma"))
            .unwrap();
        engine.delete_document("missing").unwrap();

        let state = engine.state.read();
        assert_eq!(state.index.total_documents(), state.doc_stats.len());
        assert_eq!(state.index.total_documents(), 1);
    }
}
