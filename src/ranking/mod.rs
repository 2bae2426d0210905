//! BM25 relevance scoring

use std::collections::HashMap;

use crate::index::InvertedIndex;
use crate::models::DocStats;

/// Term frequency saturation parameter
pub const BM25_K1: f64 = 1.5;
/// Length normalization parameter
pub const BM25_B: f64 = 0.75;

/// A candidate document with its relevance score
#[derive(Clone, Debug)]
pub struct ScoredDocument {
    pub doc_id: String,
    pub score: f64,
}

/// Compute the BM25 score of one document against the query terms.
///
/// Uses the "+1" idf form `ln((N - df + 0.5) / (df + 0.5) + 1)`, which is
/// non-negative for any df. Query terms absent from the document
/// contribute nothing.
pub fn bm25_score(
    query_terms: &[String],
    stats: &DocStats,
    index: &InvertedIndex,
    avg_doc_length: f64,
) -> f64 {
    let doc_length = stats.length as f64;
    let total_docs = index.total_documents() as f64;

    let mut score = 0.0;
    for term in query_terms {
        let tf = stats.term_frequencies.get(term).copied().unwrap_or(0) as f64;
        if tf == 0.0 {
            continue;
        }

        let df = index.doc_frequency(term) as f64;
        let idf = ((total_docs - df + 0.5) / (df + 0.5) + 1.0).ln();

        let norm = 1.0 - BM25_B + BM25_B * (doc_length / avg_doc_length);
        let tf_component = (tf * (BM25_K1 + 1.0)) / (tf + BM25_K1 * norm);

        score += idf * tf_component;
    }

    score
}

/// Rank candidates by BM25 score, descending.
///
/// Candidates without statistics are skipped. The sort is stable, so
/// equal-scored documents keep their candidate order. Neither the index
/// nor the statistics are modified.
pub fn rank_documents(
    query_terms: &[String],
    candidates: &[String],
    doc_stats: &HashMap<String, DocStats>,
    index: &InvertedIndex,
    avg_doc_length: f64,
) -> Vec<ScoredDocument> {
    let mut scored: Vec<ScoredDocument> = candidates
        .iter()
        .filter_map(|doc_id| {
            doc_stats.get(doc_id).map(|stats| ScoredDocument {
                doc_id: doc_id.clone(),
                score: bm25_score(query_terms, stats, index, avg_doc_length),
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}
