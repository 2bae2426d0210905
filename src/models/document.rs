use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A searchable document.
///
/// The id is assigned by the caller and must be non-empty and unique.
/// Serde field names match the on-disk record format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            url: None,
            metadata: HashMap::new(),
        }
    }

    /// The full text that participates in indexing. Metadata and URL do
    /// not.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }
}

/// Per-document statistics used for BM25 length normalization.
///
/// Invariant: `length` equals the sum of `term_frequencies` counts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocStats {
    pub id: String,
    pub length: u64,
    pub term_frequencies: HashMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_searchable_text() {
        let doc = Document::new("1", "Go Programming", "Go is simple");
        assert_eq!(doc.searchable_text(), "Go Programming Go is simple");
    }

    #[test]
    fn test_document_serde_omits_empty_optionals() {
        let doc = Document::new("1", "title", "content");
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("url").is_none());
        assert!(value.get("metadata").is_none());

        let parsed: Document = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_document_serde_round_trip_full() {
        let mut doc = Document::new("1", "title", "content");
        doc.url = Some("https://example.com".to_string());
        doc.metadata
            .insert("lang".to_string(), "en".to_string());

        let json = serde_json::to_string(&doc).unwrap();
        let parsed: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_doc_stats_serde_round_trip() {
        let stats = DocStats {
            id: "1".to_string(),
            length: 3,
            term_frequencies: HashMap::from([
                ("go".to_string(), 2),
                ("simple".to_string(), 1),
            ]),
        };

        let json = serde_json::to_string(&stats).unwrap();
        let parsed: DocStats = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stats);
        assert_eq!(
            parsed.length,
            parsed.term_frequencies.values().sum::<u64>()
        );
    }
}
