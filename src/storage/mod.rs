//! Durable persistence over a fjall keyspace store.
//!
//! Four keyspaces mirror the engine's state: `documents` and `doc_stats`
//! are keyed by document id, `index` holds the whole serialized inverted
//! index under a single key, and `metadata` holds opaque caller bytes.
//! Records are JSON; the field names are the on-disk schema.

use std::path::{Path, PathBuf};

use fjall::{Database, Keyspace, KeyspaceCreateOptions};

use crate::error::Result;
use crate::index::InvertedIndex;
use crate::models::{DocStats, Document};

const DOCUMENTS_KS: &str = "documents";
const DOC_STATS_KS: &str = "doc_stats";
const INDEX_KS: &str = "index";
const METADATA_KS: &str = "metadata";

const MAIN_INDEX_KEY: &[u8] = b"main_index";

/// Fjall-backed storage with one keyspace per record family.
pub struct Storage {
    path: PathBuf,
    _db: Database,
    documents: Keyspace,
    doc_stats: Keyspace,
    index: Keyspace,
    metadata: Keyspace,
}

impl Storage {
    /// Open the store at `path`, creating it and its keyspaces if absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&path)?;

        let db = Database::builder(&path).open()?;

        let documents = open_keyspace(&db, DOCUMENTS_KS)?;
        let doc_stats = open_keyspace(&db, DOC_STATS_KS)?;
        let index = open_keyspace(&db, INDEX_KS)?;
        let metadata = open_keyspace(&db, METADATA_KS)?;

        Ok(Self {
            path,
            _db: db,
            documents,
            doc_stats,
            index,
            metadata,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn put_document(&self, doc: &Document) -> Result<()> {
        let data = serde_json::to_vec(doc)?;
        self.documents.insert(doc.id.as_bytes(), data)?;
        Ok(())
    }

    pub fn get_document(&self, id: &str) -> Result<Option<Document>> {
        let Some(data) = self.documents.get(id.as_bytes())? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(data.as_ref())?))
    }

    pub fn delete_document(&self, id: &str) -> Result<()> {
        self.documents.remove(id.as_bytes())?;
        Ok(())
    }

    /// All stored documents, in unspecified order.
    pub fn iter_documents(&self) -> Result<Vec<Document>> {
        let mut docs = Vec::new();
        for kv in self.documents.iter() {
            let key = kv.key()?;
            let key_bytes = key.as_ref().to_vec();
            if let Some(data) = self.documents.get(&key_bytes)? {
                docs.push(serde_json::from_slice(data.as_ref())?);
            }
        }
        Ok(docs)
    }

    pub fn put_doc_stats(&self, stats: &DocStats) -> Result<()> {
        let data = serde_json::to_vec(stats)?;
        self.doc_stats.insert(stats.id.as_bytes(), data)?;
        Ok(())
    }

    pub fn get_doc_stats(&self, id: &str) -> Result<Option<DocStats>> {
        let Some(data) = self.doc_stats.get(id.as_bytes())? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(data.as_ref())?))
    }

    pub fn delete_doc_stats(&self, id: &str) -> Result<()> {
        self.doc_stats.remove(id.as_bytes())?;
        Ok(())
    }

    /// All stored statistics, keyed by document id.
    pub fn iter_doc_stats(&self) -> Result<std::collections::HashMap<String, DocStats>> {
        let mut all = std::collections::HashMap::new();
        for kv in self.doc_stats.iter() {
            let key = kv.key()?;
            let key_bytes = key.as_ref().to_vec();
            if let Some(data) = self.doc_stats.get(&key_bytes)? {
                let stats: DocStats = serde_json::from_slice(data.as_ref())?;
                all.insert(stats.id.clone(), stats);
            }
        }
        Ok(all)
    }

    /// Persist the whole inverted index under the `main_index` key.
    pub fn put_index(&self, index: &InvertedIndex) -> Result<()> {
        let data = serde_json::to_vec(index)?;
        self.index.insert(MAIN_INDEX_KEY, data)?;
        Ok(())
    }

    /// Load the inverted index, or an empty one if never persisted.
    pub fn load_index(&self) -> Result<InvertedIndex> {
        let Some(data) = self.index.get(MAIN_INDEX_KEY)? else {
            return Ok(InvertedIndex::new());
        };
        Ok(serde_json::from_slice(data.as_ref())?)
    }

    pub fn put_metadata(&self, key: &str, value: &[u8]) -> Result<()> {
        self.metadata.insert(key.as_bytes(), value)?;
        Ok(())
    }

    pub fn get_metadata(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let Some(data) = self.metadata.get(key.as_bytes())? else {
            return Ok(None);
        };
        Ok(Some(data.as_ref().to_vec()))
    }
}

fn open_keyspace(db: &Database, name: &str) -> Result<Keyspace> {
    Ok(db.keyspace(name, || KeyspaceCreateOptions::default())?)
}
