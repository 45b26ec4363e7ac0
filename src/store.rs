use crate::document::{Document, StatsRecord};
use crate::error::{Error, Result};
use crate::kv::KvStore;
use tracing::{debug, info, warn};

pub const MAX_DOCUMENTS: usize = 50;
pub const MAX_STATS_HISTORY: usize = 10;

/// Key the collection is stored under
pub const DOCUMENTS_KEY: &str = "savedDocuments";

/// Saved documents, mirrored in memory and persisted as one collection.
///
/// Every mutation re-reads the persisted collection, applies the change and
/// writes the whole collection back. A change whose write failed stays in
/// memory and is written once more when the store is dropped.
#[derive(Debug)]
pub struct DocumentStore<K: KvStore> {
    kv: K,
    documents: Vec<Document>,
    /// In-memory changes not yet persisted
    dirty: bool,
}

impl<K: KvStore> DocumentStore<K> {
    /// Read the persisted collection; a missing key means no documents yet.
    pub fn open(kv: K) -> Result<Self> {
        let documents = read_collection(&kv)?;
        info!(count = documents.len(), "document store opened");
        Ok(Self {
            kv,
            documents,
            dirty: false,
        })
    }

    /// Pick up writes made by other stores on the same backend. Skipped
    /// while unpersisted changes are pending.
    pub fn reload(&mut self) -> Result<()> {
        if self.dirty {
            return Ok(());
        }
        self.documents = read_collection(&self.kv)?;
        debug!(count = self.documents.len(), "document store reloaded");
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// First document called `name`
    pub fn get(&self, name: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.name == name)
    }

    /// Save `content` as a new document. A missing or blank name becomes
    /// "Document N". Duplicate names are accepted.
    pub fn save(&mut self, name: Option<&str>, content: &str) -> Result<Document> {
        let saved = self.mutate(|docs| {
            if docs.len() >= MAX_DOCUMENTS {
                return Err(Error::CapacityExceeded {
                    limit: MAX_DOCUMENTS,
                });
            }
            let name = match name.map(str::trim) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => format!("Document {}", docs.len() + 1),
            };
            let doc = Document::new(name, content);
            docs.push(doc.clone());
            Ok(doc)
        })?;
        info!(name = %saved.name, "document saved");
        Ok(saved)
    }

    pub fn load(&self, name: &str) -> Result<&Document> {
        self.get(name).ok_or_else(|| Error::not_found(name))
    }

    /// Remove the first document called `name`
    pub fn delete(&mut self, name: &str) -> Result<Document> {
        let removed = self.mutate(|docs| {
            let idx = docs
                .iter()
                .position(|doc| doc.name == name)
                .ok_or_else(|| Error::not_found(name))?;
            Ok(docs.remove(idx))
        })?;
        info!(name, "document deleted");
        Ok(removed)
    }

    /// Prepend `record` to the history of the first document called `name`,
    /// keeping the newest [`MAX_STATS_HISTORY`] records.
    pub fn append_stats(&mut self, name: &str, record: StatsRecord) -> Result<()> {
        self.mutate(|docs| {
            let doc = docs
                .iter_mut()
                .find(|doc| doc.name == name)
                .ok_or_else(|| Error::not_found(name))?;
            doc.stats_history.insert(0, record);
            doc.stats_history.truncate(MAX_STATS_HISTORY);
            Ok(())
        })?;
        info!(name, "session stats recorded");
        Ok(())
    }

    /// Write the in-memory collection as-is
    pub fn flush(&mut self) -> Result<()> {
        write_collection(&mut self.kv, &self.documents)?;
        self.dirty = false;
        debug!(count = self.documents.len(), "document store flushed");
        Ok(())
    }

    /// Read-modify-write of the whole persisted collection. A rejected change
    /// touches nothing; a change whose write fails is kept in memory and
    /// marked dirty.
    fn mutate<T>(&mut self, change: impl FnOnce(&mut Vec<Document>) -> Result<T>) -> Result<T> {
        let mut docs = if self.dirty {
            self.documents.clone()
        } else {
            read_collection(&self.kv)?
        };
        let out = change(&mut docs)?;
        self.documents = docs;
        self.dirty = true;
        write_collection(&mut self.kv, &self.documents)?;
        self.dirty = false;
        Ok(out)
    }
}

impl<K: KvStore> Drop for DocumentStore<K> {
    fn drop(&mut self) {
        if !self.dirty {
            return;
        }
        if let Err(e) = self.flush() {
            warn!("failed to flush documents on shutdown: {e}");
        }
    }
}

fn read_collection<K: KvStore + ?Sized>(kv: &K) -> Result<Vec<Document>> {
    match kv.read(DOCUMENTS_KEY)? {
        Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
        None => Ok(Vec::new()),
    }
}

fn write_collection<K: KvStore + ?Sized>(kv: &mut K, docs: &[Document]) -> Result<()> {
    let bytes = serde_json::to_vec(docs)?;
    kv.write(DOCUMENTS_KEY, &bytes)
}
