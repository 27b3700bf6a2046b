//! In-process document store.

use std::collections::{BTreeMap, BTreeSet};

use tokio::sync::Mutex;

use super::{CollectionPath, Document, DocumentPath, DocumentStore, Fields, StoreError};

/// Documents held in memory, keyed by full path.
///
/// Listing returns documents in path order, which makes test output stable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<DocumentPath, Fields>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents across every collection.
    pub async fn len(&self) -> usize {
        self.documents.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.lock().await.is_empty()
    }

    /// Every stored document path, sorted.
    pub async fn paths(&self) -> Vec<DocumentPath> {
        self.documents.lock().await.keys().cloned().collect()
    }

    /// A copy of every stored document, sorted by path.
    pub async fn snapshot(&self) -> Vec<Document> {
        self.documents
            .lock()
            .await
            .iter()
            .map(|(path, fields)| Document {
                path: path.clone(),
                fields: fields.clone(),
            })
            .collect()
    }
}

impl DocumentStore for MemoryStore {
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>, StoreError> {
        let documents = self.documents.lock().await;
        Ok(documents
            .iter()
            .filter(|(path, _)| path.parent() == *collection)
            .map(|(path, fields)| Document {
                path: path.clone(),
                fields: fields.clone(),
            })
            .collect())
    }

    async fn list_including_missing(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<DocumentPath>, StoreError> {
        let prefix = format!("{}/", collection.as_str());
        let documents = self.documents.lock().await;
        let parents: BTreeSet<DocumentPath> = documents
            .keys()
            .filter_map(|path| {
                let rest = path.as_str().strip_prefix(&prefix)?;
                rest.split('/').next().map(|id| collection.doc(id))
            })
            .collect();
        Ok(parents.into_iter().collect())
    }

    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.lock().await;
        Ok(documents.get(path).map(|fields| Document {
            path: path.clone(),
            fields: fields.clone(),
        }))
    }

    async fn set(&self, path: &DocumentPath, fields: &Fields) -> Result<(), StoreError> {
        self.documents
            .lock()
            .await
            .insert(path.clone(), fields.clone());
        Ok(())
    }

    async fn delete(&self, path: &DocumentPath) -> Result<(), StoreError> {
        self.documents.lock().await.remove(path);
        Ok(())
    }
}
