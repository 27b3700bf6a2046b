//! Document store access.
//!
//! [`DocumentStore`] is the seam between the reset workflow and the backing
//! store. [`FirestoreEmulator`] talks to a running emulator over REST;
//! [`MemoryStore`] keeps documents in process for tests.
//!
//! Semantics follow Firestore: `set` creates or fully replaces a document,
//! `delete` of a missing document succeeds, and deleting a document leaves
//! its sub-collections in place.

mod error;
mod firestore;
mod memory;
mod path;
mod value;

pub use error::StoreError;
pub use firestore::FirestoreEmulator;
pub use memory::MemoryStore;
pub use path::{CollectionPath, DocumentPath};
pub use value::{ArrayValue, Fields, GeoPoint, MapValue, Null, Value};

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: DocumentPath,
    pub fields: Fields,
}

impl Document {
    /// The document ID.
    #[must_use]
    pub fn id(&self) -> &str {
        self.path.id()
    }
}

/// Collection/document CRUD against a backing store.
///
/// Implementations are driven sequentially from a single task, so the
/// returned futures need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Every document directly in `collection`, in store order.
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>, StoreError>;

    /// Paths of every document in `collection`, plus paths of missing
    /// documents that still have sub-collections under them.
    ///
    /// A document deleted on its own leaves its sub-collections behind, and
    /// `list` no longer returns it.
    async fn list_including_missing(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<DocumentPath>, StoreError>;

    /// A single document, or `None` if it does not exist.
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError>;

    /// Create or replace a document.
    async fn set(&self, path: &DocumentPath, fields: &Fields) -> Result<(), StoreError>;

    /// Delete a document. Succeeds if it does not exist.
    async fn delete(&self, path: &DocumentPath) -> Result<(), StoreError>;
}
