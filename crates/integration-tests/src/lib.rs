//! Integration tests for Tandberg Pantry seeding.
//!
//! # Running Tests
//!
//! ```bash
//! # Workflow tests against the in-memory store
//! cargo test -p tandberg-pantry-integration-tests
//!
//! # Also run the tests that need a live emulator
//! firebase emulators:start --only firestore &
//! cargo test -p tandberg-pantry-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `reset_workflow` - `clear`, `populate` and `reset` against [`MemoryStore`]
//! - `emulator` - The same workflow against a running Firestore emulator

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::{DateTime, TimeZone, Utc};

use tandberg_pantry_seeder::store::{CollectionPath, Document, DocumentPath, DocumentStore};
use tandberg_pantry_seeder::{Fields, MemoryStore, SeedData, SeedError, StoreError};

/// The instant every test seeds with.
#[must_use]
pub fn seed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0)
        .single()
        .unwrap_or_default()
}

/// The standard seed data at [`seed_instant`].
///
/// # Errors
///
/// Returns error if the fixed seed data cannot be built.
pub fn seed_data() -> Result<SeedData, SeedError> {
    SeedData::fixed(seed_instant())
}

/// Store operations a [`FailingStore`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Set,
    Delete,
}

/// Wraps a [`MemoryStore`] and fails one kind of operation on paths under a
/// prefix. Everything else passes through.
#[derive(Debug)]
pub struct FailingStore {
    pub inner: MemoryStore,
    operation: Operation,
    prefix: String,
}

impl FailingStore {
    #[must_use]
    pub fn new(inner: MemoryStore, operation: Operation, prefix: &str) -> Self {
        Self {
            inner,
            operation,
            prefix: prefix.to_owned(),
        }
    }

    fn check(&self, operation: Operation, path: &str) -> Result<(), StoreError> {
        if operation == self.operation && path.starts_with(&self.prefix) {
            return Err(StoreError::Api {
                status: 503,
                message: format!("injected {operation:?} failure for {path}"),
            });
        }
        Ok(())
    }
}

impl DocumentStore for FailingStore {
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>, StoreError> {
        self.check(Operation::List, collection.as_str())?;
        self.inner.list(collection).await
    }

    async fn list_including_missing(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<DocumentPath>, StoreError> {
        self.check(Operation::List, collection.as_str())?;
        self.inner.list_including_missing(collection).await
    }

    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        self.check(Operation::Get, path.as_str())?;
        self.inner.get(path).await
    }

    async fn set(&self, path: &DocumentPath, fields: &Fields) -> Result<(), StoreError> {
        self.check(Operation::Set, path.as_str())?;
        self.inner.set(path, fields).await
    }

    async fn delete(&self, path: &DocumentPath) -> Result<(), StoreError> {
        self.check(Operation::Delete, path.as_str())?;
        self.inner.delete(path).await
    }
}
