//! Slash-separated collection and document paths.
//!
//! Paths are relative to the database root: `pantries` is a collection,
//! `pantries/pantry1` a document, `pantries/pantry1/members` a
//! sub-collection. Collections sit at odd segment counts, documents at even.

use std::fmt;

use super::StoreError;

/// Path to a collection or sub-collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

/// Path to a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath(String);

fn segments(path: &str) -> Result<Vec<&str>, StoreError> {
    let parts: Vec<&str> = path.split('/').collect();
    if parts.iter().any(|segment| segment.is_empty()) {
        return Err(StoreError::InvalidPath(path.to_owned()));
    }
    Ok(parts)
}

impl CollectionPath {
    /// A top-level collection.
    #[must_use]
    pub fn root(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// Parse a relative collection path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] if a segment is empty or the path
    /// has an even number of segments.
    pub fn parse(path: &str) -> Result<Self, StoreError> {
        if segments(path)?.len() % 2 == 0 {
            return Err(StoreError::InvalidPath(path.to_owned()));
        }
        Ok(Self(path.to_owned()))
    }

    /// A document in this collection.
    #[must_use]
    pub fn doc(&self, id: &str) -> DocumentPath {
        DocumentPath(format!("{}/{id}", self.0))
    }

    /// Last segment, e.g. `members` for `pantries/p1/members`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DocumentPath {
    /// Parse a relative document path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] if a segment is empty or the path
    /// has an odd number of segments.
    pub fn parse(path: &str) -> Result<Self, StoreError> {
        if segments(path)?.len() % 2 != 0 {
            return Err(StoreError::InvalidPath(path.to_owned()));
        }
        Ok(Self(path.to_owned()))
    }

    /// A sub-collection under this document.
    #[must_use]
    pub fn collection(&self, name: &str) -> CollectionPath {
        CollectionPath(format!("{}/{name}", self.0))
    }

    /// The collection holding this document.
    #[must_use]
    pub fn parent(&self) -> CollectionPath {
        let parent = self.0.rsplit_once('/').map_or("", |(parent, _)| parent);
        CollectionPath(parent.to_owned())
    }

    /// The document ID (last segment).
    #[must_use]
    pub fn id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
