//! Firestore emulator REST client.
//!
//! # API Reference
//!
//! - Base URL: `http://{host}/v1/projects/{project}/databases/(default)/documents`
//! - Authentication: `Authorization: Bearer owner` bypasses security rules on
//!   the emulator
//! - List: `GET {collection}?pageSize=N&pageToken=T`, plus `showMissing=true`
//!   to include deleted documents that still have sub-collections
//! - Get: `GET {document}`
//! - Set: `PATCH {document}` with `{"fields": ...}` and no update mask, which
//!   creates the document or replaces it wholesale
//! - Delete: `DELETE {document}`

use std::sync::Arc;

use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use super::{CollectionPath, Document, DocumentPath, DocumentStore, Fields, StoreError};
use crate::config::EmulatorConfig;

/// A document as the REST API returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDocument {
    /// Full resource name, `projects/.../documents/{path}`.
    name: String,
    #[serde(default)]
    fields: Fields,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<WireDocument>,
    next_page_token: Option<String>,
}

#[derive(Serialize)]
struct WriteDocument<'a> {
    fields: &'a Fields,
}

/// Client for a running Firestore emulator.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct FirestoreEmulator {
    inner: Arc<FirestoreEmulatorInner>,
}

struct FirestoreEmulatorInner {
    client: Client,
    /// `.../databases/(default)/documents`
    documents_url: Url,
    /// `projects/{project}/databases/(default)/documents/`
    name_prefix: String,
    token: SecretString,
    page_size: u32,
}

impl std::fmt::Debug for FirestoreEmulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreEmulator")
            .field("documents_url", &self.inner.documents_url.as_str())
            .field("token", &"[REDACTED]")
            .field("page_size", &self.inner.page_size)
            .finish_non_exhaustive()
    }
}

impl FirestoreEmulator {
    /// Create a client for the emulator described by `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the emulator URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(config: &EmulatorConfig) -> Result<Self, StoreError> {
        let documents_url = config.documents_url()?;
        let client = Client::builder().build()?;

        Ok(Self {
            inner: Arc::new(FirestoreEmulatorInner {
                client,
                documents_url,
                name_prefix: format!("{}/documents/", config.database_name()),
                token: config.token.clone(),
                page_size: config.page_size,
            }),
        })
    }

    /// Root URL every document path hangs off.
    #[must_use]
    pub fn documents_url(&self) -> &Url {
        &self.inner.documents_url
    }

    /// URL for a relative collection or document path.
    fn url_for(&self, path: &str) -> Result<Url, StoreError> {
        let mut url = self.inner.documents_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::InvalidPath(path.to_owned()))?
            .extend(path.split('/'));
        Ok(url)
    }

    /// Turn a full resource name back into a relative document path.
    fn relative_path(&self, name: &str) -> Result<DocumentPath, StoreError> {
        let relative = name
            .strip_prefix(&self.inner.name_prefix)
            .ok_or_else(|| StoreError::Parse(format!("unexpected document name: {name}")))?;
        DocumentPath::parse(relative)
    }

    fn document_from_wire(&self, wire: WireDocument) -> Result<Document, StoreError> {
        Ok(Document {
            path: self.relative_path(&wire.name)?,
            fields: wire.fields,
        })
    }

    /// Pass successful responses through, map the rest to errors.
    async fn check(&self, response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        debug!(status = status.as_u16(), %message, "Emulator returned an error");

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthorized(message),
            StatusCode::NOT_FOUND => StoreError::NotFound(message),
            _ => StoreError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        response
            .json()
            .await
            .map_err(|e| StoreError::Parse(format!("Failed to parse response: {e}")))
    }

    /// Every page of a collection listing.
    async fn list_pages(
        &self,
        collection: &CollectionPath,
        show_missing: bool,
    ) -> Result<Vec<WireDocument>, StoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.url_for(collection.as_str())?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("pageSize", &self.inner.page_size.to_string());
                if show_missing {
                    query.append_pair("showMissing", "true");
                }
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let response = self
                .inner
                .client
                .get(url)
                .bearer_auth(self.inner.token.expose_secret())
                .send()
                .await?;
            let page: ListDocumentsResponse = Self::parse(self.check(response).await?).await?;
            documents.extend(page.documents);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }
}

impl DocumentStore for FirestoreEmulator {
    #[instrument(skip(self), fields(collection = %collection))]
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>, StoreError> {
        let documents = self
            .list_pages(collection, false)
            .await?
            .into_iter()
            .map(|wire| self.document_from_wire(wire))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = documents.len(), "Listed documents");
        Ok(documents)
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn list_including_missing(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<DocumentPath>, StoreError> {
        let paths = self
            .list_pages(collection, true)
            .await?
            .iter()
            .map(|wire| self.relative_path(&wire.name))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = paths.len(), "Listed documents including missing");
        Ok(paths)
    }

    #[instrument(skip(self), fields(path = %path))]
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        let response = self
            .inner
            .client
            .get(self.url_for(path.as_str())?)
            .bearer_auth(self.inner.token.expose_secret())
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let wire: WireDocument = Self::parse(self.check(response).await?).await?;
        self.document_from_wire(wire).map(Some)
    }

    #[instrument(skip(self, fields), fields(path = %path))]
    async fn set(&self, path: &DocumentPath, fields: &Fields) -> Result<(), StoreError> {
        let response = self
            .inner
            .client
            .patch(self.url_for(path.as_str())?)
            .bearer_auth(self.inner.token.expose_secret())
            .json(&WriteDocument { fields })
            .send()
            .await?;
        self.check(response).await?;

        debug!("Document written");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path))]
    async fn delete(&self, path: &DocumentPath) -> Result<(), StoreError> {
        let response = self
            .inner
            .client
            .delete(self.url_for(path.as_str())?)
            .bearer_auth(self.inner.token.expose_secret())
            .send()
            .await?;
        self.check(response).await?;

        debug!("Document deleted");
        Ok(())
    }
}
