//! Document store collaborator
//!
//! All persistence goes through [`DocumentStore`], a small key/value-plus-
//! filter interface over JSON documents grouped in collections. Typed access
//! goes through the [`Document`] trait and the free functions in this module,
//! which are the only read path and apply the shared soft-delete predicate.

mod memory;
mod postgres;

#[cfg(test)]
pub(crate) mod testing;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

use apiboy_shared::Event;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Document store failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Malformed document in {collection}/{id}: {source}")]
    Malformed {
        collection: &'static str,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not encode document: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence interface over JSON documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by id
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Every document whose top-level string `field` equals `value`
    async fn find(&self, collection: &str, field: &str, value: &str)
        -> Result<Vec<Value>, StoreError>;

    /// Insert or replace the document stored under `id`
    async fn upsert(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError>;

    /// Remove a document; removing a missing document is not an error
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Store handle shared across the application
pub type SharedStore = Arc<dyn DocumentStore>;

/// A typed document living in one collection
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    /// Deletion event of soft-deletable documents
    fn deleted(&self) -> Option<&Event> {
        None
    }
}

/// Shared visibility predicate: soft-deleted documents read as absent
#[inline]
pub fn is_visible<D: Document>(document: &D) -> bool {
    document.deleted().is_none()
}

fn decode<D: Document>(id: &str, value: Value) -> Result<Option<D>, StoreError> {
    let document: D = serde_json::from_value(value).map_err(|source| StoreError::Malformed {
        collection: D::COLLECTION,
        id: id.to_string(),
        source,
    })?;
    Ok(Some(document).filter(is_visible))
}

/// Fetch a visible document by id
pub async fn get<D: Document>(store: &dyn DocumentStore, id: &str) -> Result<Option<D>, StoreError> {
    match store.get(D::COLLECTION, id).await? {
        Some(value) => decode(id, value),
        None => Ok(None),
    }
}

/// First visible document whose `field` equals `value`
pub async fn find_one<D: Document>(
    store: &dyn DocumentStore,
    field: &str,
    value: &str,
) -> Result<Option<D>, StoreError> {
    for raw in store.find(D::COLLECTION, field, value).await? {
        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if let Some(document) = decode::<D>(&id, raw)? {
            return Ok(Some(document));
        }
    }
    Ok(None)
}

/// Every visible document whose `field` equals `value`
pub async fn find_all<D: Document>(
    store: &dyn DocumentStore,
    field: &str,
    value: &str,
) -> Result<Vec<D>, StoreError> {
    let mut documents = Vec::new();
    for raw in store.find(D::COLLECTION, field, value).await? {
        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        documents.extend(decode::<D>(&id, raw)?);
    }
    Ok(documents)
}

/// Write a document under its own id
pub async fn put<D: Document>(store: &dyn DocumentStore, document: &D) -> Result<(), StoreError> {
    let value = serde_json::to_value(document).map_err(StoreError::Encode)?;
    store.upsert(D::COLLECTION, document.id(), value).await
}

/// Hard-delete a document
pub async fn remove<D: Document>(store: &dyn DocumentStore, id: &str) -> Result<(), StoreError> {
    store.delete(D::COLLECTION, id).await
}
