//! Store doubles for unit tests

use super::{DocumentStore, StoreError};
use async_trait::async_trait;
use serde_json::Value;

/// Store whose every operation fails
pub struct FailingStore;

fn unavailable() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, _collection: &str, _id: &str) -> Result<Option<Value>, StoreError> {
        Err(unavailable())
    }

    async fn find(
        &self,
        _collection: &str,
        _field: &str,
        _value: &str,
    ) -> Result<Vec<Value>, StoreError> {
        Err(unavailable())
    }

    async fn upsert(&self, _collection: &str, _id: &str, _document: Value) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn delete(&self, _collection: &str, _id: &str) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(unavailable())
    }
}
