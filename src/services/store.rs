//! The object-store seam.
//!
//! Handlers and services only talk to [`ObjectStore`]; store-specific error
//! shapes are folded into [`StoreError`] by each implementation.

use crate::models::object::{ObjectEntry, ObjectStat};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object `{key}` not found in bucket `{bucket}`")]
    NotFound { bucket: String, key: String },
    #[error("transfer failed: {0}")]
    Transfer(String),
    #[error("store request failed: {0}")]
    Internal(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Object content, yielded chunk by chunk as the store delivers it.
pub type ByteStream = BoxStream<'static, StoreResult<Bytes>>;

/// Every object under a prefix, across however many pages the store uses.
/// Finite and not restartable.
pub type EntryStream = BoxStream<'static, StoreResult<ObjectEntry>>;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Metadata query. Absence must be reported as [`StoreError::NotFound`].
    async fn stat_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectStat>;

    /// Open the content stream. When `if_match` is given the store must refuse
    /// to serve any other version of the object.
    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        if_match: Option<&str>,
    ) -> StoreResult<ByteStream>;

    /// Recursive listing of `prefix` (empty matches all keys).
    fn list_objects(&self, bucket: &str, prefix: &str) -> EntryStream;
}
