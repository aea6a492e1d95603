//! ObjectService — the fetch and list operations the HTTP surface exposes.
//!
//! Both operations go through the [`ObjectStore`] seam so handlers never see
//! store-specific errors. Bucket authorization happens before either is called.

use crate::{
    models::object::{ObjectEntry, ObjectStat},
    services::store::{ByteStream, ObjectStore, StoreError, StoreResult},
};
use futures::{StreamExt, TryStreamExt, stream};
use std::sync::Arc;
use tracing::error;

/// An object ready to be written out: metadata plus a body that has already
/// produced its first chunk successfully (or is empty).
pub struct FetchedObject {
    pub stat: ObjectStat,
    pub body: ByteStream,
}

#[derive(Clone)]
pub struct ObjectService {
    store: Arc<dyn ObjectStore>,
}

impl ObjectService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Stat the object, open its content stream and pull the first chunk.
    ///
    /// The stream is pinned to the stat's entity tag, so an object replaced in
    /// between fails here instead of disagreeing with the stat's size.
    ///
    /// A failure on the first chunk is returned as [`StoreError::Transfer`]
    /// so the caller can still answer with an error status. Later failures
    /// surface through the returned body and are logged here.
    pub async fn fetch_object(&self, bucket: &str, key: &str) -> StoreResult<FetchedObject> {
        let stat = self.store.stat_object(bucket, key).await?;
        let mut body = self
            .store
            .get_object(bucket, key, stat.etag.as_deref())
            .await?;

        let first = match body.next().await {
            Some(Ok(chunk)) => Some(chunk),
            Some(Err(StoreError::Transfer(msg))) | Some(Err(StoreError::Internal(msg))) => {
                return Err(StoreError::Transfer(msg));
            }
            Some(Err(err)) => return Err(err),
            None => None,
        };

        let (bucket, key) = (bucket.to_string(), key.to_string());
        let rest = body.inspect_err(move |err| {
            error!(%bucket, %key, error = %err, "object stream failed after headers were sent");
        });

        Ok(FetchedObject {
            stat,
            body: stream::iter(first.map(Ok)).chain(rest).boxed(),
        })
    }

    /// Drain every page of the listing under `prefix`.
    ///
    /// Any failure discards what was accumulated so far.
    pub async fn list_objects(&self, bucket: &str, prefix: &str) -> StoreResult<Vec<ObjectEntry>> {
        self.store.list_objects(bucket, prefix).try_collect().await
    }
}
