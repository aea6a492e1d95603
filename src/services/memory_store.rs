//! In-memory [`ObjectStore`] used by the test suite.
//!
//! Paginates listings and chunks bodies like a real store would, counts every
//! call, and can be told to fail at specific points.

use crate::{
    models::object::{ObjectEntry, ObjectStat},
    services::store::{ByteStream, EntryStream, ObjectStore, StoreError, StoreResult},
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use futures::{StreamExt, TryStreamExt, stream};
use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

struct StoredObject {
    data: Bytes,
    content_type: Option<String>,
    etag: String,
}

pub struct MemoryStore {
    objects: BTreeMap<(String, String), StoredObject>,
    page_size: usize,
    chunk_size: usize,
    stat_fails: bool,
    stale_stat: bool,
    body_fails_after: Option<usize>,
    list_fails_after: Option<usize>,
    calls: AtomicUsize,
    pages_served: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            page_size: 1000,
            chunk_size: 64 * 1024,
            stat_fails: false,
            stale_stat: false,
            body_fails_after: None,
            list_fails_after: None,
            calls: AtomicUsize::new(0),
            pages_served: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_object(
        mut self,
        bucket: &str,
        key: &str,
        data: impl Into<Bytes>,
        content_type: Option<&str>,
    ) -> Self {
        let data = data.into();
        let etag = format!("{:x}", md5::compute(&data));
        self.objects.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data,
                content_type: content_type.map(str::to_string),
                etag,
            },
        );
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Metadata queries fail with an internal error.
    pub fn failing_stat(mut self) -> Self {
        self.stat_fails = true;
        self
    }

    /// Metadata queries report an outdated entity tag, as if the object was
    /// replaced right after being stat'ed.
    pub fn replaced_after_stat(mut self) -> Self {
        self.stale_stat = true;
        self
    }

    /// Object bodies break after `chunks` successful chunks.
    pub fn failing_body_after(mut self, chunks: usize) -> Self {
        self.body_fails_after = Some(chunks);
        self
    }

    /// Listings break after `pages` successful pages.
    pub fn failing_list_after(mut self, pages: usize) -> Self {
        self.list_fails_after = Some(pages);
        self
    }

    pub fn etag_of(&self, bucket: &str, key: &str) -> Option<String> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|obj| obj.etag.clone())
    }

    /// Number of store operations issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn pages_served(&self) -> usize {
        self.pages_served.load(Ordering::SeqCst)
    }

    fn lookup(&self, bucket: &str, key: &str) -> StoreResult<&StoredObject> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}

pub fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn stat_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectStat> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.stat_fails {
            return Err(StoreError::Internal("connection refused".into()));
        }
        let obj = self.lookup(bucket, key)?;
        Ok(ObjectStat {
            size: obj.data.len() as u64,
            content_type: obj.content_type.clone(),
            etag: Some(if self.stale_stat {
                "stale".to_string()
            } else {
                obj.etag.clone()
            }),
            last_modified: Some(fixed_timestamp()),
        })
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        if_match: Option<&str>,
    ) -> StoreResult<ByteStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let obj = self.lookup(bucket, key)?;
        if if_match.is_some_and(|etag| etag != obj.etag) {
            return Err(StoreError::Internal("precondition failed".into()));
        }

        let mut chunks: Vec<StoreResult<Bytes>> = Vec::new();
        let mut offset = 0;
        while offset < obj.data.len() {
            let end = (offset + self.chunk_size).min(obj.data.len());
            chunks.push(Ok(obj.data.slice(offset..end)));
            offset = end;
        }
        if let Some(after) = self.body_fails_after {
            chunks.truncate(after);
            chunks.push(Err(StoreError::Transfer("connection reset by peer".into())));
        }

        Ok(stream::iter(chunks).boxed())
    }

    fn list_objects(&self, bucket: &str, prefix: &str) -> EntryStream {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let entries: Vec<ObjectEntry> = self
            .objects
            .iter()
            .filter(|((b, k), _)| b == bucket && k.starts_with(prefix))
            .map(|((_, key), obj)| ObjectEntry {
                name: key.clone(),
                size: obj.data.len() as u64,
                last_modified: Some(fixed_timestamp()),
                etag: Some(obj.etag.clone()),
            })
            .collect();

        let mut pages: Vec<StoreResult<Vec<ObjectEntry>>> = entries
            .chunks(self.page_size)
            .map(|page| Ok(page.to_vec()))
            .collect();
        if let Some(after) = self.list_fails_after {
            pages.truncate(after);
            pages.push(Err(StoreError::Internal("listing interrupted".into())));
        }

        let served = self.pages_served.clone();
        stream::iter(pages)
            .inspect_ok(move |_| {
                served.fetch_add(1, Ordering::SeqCst);
            })
            .map_ok(|page| stream::iter(page.into_iter().map(Ok::<_, StoreError>)))
            .try_flatten()
            .boxed()
    }
}
