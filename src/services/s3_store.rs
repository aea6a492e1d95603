//! [`ObjectStore`] backed by an S3-compatible server (MinIO, AWS, ...).

use crate::{
    config::StoreConfig,
    models::object::{ObjectEntry, ObjectStat},
    services::store::{ByteStream, EntryStream, ObjectStore, StoreError, StoreResult},
};
use async_trait::async_trait;
use aws_sdk_s3::{
    Client, Config as S3Config,
    config::{BehaviorVersion, Credentials, Region, retry::RetryConfig},
    error::{DisplayErrorContext, SdkError},
    primitives::DateTime as SmithyDateTime,
};
use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt, stream};
use std::error::Error as StdError;
use tracing::{debug, info, warn};

#[derive(Clone, Debug)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(config: &StoreConfig) -> Self {
        let endpoint = config.endpoint_url();
        info!("Initializing object store client for {}", endpoint);

        if config.access_key.is_none() || config.secret_key.is_none() {
            warn!("MINIO_ACCESS_KEY / MINIO_SECRET_KEY not set; requests will be signed with empty credentials");
        }

        let credentials = Credentials::new(
            config.access_key.clone().unwrap_or_default(),
            config.secret_key.clone().unwrap_or_default(),
            None,
            None,
            "bucket-gateway",
        );

        let s3_config = S3Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(config.region.clone()))
            .endpoint_url(endpoint)
            .force_path_style(true)
            .retry_config(RetryConfig::disabled())
            .build();

        Self {
            client: Client::from_conf(s3_config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn stat_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectStat> {
        debug!(bucket, key, "head_object");
        let output = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| match err {
                SdkError::ServiceError(ref ctx)
                    if ctx.err().is_not_found() || ctx.err().meta().code() == Some("NoSuchKey") =>
                {
                    not_found(bucket, key)
                }
                other => internal(other),
            })?;

        Ok(ObjectStat {
            size: output.content_length().unwrap_or_default().max(0) as u64,
            content_type: output.content_type().map(str::to_string),
            etag: output.e_tag().map(unquote_etag),
            last_modified: output.last_modified().and_then(to_chrono),
        })
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        if_match: Option<&str>,
    ) -> StoreResult<ByteStream> {
        debug!(bucket, key, if_match, "get_object");
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .set_if_match(if_match.map(|etag| format!("\"{}\"", etag)))
            .send()
            .await
            .map_err(|err| match err {
                SdkError::ServiceError(ref ctx) if ctx.err().is_no_such_key() => {
                    not_found(bucket, key)
                }
                other => internal(other),
            })?;

        let body = stream::unfold(output.body, |mut body| async move {
            body.next()
                .await
                .map(|chunk| (chunk.map_err(|err| StoreError::Transfer(err.to_string())), body))
        });

        Ok(body.boxed())
    }

    fn list_objects(&self, bucket: &str, prefix: &str) -> EntryStream {
        debug!(bucket, prefix, "list_objects_v2");
        let prefix = (!prefix.is_empty()).then(|| prefix.to_string());
        let pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .set_prefix(prefix)
            .into_paginator()
            .send();

        stream::unfold(pages, |mut pages| async move {
            pages.next().await.map(|page| (page, pages))
        })
        .map_err(internal)
        .map_ok(|page| {
            let entries: Vec<StoreResult<ObjectEntry>> = page
                .contents()
                .iter()
                .map(|obj| {
                    Ok(ObjectEntry {
                        name: obj.key().unwrap_or_default().to_string(),
                        size: obj.size().unwrap_or_default().max(0) as u64,
                        last_modified: obj.last_modified().and_then(to_chrono),
                        etag: obj.e_tag().map(unquote_etag),
                    })
                })
                .collect();
            stream::iter(entries)
        })
        .try_flatten()
        .boxed()
    }
}

fn not_found(bucket: &str, key: &str) -> StoreError {
    StoreError::NotFound {
        bucket: bucket.to_string(),
        key: key.to_string(),
    }
}

fn internal<E>(err: E) -> StoreError
where
    E: StdError,
{
    StoreError::Internal(DisplayErrorContext(err).to_string())
}

/// S3 reports entity tags wrapped in double quotes; keep them opaque and bare.
fn unquote_etag(etag: &str) -> String {
    etag.trim_matches('"').to_string()
}

fn to_chrono(ts: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}
