// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Object storage access.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use flate2::read::MultiGzDecoder;
use std::io::Read;
use tracing::{debug, info};

use crate::constants::GZIP_SUFFIX;
use crate::error::StorageError;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>)
        -> Result<(), StorageError>;
}

/// Reads an object, transparently decompressing keys ending in `.gz`.
/// Every member of a multi-member gzip file is decoded.
pub async fn fetch_object(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
) -> Result<Vec<u8>, StorageError> {
    info!("S3LOGS | Processing file s3://{bucket}/{key}");
    let data = store.get_object(bucket, key).await?;
    if !key.ends_with(GZIP_SUFFIX) {
        return Ok(data);
    }

    let mut decompressed = Vec::new();
    MultiGzDecoder::new(data.as_slice())
        .read_to_end(&mut decompressed)
        .map_err(|source| StorageError::Decompress {
            key: key.to_string(),
            source,
        })?;
    debug!(
        "S3LOGS | Decompressed {} bytes into {} bytes",
        data.len(),
        decompressed.len()
    );
    Ok(decompressed)
}

/// [`ObjectStore`] backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    s3_client: S3Client,
}

impl S3ObjectStore {
    #[must_use]
    pub fn new(s3_client: S3Client) -> Self {
        Self { s3_client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let get_error = |message: String| StorageError::Get {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message,
        };

        let output = self
            .s3_client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| get_error(DisplayErrorContext(&err).to_string()))?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|err| get_error(err.to_string()))?;
        Ok(body.into_bytes().to_vec())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<(), StorageError> {
        self.s3_client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|err| StorageError::Put {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
            self.objects
                .lock()
                .unwrap()
                .get(&(bucket.to_string(), key.to_string()))
                .cloned()
                .ok_or_else(|| StorageError::Get {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                    message: "NoSuchKey".to_string(),
                })
        }

        async fn put_object(
            &self,
            bucket: &str,
            key: &str,
            body: Vec<u8>,
        ) -> Result<(), StorageError> {
            self.objects
                .lock()
                .unwrap()
                .insert((bucket.to_string(), key.to_string()), body);
            Ok(())
        }
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[tokio::test]
    async fn test_fetch_plain_object() {
        let store = MemoryStore::default();
        store
            .put_object("bucket", "logs/a.log", b"plain".to_vec())
            .await
            .unwrap();

        let data = fetch_object(&store, "bucket", "logs/a.log").await.unwrap();
        assert_eq!(data, b"plain");
    }

    #[tokio::test]
    async fn test_fetch_gzip_object() {
        let store = MemoryStore::default();
        store
            .put_object("bucket", "logs/a.gz", gzip(b"line 1\nline 2\n"))
            .await
            .unwrap();

        let data = fetch_object(&store, "bucket", "logs/a.gz").await.unwrap();
        assert_eq!(data, b"line 1\nline 2\n");
    }

    #[tokio::test]
    async fn test_fetch_multi_member_gzip_object() {
        let store = MemoryStore::default();
        let mut data = gzip(b"line 1\n");
        data.extend(gzip(b"line 2\n"));
        store
            .put_object("bucket", "logs/a.gz", data)
            .await
            .unwrap();

        let data = fetch_object(&store, "bucket", "logs/a.gz").await.unwrap();
        assert_eq!(data, b"line 1\nline 2\n");
    }

    #[tokio::test]
    async fn test_fetch_corrupt_gzip_object() {
        let store = MemoryStore::default();
        store
            .put_object("bucket", "logs/a.gz", b"not gzip".to_vec())
            .await
            .unwrap();

        let err = fetch_object(&store, "bucket", "logs/a.gz").await.unwrap_err();
        assert!(matches!(err, StorageError::Decompress { .. }));
    }

    #[tokio::test]
    async fn test_fetch_missing_object() {
        let store = MemoryStore::default();
        let err = fetch_object(&store, "bucket", "missing").await.unwrap_err();
        assert_eq!(err.to_string(), "failed to get s3://bucket/missing: NoSuchKey");
    }
}
