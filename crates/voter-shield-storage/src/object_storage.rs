//! Object storage implementation using S3/MinIO.
//!
//! Backs the fetcher's input sync and the writer's optional output upload
//! with a single `ObjectStorage` trait and `S3Config`/`S3ObjectStorage`
//! construction, including the MinIO `endpoint_url` + `force_path_style`
//! pattern for non-AWS-hosted deployments.

use crate::{StorageError, StorageResult};
use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    Client,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// S3/MinIO configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    /// AWS region, or `"us-east-1"` for MinIO.
    pub region: String,
    /// Custom endpoint for MinIO; empty for AWS S3.
    pub endpoint: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Path prefix applied to every key.
    pub prefix: String,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: std::env::var("AWS_DEFAULT_REGION").unwrap_or_else(|_| "us-east-1".into()),
            endpoint: std::env::var("AWS_ENDPOINT_URL").ok(),
            access_key_id: std::env::var("AWS_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
            prefix: String::new(),
        }
    }
}

#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn store_file(&self, key: &str, data: &[u8]) -> StorageResult<String>;
    async fn store_file_from_path(&self, key: &str, path: &Path) -> StorageResult<String>;
    async fn retrieve_file(&self, key: &str) -> StorageResult<Vec<u8>>;
    async fn retrieve_file_to_path(&self, key: &str, path: &Path) -> StorageResult<()>;
    async fn list_files(&self, prefix: &str) -> StorageResult<Vec<String>>;
    async fn file_exists(&self, key: &str) -> StorageResult<bool>;
}

/// S3/MinIO object storage implementation.
pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3ObjectStorage {
    pub async fn new(config: S3Config) -> StorageResult<Self> {
        if config.bucket.is_empty() {
            return Err(StorageError::InvalidConfig("bucket must not be empty".into()));
        }

        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "voter-shield-storage",
        );
        let region = Region::new(config.region.clone());

        let mut builder = aws_sdk_s3::Config::builder()
            .credentials_provider(credentials)
            .region(region)
            .behavior_version_latest();

        if let Some(endpoint) = config.endpoint {
            // Required for MinIO-style path-addressed buckets.
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        Ok(Self {
            client,
            bucket: config.bucket,
            prefix: config.prefix,
        })
    }

    fn full_key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}{}", self.prefix.trim_end_matches('/'), format_args!("/{key}"))
        }
    }
}

#[async_trait::async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn store_file(&self, key: &str, data: &[u8]) -> StorageResult<String> {
        let full_key = self.full_key(key);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&full_key)
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;
        Ok(full_key)
    }

    async fn store_file_from_path(&self, key: &str, path: &Path) -> StorageResult<String> {
        let data = tokio::fs::read(path).await?;
        self.store_file(key, &data).await
    }

    async fn retrieve_file(&self, key: &str) -> StorageResult<Vec<u8>> {
        let full_key = self.full_key(key);
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&full_key)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("NoSuchKey") {
                    StorageError::NotFound(full_key.clone())
                } else {
                    StorageError::S3(e.to_string())
                }
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn retrieve_file_to_path(&self, key: &str, path: &Path) -> StorageResult<()> {
        let data = self.retrieve_file(key).await?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, data).await?;
        Ok(())
    }

    async fn list_files(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let full_prefix = self.full_key(prefix);
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut req = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&full_prefix);
            if let Some(token) = continuation.take() {
                req = req.continuation_token(token);
            }
            let response = req.send().await.map_err(|e| StorageError::S3(e.to_string()))?;

            keys.extend(
                response
                    .contents()
                    .iter()
                    .filter_map(|obj| obj.key().map(str::to_string)),
            );

            if response.is_truncated().unwrap_or(false) {
                continuation = response.next_continuation_token().map(str::to_string);
            } else {
                break;
            }
        }

        Ok(keys)
    }

    async fn file_exists(&self, key: &str) -> StorageResult<bool> {
        let full_key = self.full_key(key);
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(&full_key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.to_string().contains("NotFound") => Ok(false),
            Err(e) => Err(StorageError::S3(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_key_joins_prefix_and_key() {
        let storage = S3ObjectStorage {
            client: Client::from_conf(aws_sdk_s3::Config::builder().behavior_version_latest().build()),
            bucket: "bucket".into(),
            prefix: "voter-shield/".into(),
        };
        assert_eq!(storage.full_key("input/test.pdf"), "voter-shield/input/test.pdf");
    }

    #[test]
    fn full_key_without_prefix_is_unchanged() {
        let storage = S3ObjectStorage {
            client: Client::from_conf(aws_sdk_s3::Config::builder().behavior_version_latest().build()),
            bucket: "bucket".into(),
            prefix: String::new(),
        };
        assert_eq!(storage.full_key("test.pdf"), "test.pdf");
    }
}
