//! Parsing for `s3://bucket/key` URIs accepted by `--s3-input`/`--s3-output`.

use crate::StorageError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Uri {
    pub bucket: String,
    /// Key or key prefix; empty string means "the whole bucket".
    pub key: String,
}

impl S3Uri {
    pub fn parse(uri: &str) -> Result<Self, StorageError> {
        let rest = uri
            .strip_prefix("s3://")
            .ok_or_else(|| StorageError::InvalidConfig(format!("not an s3:// URI: {uri}")))?;
        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(StorageError::InvalidConfig(format!("missing bucket in: {uri}")));
        }
        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}
