//! Object-store access for the fetcher and writer: an
//! `ObjectStorage` trait backed by S3/MinIO, plus the directory-level
//! fetch/upload helpers the driver calls directly.

pub mod fetch;
pub mod object_storage;
pub mod uri;

pub use fetch::{download_pdfs, upload_directory};
pub use object_storage::{ObjectStorage, S3Config, S3ObjectStorage};
pub use uri::S3Uri;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("S3 error: {0}")]
    S3(String),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;
