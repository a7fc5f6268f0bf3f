//! Storage collaborators
//!
//! Provides a trait for object storage operations and the S3 implementation.
//! Everything network-facing lives behind this seam; the session state
//! machine never sees it.

pub mod s3;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

pub use s3::S3Store;

use crate::config::ConnectionConfig;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bucket name is already taken: {0}")]
    AlreadyExists(String),

    #[error("Provider rejected bucket name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Other(String),
}

/// Discriminate a provider error by its error code.
///
/// Codes the S3 protocol defines are mapped to specific variants; anything
/// unrecognized folds into `Other` with the message preserved.
pub fn classify(code: Option<&str>, message: String) -> StoreError {
    match code {
        Some("BucketAlreadyExists") | Some("BucketAlreadyOwnedByYou") => {
            StoreError::AlreadyExists(message)
        }
        Some("InvalidBucketName") => StoreError::InvalidName(message),
        Some("NoSuchKey") | Some("NoSuchBucket") | Some("NotFound") => {
            StoreError::NotFound(message)
        }
        Some("InvalidAccessKeyId")
        | Some("SignatureDoesNotMatch")
        | Some("AccessDenied")
        | Some("AuthorizationHeaderMalformed") => StoreError::Auth(message),
        _ => StoreError::Other(message),
    }
}

/// Trait for object storage backends
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Authenticate and list all buckets
    async fn list_buckets(&self) -> Result<Vec<String>, StoreError>;

    /// Create a bucket (location constraint handling is the backend's job)
    async fn create_bucket(&self, name: &str) -> Result<(), StoreError>;

    /// List object keys in a bucket
    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>, StoreError>;

    /// Upload a local file, returning the number of bytes sent
    async fn upload(&self, bucket: &str, key: &str, source: &Path) -> Result<u64, StoreError>;

    /// Download an object to a local path, returning the number of bytes written
    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64, StoreError>;

    /// Delete an object
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StoreError>;

    /// Get the storage provider name
    fn provider_name(&self) -> &str;
}

/// Create a storage backend for a connection profile.
pub async fn create_store(config: &ConnectionConfig) -> Result<Box<dyn ObjectStore>, StoreError> {
    let store = S3Store::new(config.clone()).await?;
    Ok(Box::new(store))
}
