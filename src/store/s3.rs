//! AWS S3 storage backend
//!
//! Works against any S3-compatible endpoint (AWS, ArvanCloud, MinIO, ...)
//! using the connection profile's endpoint, region, and inline credentials.

use super::{classify, ObjectStore, StoreError};
use crate::config::ConnectionConfig;
use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration, ObjectCannedAcl};
use aws_sdk_s3::Client;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// S3-compatible storage backend
pub struct S3Store {
    client: Client,
    config: ConnectionConfig,
}

impl S3Store {
    /// Create a new S3 backend from a connection profile.
    ///
    /// Building the client performs no network call; authentication is only
    /// exercised by the first operation.
    pub async fn new(config: ConnectionConfig) -> Result<Self, StoreError> {
        let credentials = aws_sdk_s3::config::Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "s3m-profile",
        );

        let aws_config = aws_config::from_env()
            .region(aws_config::Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials)
            .load()
            .await;

        let client = Client::new(&aws_config);

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_buckets(&self) -> Result<Vec<String>, StoreError> {
        let response = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(classify_sdk)?;

        Ok(response
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(String::from))
            .collect())
    }

    async fn create_bucket(&self, name: &str) -> Result<(), StoreError> {
        let mut request = self.client.create_bucket().bucket(name);

        // The provider's default region must not carry an explicit
        // location constraint; every other region requires one.
        if self.config.needs_location_constraint() {
            let constraint = BucketLocationConstraint::from(self.config.region.as_str());
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(constraint)
                    .build(),
            );
        }

        request.send().await.map_err(classify_sdk)?;
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(classify_sdk)?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|o| o.key().map(String::from)),
            );
        }

        Ok(keys)
    }

    async fn upload(&self, bucket: &str, key: &str, source: &Path) -> Result<u64, StoreError> {
        let size = tokio::fs::metadata(source).await?.len();

        let body = ByteStream::from_path(source)
            .await
            .map_err(|e| StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .acl(ObjectCannedAcl::Private)
            .content_type("application/octet-stream")
            .send()
            .await
            .map_err(classify_sdk)?;

        Ok(size)
    }

    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64, StoreError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(classify_sdk)?;

        // Ensure the destination directory exists
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Other(e.to_string()))?;

        let bytes = body.into_bytes();
        let size = bytes.len() as u64;

        let mut file = File::create(dest).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;

        Ok(size)
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(classify_sdk)?;

        Ok(())
    }

    fn provider_name(&self) -> &str {
        self.config.provider.display_name()
    }
}

/// Map an SDK failure onto the `StoreError` taxonomy via its error code.
fn classify_sdk<E>(err: SdkError<E>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let code = err.code().map(String::from);
    let message = match err.message() {
        Some(m) => m.to_string(),
        // No service-level message (e.g. connection failures): keep the
        // full error chain so endpoint/DNS problems stay diagnosable.
        None => DisplayErrorContext(&err).to_string(),
    };

    classify(code.as_deref(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Provider;

    fn config(provider: Provider, region: &str) -> ConnectionConfig {
        ConnectionConfig {
            provider,
            endpoint: "http://localhost:9000".to_string(),
            region: region.to_string(),
            access_key_id: "key".to_string(),
            secret_access_key: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_client_builds_without_network() {
        let store = S3Store::new(config(Provider::Custom, "us-east-1")).await;
        assert!(store.is_ok());
    }

    #[tokio::test]
    async fn test_provider_name_comes_from_config() {
        let store = S3Store::new(config(Provider::ArvanCloud, "ir-thr-at1"))
            .await
            .unwrap();
        assert_eq!(store.provider_name(), "ArvanCloud");
    }
}
