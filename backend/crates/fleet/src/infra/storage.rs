//! Object storage clients
//!
//! [`S3ObjectStorage`] speaks the S3 API with path-style addressing and
//! static keys, which is what MinIO expects. [`DisabledObjectStorage`]
//! stands in when storage is switched off.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use kernel::error::app_error::{AppError, AppResult};
use std::time::Duration;

use crate::application::config::StorageConfig;
use crate::domain::storage::ObjectStorage;

#[derive(Clone)]
pub struct S3ObjectStorage {
    client: Client,
}

impl S3ObjectStorage {
    /// Build a client for `config`
    ///
    /// No request is sent; a wrong endpoint only shows up when a client
    /// uses an issued URL.
    pub async fn connect(config: &StorageConfig) -> AppResult<Self> {
        for (field, value) in [
            ("MINIO_ENDPOINT", &config.endpoint),
            ("MINIO_ACCESS_KEY", &config.access_key),
            ("MINIO_SECRET_KEY", &config.secret_key),
            ("MINIO_BUCKET_NAME", &config.bucket_name),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::internal(format!(
                    "{field} is required when object storage is enabled"
                )));
            }
        }

        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "fleet-static",
        );
        let sdk = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(config.endpoint_url())
            .credentials_provider(credentials)
            .load()
            .await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk)
            .force_path_style(true)
            .build();

        tracing::info!(
            endpoint = %config.endpoint_url(),
            bucket = %config.bucket_name,
            region = %config.region,
            "Object storage client ready"
        );

        Ok(Self {
            client: Client::from_conf(s3_config),
        })
    }
}

impl ObjectStorage for S3ObjectStorage {
    async fn presign_put(&self, bucket: &str, key: &str, expiry: Duration) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(expiry).map_err(|e| {
            tracing::error!(error = %e, "Failed to create presigning config");
            AppError::internal("Failed to presign upload")
        })?;

        let presigned = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                tracing::error!(%bucket, %key, error = %e, "Failed to generate presigned URL");
                AppError::internal("Failed to presign upload")
            })?;

        Ok(presigned.uri().to_string())
    }
}

/// Storage that refuses every request
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledObjectStorage;

impl ObjectStorage for DisabledObjectStorage {
    async fn presign_put(&self, _bucket: &str, _key: &str, _expiry: Duration) -> AppResult<String> {
        Err(AppError::internal("object storage is not enabled"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_requires_settings() {
        let config = StorageConfig {
            enabled: true,
            endpoint: "127.0.0.1:9000".into(),
            ..Default::default()
        };
        let err = S3ObjectStorage::connect(&config).await.err().unwrap();
        assert!(err.message().contains("MINIO_ACCESS_KEY"));
    }

    #[tokio::test]
    async fn test_presign_put_is_offline() {
        let storage = S3ObjectStorage::connect(&StorageConfig::development())
            .await
            .unwrap();
        let url = storage
            .presign_put("pcd", "pcd/alice/1_a.pcd", Duration::from_secs(600))
            .await
            .unwrap();

        assert!(url.starts_with("http://127.0.0.1:9000/pcd/pcd/alice/1_a.pcd?"));
        assert!(url.contains("X-Amz-Expires=600"));
    }

    #[tokio::test]
    async fn test_disabled_storage_refuses() {
        let err = DisabledObjectStorage
            .presign_put("b", "k", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), kernel::ErrorKind::InternalServerError);
    }
}
