//! PCD upload tokens
//!
//! Clients upload point-cloud files straight to object storage with a
//! pre-signed PUT URL; the API never proxies the bytes.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::application::config::StorageConfig;
use crate::application::rules;
use crate::domain::storage::ObjectStorage;
use crate::error::{FleetError, FleetResult};

/// Lifetime of every issued upload URL
pub const UPLOAD_URL_EXPIRY: Duration = Duration::from_secs(10 * 60);

/// Owner segment used when the caller has no bound identity
pub const UNKNOWN_UPLOADER: &str = "unknown";

pub struct UploadTokenInput {
    pub file_name: String,
    pub size: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadToken {
    pub upload_url: String,
    pub bucket: String,
    pub object_key: String,
    /// Unix seconds
    pub expire_at: i64,
}

pub struct UploadTokenIssuer<S>
where
    S: ObjectStorage,
{
    storage: Arc<S>,
    config: Arc<StorageConfig>,
}

impl<S> UploadTokenIssuer<S>
where
    S: ObjectStorage,
{
    pub fn new(storage: Arc<S>, config: Arc<StorageConfig>) -> Self {
        Self { storage, config }
    }

    pub async fn issue(
        &self,
        input: UploadTokenInput,
        user_name: Option<&str>,
    ) -> FleetResult<UploadToken> {
        self.issue_at(input, user_name, Utc::now()).await
    }

    pub async fn issue_at(
        &self,
        input: UploadTokenInput,
        user_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> FleetResult<UploadToken> {
        if !self.config.enabled {
            return Err(FleetError::StorageDisabled);
        }

        let file_name = rules::required("fileName", &input.file_name)?;
        if file_name.contains('/') {
            return Err(FleetError::Validation(
                "fileName must not contain '/'".to_string(),
            ));
        }
        rules::size(input.size)?;

        let owner = match user_name.map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_UPLOADER,
        };
        let object_key = object_key(owner, now.timestamp(), &file_name);
        let bucket = self.config.bucket_name.clone();

        let upload_url = self
            .storage
            .presign_put(&bucket, &object_key, UPLOAD_URL_EXPIRY)
            .await?;

        tracing::info!(%bucket, %object_key, size = input.size, "Upload token issued");

        Ok(UploadToken {
            upload_url,
            bucket,
            object_key,
            expire_at: now.timestamp() + UPLOAD_URL_EXPIRY.as_secs() as i64,
        })
    }
}

/// `pcd/{owner}/{unix_seconds}_{file_name}`
fn object_key(owner: &str, unix_seconds: i64, file_name: &str) -> String {
    format!("pcd/{owner}/{unix_seconds}_{file_name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::storage::DisabledObjectStorage;
    use chrono::TimeZone;
    use kernel::error::app_error::{AppError, AppResult};
    use std::sync::Mutex;

    /// Records every presign call and answers a fake URL
    #[derive(Default)]
    struct RecordingStorage {
        calls: Mutex<Vec<(String, String, Duration)>>,
    }

    impl ObjectStorage for RecordingStorage {
        async fn presign_put(&self, bucket: &str, key: &str, expiry: Duration) -> AppResult<String> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push((bucket.to_string(), key.to_string(), expiry));
            }
            Ok(format!("http://storage.test/{bucket}/{key}?sig=abc"))
        }
    }

    struct FailingStorage;

    impl ObjectStorage for FailingStorage {
        async fn presign_put(&self, _: &str, _: &str, _: Duration) -> AppResult<String> {
            Err(AppError::internal("Failed to presign upload"))
        }
    }

    fn config() -> Arc<StorageConfig> {
        Arc::new(StorageConfig {
            enabled: true,
            bucket_name: "pcd".into(),
            ..Default::default()
        })
    }

    fn input(file_name: &str) -> UploadTokenInput {
        UploadTokenInput {
            file_name: file_name.to_string(),
            size: 1024,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[tokio::test]
    async fn test_issue_builds_key_and_expiry() {
        let storage = Arc::new(RecordingStorage::default());
        let issuer = UploadTokenIssuer::new(storage.clone(), config());

        let token = issuer
            .issue_at(input("scan.pcd"), Some("alice"), fixed_now())
            .await
            .unwrap();

        assert_eq!(token.bucket, "pcd");
        assert_eq!(token.object_key, "pcd/alice/1700000000_scan.pcd");
        assert_eq!(token.expire_at, 1_700_000_600);
        assert!(token.upload_url.starts_with("http://storage.test/pcd/"));

        let calls = storage.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].2, UPLOAD_URL_EXPIRY);
    }

    #[tokio::test]
    async fn test_missing_user_name_falls_back_to_unknown() {
        let issuer = UploadTokenIssuer::new(Arc::new(RecordingStorage::default()), config());

        for user in [None, Some(""), Some("  ")] {
            let token = issuer
                .issue_at(input("a.pcd"), user, fixed_now())
                .await
                .unwrap();
            assert_eq!(token.object_key, "pcd/unknown/1700000000_a.pcd");
        }
    }

    #[tokio::test]
    async fn test_disabled_storage_is_refused() {
        let issuer = UploadTokenIssuer::new(
            Arc::new(DisabledObjectStorage),
            Arc::new(StorageConfig::default()),
        );
        let err = issuer.issue(input("a.pcd"), Some("alice")).await.unwrap_err();
        assert!(matches!(err, FleetError::StorageDisabled));
    }

    #[tokio::test]
    async fn test_validation() {
        let issuer = UploadTokenIssuer::new(Arc::new(RecordingStorage::default()), config());

        assert!(matches!(
            issuer.issue(input(""), None).await,
            Err(FleetError::Validation(_))
        ));
        assert!(matches!(
            issuer.issue(input("../x.pcd"), None).await,
            Err(FleetError::Validation(_))
        ));
        let negative = UploadTokenInput {
            file_name: "a.pcd".into(),
            size: -1,
        };
        assert!(matches!(
            issuer.issue(negative, None).await,
            Err(FleetError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_presign_failure_is_internal() {
        let issuer = UploadTokenIssuer::new(Arc::new(FailingStorage), config());
        let err = issuer.issue(input("a.pcd"), None).await.unwrap_err();
        assert_eq!(err.kind(), kernel::ErrorKind::InternalServerError);
    }
}
