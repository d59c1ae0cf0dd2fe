//! Application Configuration
//!
//! Object storage settings for PCD uploads (S3 API, MinIO compatible).

/// Object storage configuration
#[derive(Clone)]
pub struct StorageConfig {
    /// When false, upload tokens are refused
    pub enabled: bool,
    /// `host:port`, or a full URL with scheme
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub use_ssl: bool,
    pub bucket_name: String,
    pub region: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            use_ssl: false,
            bucket_name: String::new(),
            region: "us-east-1".to_string(),
        }
    }
}

impl StorageConfig {
    /// Local MinIO with its stock credentials
    pub fn development() -> Self {
        Self {
            enabled: true,
            endpoint: "127.0.0.1:9000".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            bucket_name: "pcd".to_string(),
            ..Default::default()
        }
    }

    /// Endpoint with a scheme; `use_ssl` picks it when none is given
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
            return self.endpoint.clone();
        }
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}", scheme, self.endpoint)
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("enabled", &self.enabled)
            .field("endpoint", &self.endpoint)
            .field("access_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("use_ssl", &self.use_ssl)
            .field("bucket_name", &self.bucket_name)
            .field("region", &self.region)
            .finish()
    }
}
