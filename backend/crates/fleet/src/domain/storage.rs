//! Object Storage
//!
//! The one thing the fleet needs from object storage is a pre-signed PUT URL
//! a client can upload to directly.

use kernel::error::app_error::AppResult;
use std::time::Duration;

#[trait_variant::make(ObjectStorage: Send)]
pub trait LocalObjectStorage {
    /// Pre-sign an upload of `key` into `bucket`, valid for `expiry`
    async fn presign_put(&self, bucket: &str, key: &str, expiry: Duration) -> AppResult<String>;
}
