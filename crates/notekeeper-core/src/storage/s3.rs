//! S3-compatible object store for note attachments.

use std::time::Duration;

use aws_credential_types::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::{primitives::ByteStream, Client};
use aws_types::region::Region;

use super::{normalize_object_key, ObjectStore};
use crate::util::sanitize;
use crate::{Error, Result};

/// Key prefix applied to every attachment key unless configured otherwise.
pub const DEFAULT_KEY_PREFIX: &str = "public/";
/// Lifetime of presigned download URLs unless configured otherwise.
pub const DEFAULT_URL_TTL_SECS: u64 = 900;

/// S3 bucket configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct S3Config {
    /// Bucket name.
    pub bucket: String,
    /// Signing region.
    pub region: String,
    /// Custom S3-compatible endpoint; enables path-style addressing.
    pub endpoint_url: Option<String>,
    /// Access key id for request signing.
    pub access_key_id: String,
    /// Secret access key for request signing.
    pub secret_access_key: String,
    /// Prefix prepended to every attachment key.
    pub key_prefix: String,
    /// Optional public URL base; when set, URLs are not presigned.
    pub public_base_url: Option<String>,
    /// Lifetime of presigned download URLs.
    pub url_ttl: Duration,
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("key_prefix", &self.key_prefix)
            .field("public_base_url", &self.public_base_url)
            .field("url_ttl", &self.url_ttl)
            .finish()
    }
}

impl S3Config {
    /// Full object key for an attachment key, including the configured prefix.
    pub fn object_key(&self, key: &str) -> Result<String> {
        let key = normalize_object_key(key)?;
        Ok(format!("{}{key}", self.key_prefix))
    }
}

/// S3-backed attachment storage.
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    config: S3Config,
    client: Client,
}

impl S3ObjectStore {
    #[must_use]
    pub fn new(config: S3Config) -> Self {
        let client = build_s3_client(&config);
        Self { config, client }
    }

    #[must_use]
    pub const fn config(&self) -> &S3Config {
        &self.config
    }

    /// Check that the configured bucket is reachable with current credentials.
    pub async fn bucket_is_reachable(&self) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
            .map_err(|error| storage_error("head_bucket", &self.config.bucket, None, error))?;
        Ok(())
    }

    fn public_object_url(&self, object_key: &str) -> Option<String> {
        let base = self.config.public_base_url.as_ref()?;
        Some(format!("{base}/{}", object_key.trim_matches('/')))
    }

    async fn presigned_download_url(&self, object_key: &str) -> Result<String> {
        let presign_config = PresigningConfig::expires_in(self.config.url_ttl).map_err(|error| {
            Error::Config(format!("Invalid presign TTL: {}", sanitize(&error)))
        })?;

        let request = self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(object_key)
            .presigned(presign_config)
            .await
            .map_err(|error| {
                storage_error("presign_get_object", &self.config.bucket, Some(object_key), error)
            })?;

        Ok(request.uri().to_string())
    }
}

impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, bytes: &[u8], content_type: Option<&str>) -> Result<()> {
        let object_key = self.config.object_key(key)?;
        tracing::debug!(bucket = %self.config.bucket, key = %object_key, size = bytes.len(), "Uploading attachment");

        let mut request = self
            .client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&object_key)
            .body(ByteStream::from(bytes.to_vec()));

        if let Some(content_type) = normalize_content_type(content_type) {
            request = request.content_type(content_type);
        }

        request.send().await.map_err(|error| {
            storage_error("put_object", &self.config.bucket, Some(&object_key), error)
        })?;

        Ok(())
    }

    async fn resolve_url(&self, key: &str) -> Result<String> {
        let object_key = self.config.object_key(key)?;
        if let Some(url) = self.public_object_url(&object_key) {
            return Ok(url);
        }
        self.presigned_download_url(&object_key).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let object_key = self.config.object_key(key)?;
        tracing::debug!(bucket = %self.config.bucket, key = %object_key, "Deleting attachment");

        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(&object_key)
            .send()
            .await
            .map_err(|error| {
                storage_error(
                    "delete_object",
                    &self.config.bucket,
                    Some(&object_key),
                    error,
                )
            })?;

        Ok(())
    }
}

fn build_s3_client(config: &S3Config) -> Client {
    let credentials = Credentials::new(
        config.access_key_id.clone(),
        config.secret_access_key.clone(),
        None,
        None,
        "notekeeper-core-s3-storage",
    );

    let mut builder = aws_sdk_s3::config::Builder::new()
        .region(Region::new(config.region.clone()))
        .credentials_provider(credentials);

    if let Some(endpoint_url) = &config.endpoint_url {
        builder = builder.endpoint_url(endpoint_url).force_path_style(true);
    }

    Client::from_conf(builder.build())
}

fn storage_error(
    operation: &str,
    bucket: &str,
    object_key: Option<&str>,
    error: impl std::fmt::Display,
) -> Error {
    let target = object_key.map_or_else(|| bucket.to_string(), |key| format!("{bucket}/{key}"));
    Error::Storage(format!("S3 {operation} failed for {target}: {error}"))
}

fn normalize_content_type(content_type: Option<&str>) -> Option<String> {
    content_type
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> S3Config {
        S3Config {
            bucket: "notes-bucket".to_string(),
            region: "us-east-1".to_string(),
            endpoint_url: Some("https://s3.example.com".to_string()),
            access_key_id: "AKID123".to_string(),
            secret_access_key: "SECRET123".to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            public_base_url: None,
            url_ttl: Duration::from_secs(DEFAULT_URL_TTL_SECS),
        }
    }

    #[test]
    fn object_key_applies_prefix() {
        let config = test_config();
        assert_eq!(config.object_key("/Groceries").unwrap(), "public/Groceries");
        assert!(config.object_key("  ").is_err());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", test_config());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("SECRET123"));
    }

    #[test]
    fn normalize_content_type_ignores_empty_values() {
        assert_eq!(normalize_content_type(None), None);
        assert_eq!(normalize_content_type(Some("   ")), None);
        assert_eq!(
            normalize_content_type(Some(" image/png ")),
            Some("image/png".to_string())
        );
    }

    #[tokio::test]
    async fn resolve_url_uses_public_base_when_configured() {
        let mut config = test_config();
        config.public_base_url = Some("https://cdn.example.com/media".to_string());
        let store = S3ObjectStore::new(config);

        let url = store.resolve_url("A").await.unwrap();
        assert_eq!(url, "https://cdn.example.com/media/public/A");
    }

    #[tokio::test]
    async fn resolve_url_presigns_download_locally() {
        let store = S3ObjectStore::new(test_config());

        let url = store.resolve_url("A").await.unwrap();
        assert!(url.starts_with("https://s3.example.com/notes-bucket/public/A?"));
        assert!(url.contains("X-Amz-Expires=900"));
        assert!(url.contains("X-Amz-Signature="));
    }

    #[tokio::test(flavor = "multi_thread")]
    #[ignore = "Requires NOTEKEEPER_S3_* env vars plus network access"]
    async fn s3_object_roundtrip_upload_resolve_delete() {
        let _ = dotenvy::dotenv();

        let config = crate::config::BackendConfig::from_env()
            .expect("backend config should load")
            .storage;
        let store = S3ObjectStore::new(config);

        store
            .bucket_is_reachable()
            .await
            .unwrap_or_else(|error| panic!("bucket health check failed: {error}"));

        store
            .put("integration-roundtrip", b"s3-roundtrip-test", Some("text/plain"))
            .await
            .unwrap_or_else(|error| panic!("upload failed: {error}"));
        let url = store
            .resolve_url("integration-roundtrip")
            .await
            .unwrap_or_else(|error| panic!("resolve failed: {error}"));
        assert!(url.contains("integration-roundtrip"));
        store
            .delete("integration-roundtrip")
            .await
            .unwrap_or_else(|error| panic!("delete failed: {error}"));
    }
}
