//! Object store abstraction for note attachments.

mod s3;

pub use s3::{S3Config, S3ObjectStore, DEFAULT_KEY_PREFIX, DEFAULT_URL_TTL_SECS};

use crate::error::{Error, Result};

/// Blob operations the note workflow needs from an object store.
#[allow(async_fn_in_trait)]
pub trait ObjectStore {
    /// Upload or overwrite the blob stored under `key`.
    async fn put(&self, key: &str, bytes: &[u8], content_type: Option<&str>) -> Result<()>;

    /// Resolve a fetchable URL for the blob stored under `key`.
    async fn resolve_url(&self, key: &str) -> Result<String>;

    /// Remove the blob stored under `key`.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Trim an object key and reject empty keys or parent-directory segments.
pub fn normalize_object_key(raw: &str) -> Result<String> {
    let key = raw.trim().trim_start_matches('/').to_string();
    if key.is_empty() {
        return Err(Error::InvalidInput(
            "Attachment object key cannot be empty".to_string(),
        ));
    }
    if key.split('/').any(|segment| segment == "..") {
        return Err(Error::InvalidInput(
            "Attachment object key must not contain path traversal segments".to_string(),
        ));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_object_key_rejects_empty_or_parent_segments() {
        assert!(normalize_object_key(" ").is_err());
        assert!(normalize_object_key("/").is_err());
        assert!(normalize_object_key("../a").is_err());
        assert!(normalize_object_key("notes/../a").is_err());
    }

    #[test]
    fn normalize_object_key_trims_prefix_slash() {
        assert_eq!(normalize_object_key("/notes/file.png").unwrap(), "notes/file.png");
        assert_eq!(normalize_object_key(" My Note ").unwrap(), "My Note");
    }

    #[test]
    fn normalize_object_key_allows_dots_inside_names() {
        assert_eq!(normalize_object_key("v1..final").unwrap(), "v1..final");
    }
}
