//! Attachment file handle

use std::path::Path;

use crate::error::{Error, Result};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// An attachment selected for upload, held fully in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct AttachmentFile {
    /// Original file name.
    pub file_name: String,
    /// Content MIME type.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl AttachmentFile {
    /// Build an attachment from raw bytes, guessing the content type from the file name.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into().trim().to_string();
        if file_name.is_empty() {
            return Err(Error::InvalidInput(
                "Attachment file name cannot be empty".to_string(),
            ));
        }
        if bytes.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Attachment '{file_name}' is empty"
            )));
        }

        let content_type = guess_content_type(&file_name);
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    /// Read an attachment from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Attachment path has no usable file name: {}",
                    path.display()
                ))
            })?;
        let bytes = tokio::fs::read(path).await?;
        Self::new(file_name, bytes)
    }

    /// Attachment size in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

impl std::fmt::Debug for AttachmentFile {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AttachmentFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

fn guess_content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_guesses_content_type() {
        let file = AttachmentFile::new("pic.png", vec![1, 2, 3]).unwrap();
        assert_eq!(file.content_type, "image/png");
        assert_eq!(file.size_bytes(), 3);
    }

    #[test]
    fn test_attachment_unknown_extension_falls_back() {
        let file = AttachmentFile::new("blob.zzzunknown", vec![1]).unwrap();
        assert_eq!(file.content_type, DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_attachment_validation() {
        assert!(AttachmentFile::new("  ", vec![1]).is_err());
        assert!(AttachmentFile::new("pic.png", Vec::new()).is_err());
    }

    #[tokio::test]
    async fn test_attachment_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"jpeg-bytes").unwrap();

        let file = AttachmentFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "photo.jpg");
        assert_eq!(file.content_type, "image/jpeg");
        assert_eq!(file.bytes, b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_attachment_from_missing_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AttachmentFile::from_path(dir.path().join("missing.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
