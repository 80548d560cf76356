//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// An opaque note identifier assigned by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NoteId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("Note ID cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A note as stored by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,
    /// Note name; also the storage key of its attachment
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Object store key of the attached image, if any
    #[serde(rename = "image", default)]
    pub attachment_key: Option<String>,
    /// Server creation timestamp (ISO-8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Server update timestamp (ISO-8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Fetchable URL for the attachment, filled in by list resolution only
    #[serde(skip)]
    pub resolved_attachment_url: Option<String>,
}

impl Note {
    /// Whether the note references a blob in the object store
    #[must_use]
    pub const fn has_attachment(&self) -> bool {
        self.attachment_key.is_some()
    }

    /// Get the description as a single-line preview, truncated to `max_len` characters
    #[must_use]
    pub fn description_preview(&self, max_len: usize) -> String {
        self.description
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .take(max_len)
            .collect()
    }
}

/// Payload for the remote `createNote` mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNoteInput {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
}
