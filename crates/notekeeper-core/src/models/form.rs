//! Validated note creation input

use crate::error::{Error, Result};

use super::attachment::AttachmentFile;
use super::note::CreateNoteInput;

/// Fields submitted to create a note.
///
/// Construction trims and validates `name` and `description`; a form that
/// exists is always submittable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteForm {
    name: String,
    description: String,
    attachment: Option<AttachmentFile>,
}

impl NoteForm {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        attachment: Option<AttachmentFile>,
    ) -> Result<Self> {
        let name = name.into().trim().to_string();
        let description = description.into().trim().to_string();

        if name.is_empty() {
            return Err(Error::InvalidInput("Note name cannot be empty".to_string()));
        }
        if description.is_empty() {
            return Err(Error::InvalidInput(
                "Note description cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            name,
            description,
            attachment,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn attachment(&self) -> Option<&AttachmentFile> {
        self.attachment.as_ref()
    }

    /// Split into the remote create payload and the file to upload.
    #[must_use]
    pub fn into_parts(self) -> (CreateNoteInput, Option<AttachmentFile>) {
        let image = self.attachment.as_ref().map(|_| self.name.clone());
        (
            CreateNoteInput {
                name: self.name,
                description: self.description,
                image,
            },
            self.attachment,
        )
    }
}
