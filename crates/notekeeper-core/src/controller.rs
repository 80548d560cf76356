//! In-memory note list kept in step with the remote API and object store.
//!
//! The list mirrors the last successful `fetch_all`. Deletes remove the note
//! locally before any remote call is made and put it back if a remote call
//! fails. A note's `image` field only marks that it has an attachment; the
//! blob itself is stored under the note's name. Attachment URLs are resolved
//! concurrently and each failure stays attached to its own note.

use futures::future::join_all;
use tokio::sync::Mutex;

use crate::api::NoteApi;
use crate::error::Result;
use crate::models::{Note, NoteForm, NoteId};
use crate::storage::ObjectStore;

/// An attachment whose URL could not be resolved during a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentFailure {
    pub note_id: NoteId,
    pub key: String,
    pub message: String,
}

/// Outcome of a successful list refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Notes now in the list.
    pub total: usize,
    /// Notes whose attachment URL was resolved.
    pub resolved: usize,
    /// Attachments left unresolved; their notes are still listed.
    pub failures: Vec<AttachmentFailure>,
}

impl FetchReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Owns the note list shown to the user and the clients that back it.
pub struct NoteListController<A, S> {
    api: A,
    store: S,
    notes: Mutex<Option<Vec<Note>>>,
}

impl<A: NoteApi, S: ObjectStore> NoteListController<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            notes: Mutex::new(None),
        }
    }

    /// Snapshot of the current list. Empty until the first refresh.
    pub async fn notes(&self) -> Vec<Note> {
        self.notes.lock().await.clone().unwrap_or_default()
    }

    /// Replace the list with the remote notes and their resolved attachment URLs.
    ///
    /// A failed listing leaves the current list untouched. A failed attachment
    /// resolution only leaves that note without a URL and is reported.
    pub async fn fetch_all(&self) -> Result<FetchReport> {
        let mut notes = self.api.list_notes().await?;
        let failures = self.resolve_attachments(&mut notes).await;

        for failure in &failures {
            tracing::warn!(
                note_id = %failure.note_id,
                key = %failure.key,
                "Failed to resolve attachment URL: {}",
                failure.message
            );
        }

        let report = FetchReport {
            total: notes.len(),
            resolved: notes
                .iter()
                .filter(|note| note.resolved_attachment_url.is_some())
                .count(),
            failures,
        };

        *self.notes.lock().await = Some(notes);
        tracing::info!(
            total = report.total,
            resolved = report.resolved,
            unresolved = report.failures.len(),
            "Note list refreshed"
        );
        Ok(report)
    }

    /// Upload the form's attachment (if any), create the record, then refresh the list.
    ///
    /// The upload happens before the record is created so a stored note never
    /// points at a missing blob. A failed create leaves the uploaded blob behind.
    pub async fn create(&self, form: NoteForm) -> Result<Note> {
        let (input, attachment) = form.into_parts();

        if let Some(file) = &attachment {
            let key = input.name.as_str();
            self.store
                .put(key, &file.bytes, Some(&file.content_type))
                .await?;
            tracing::debug!(key, size = file.size_bytes(), "Attachment uploaded");
        }

        let created = self.api.create_note(&input).await?;
        tracing::info!(note_id = %created.id, "Note created");

        self.fetch_all().await?;
        Ok(created)
    }

    /// Remove a note locally, then delete its attachment and record remotely.
    ///
    /// The attachment lives under the note's name. If either remote call fails
    /// the note is restored to its previous position and the error is returned.
    pub async fn delete(&self, note: &Note) -> Result<()> {
        let id = &note.id;
        let removed = self.remove_local(id).await;
        let attachment_key = note.has_attachment().then_some(note.name.as_str());

        let outcome = self.delete_remote(id, attachment_key).await;
        match (&outcome, removed) {
            (Err(error), Some((index, removed_note))) => {
                tracing::warn!(note_id = %id, "Delete failed, restoring note: {}", error);
                self.restore_local(index, removed_note).await;
            }
            (Ok(()), _) => tracing::info!(note_id = %id, "Note deleted"),
            (Err(_), None) => {}
        }
        outcome
    }

    async fn resolve_attachments(&self, notes: &mut [Note]) -> Vec<AttachmentFailure> {
        let store = &self.store;
        let resolutions = notes
            .iter_mut()
            .filter(|note| note.has_attachment())
            .map(|note| async move {
                let key = note.name.clone();
                match store.resolve_url(&key).await {
                    Ok(url) => {
                        note.resolved_attachment_url = Some(url);
                        None
                    }
                    Err(error) => {
                        note.resolved_attachment_url = None;
                        Some(AttachmentFailure {
                            note_id: note.id.clone(),
                            key,
                            message: error.to_string(),
                        })
                    }
                }
            });

        join_all(resolutions).await.into_iter().flatten().collect()
    }

    async fn remove_local(&self, id: &NoteId) -> Option<(usize, Note)> {
        let mut guard = self.notes.lock().await;
        let notes = guard.as_mut()?;
        let index = notes.iter().position(|note| &note.id == id)?;
        Some((index, notes.remove(index)))
    }

    async fn restore_local(&self, index: usize, note: Note) {
        let mut guard = self.notes.lock().await;
        let notes = guard.get_or_insert_with(Vec::new);
        // A refresh that ran in the meantime may already have brought it back.
        if notes.iter().any(|existing| existing.id == note.id) {
            return;
        }
        let index = index.min(notes.len());
        notes.insert(index, note);
    }

    async fn delete_remote(&self, id: &NoteId, attachment_key: Option<&str>) -> Result<()> {
        if let Some(key) = attachment_key {
            self.store.delete(key).await?;
            tracing::debug!(key, "Attachment deleted");
        }
        self.api.delete_note(id).await
    }
}
