//! Remote note API abstraction.

mod graphql;

pub use graphql::{ApiConfig, GraphqlNoteApi, DEFAULT_HTTP_TIMEOUT_SECS};

use crate::error::Result;
use crate::models::{CreateNoteInput, Note, NoteId};

/// Record operations provided by the remote note API.
#[allow(async_fn_in_trait)]
pub trait NoteApi {
    /// List every note visible to the current user. Order is not significant.
    async fn list_notes(&self) -> Result<Vec<Note>>;

    /// Create a note record and return it as stored.
    async fn create_note(&self, input: &CreateNoteInput) -> Result<Note>;

    /// Delete the note record with the given id.
    async fn delete_note(&self, id: &NoteId) -> Result<()>;
}
