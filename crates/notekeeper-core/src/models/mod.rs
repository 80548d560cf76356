//! Data models for NoteKeeper

mod attachment;
mod form;
mod note;

pub use attachment::AttachmentFile;
pub use form::NoteForm;
pub use note::{CreateNoteInput, Note, NoteId};
