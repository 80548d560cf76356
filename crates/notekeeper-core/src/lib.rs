//! notekeeper-core - Core library for NoteKeeper
//!
//! This crate contains the note models, the clients for the remote note API and
//! object store, backend configuration, and the `NoteListController` that keeps
//! an in-memory note list in step with both.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod session;
pub mod storage;
pub mod util;

pub use controller::{FetchReport, NoteListController};
pub use error::{Error, Result};
pub use models::{AttachmentFile, CreateNoteInput, Note, NoteForm, NoteId};
