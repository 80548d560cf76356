use std::path::Path;

use notekeeper_core::api::GraphqlNoteApi;
use notekeeper_core::config::BackendConfig;
use notekeeper_core::session::SessionPersistence;
use notekeeper_core::storage::S3ObjectStore;
use notekeeper_core::{FetchReport, Note, NoteId, NoteListController};
use serde::Serialize;

use crate::auth::{resolve_profile_name, KeyringSessionStore};
use crate::error::CliError;

pub type Controller = NoteListController<GraphqlNoteApi, S3ObjectStore>;

const SHORT_ID_LEN: usize = 13;

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Option<String>,
}

/// Build a controller from backend config and the profile's stored session.
pub fn open_controller(
    config_path: Option<&Path>,
    profile: Option<&str>,
) -> Result<Controller, CliError> {
    let config = BackendConfig::load(config_path)?;
    let profile_name = resolve_profile_name(profile);
    let session = KeyringSessionStore::new(&profile_name).load_session()?;
    if session.is_none() {
        tracing::debug!(
            "No stored session for profile '{}'; requests carry only the API key",
            profile_name
        );
    }

    let api = GraphqlNoteApi::new(&config.api)?
        .with_session_token(session.map(|session| session.access_token));
    let store = S3ObjectStore::new(config.storage);
    tracing::debug!(
        endpoint = api.endpoint(),
        bucket = %store.config().bucket,
        "Backend clients ready"
    );
    Ok(NoteListController::new(api, store))
}

/// Find a note by exact id or unique id prefix.
pub fn resolve_note(note_query: &str, notes: &[Note]) -> Result<Note, CliError> {
    if let Some(note) = notes.iter().find(|note| note.id.as_str() == note_query) {
        return Ok(note.clone());
    }

    let matching = notes
        .iter()
        .filter(|note| note.id.as_str().starts_with(note_query))
        .collect::<Vec<_>>();

    match matching.as_slice() {
        [] => Err(CliError::NoteNotFound(note_query.to_string())),
        [note] => Ok((*note).clone()),
        _ => {
            let options = matching
                .iter()
                .take(3)
                .map(|note| short_id(&note.id))
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousNoteId(format!(
                "ID prefix '{note_query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn normalize_note_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyNoteId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn short_id(id: &NoteId) -> String {
    id.as_str().chars().take(SHORT_ID_LEN).collect()
}

pub fn format_note_lines(notes: &[Note]) -> Vec<String> {
    let mut lines = Vec::with_capacity(notes.len());
    for note in notes {
        let id = short_id(&note.id);
        let name = truncate(&note.name, 24);
        let preview = note.description_preview(48);
        lines.push(format!("{id:<13}  {name:<24}  {preview}"));

        match (&note.resolved_attachment_url, &note.attachment_key) {
            (Some(url), _) => lines.push(format!("{:<13}  image: {url}", "")),
            (None, Some(key)) => lines.push(format!("{:<13}  image: <unresolved: {key}>", "")),
            (None, None) => {}
        }
    }
    lines
}

pub fn format_report_warnings(report: &FetchReport) -> Vec<String> {
    report
        .failures
        .iter()
        .map(|failure| {
            format!(
                "warning: attachment '{}' for note {} could not be resolved: {}",
                failure.key,
                short_id(&failure.note_id),
                failure.message
            )
        })
        .collect()
}

pub fn note_to_list_item(note: &Note) -> NoteListItem {
    NoteListItem {
        id: note.id.to_string(),
        name: note.name.clone(),
        description: note.description.clone(),
        image: note.attachment_key.clone(),
        image_url: note.resolved_attachment_url.clone(),
        created_at: note.created_at.clone(),
    }
}

pub fn format_timestamp(timestamp_secs: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp_secs, 0).map_or_else(
        || timestamp_secs.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = value.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}
