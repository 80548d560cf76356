use std::path::Path;

use crate::commands::common::{normalize_note_identifier, open_controller, resolve_note};
use crate::error::CliError;

pub async fn run_delete(
    id: &str,
    config_path: Option<&Path>,
    profile: Option<&str>,
) -> Result<(), CliError> {
    let normalized_id = normalize_note_identifier(id)?;
    let controller = open_controller(config_path, profile)?;
    controller.fetch_all().await?;

    let note = resolve_note(&normalized_id, &controller.notes().await)?;
    controller.delete(&note).await?;

    println!("{}", note.id);
    Ok(())
}
