use std::path::Path;

use notekeeper_core::{AttachmentFile, NoteForm};

use crate::commands::common::open_controller;
use crate::error::CliError;

pub async fn run_add(
    name: &str,
    description: &str,
    image: Option<&Path>,
    config_path: Option<&Path>,
    profile: Option<&str>,
) -> Result<(), CliError> {
    let attachment = match image {
        Some(path) => Some(AttachmentFile::from_path(path).await?),
        None => None,
    };
    let form = NoteForm::new(name, description, attachment)?;
    if let Some(file) = form.attachment() {
        tracing::info!(
            file = %file.file_name,
            key = form.name(),
            size = file.size_bytes(),
            "Attaching image"
        );
    }

    let controller = open_controller(config_path, profile)?;
    let note = controller.create(form).await?;

    println!("{}", note.id);
    Ok(())
}
