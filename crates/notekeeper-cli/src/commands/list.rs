use std::path::Path;

use crate::commands::common::{
    format_note_lines, format_report_warnings, note_to_list_item, open_controller, NoteListItem,
};
use crate::error::CliError;

pub async fn run_list(
    as_json: bool,
    config_path: Option<&Path>,
    profile: Option<&str>,
) -> Result<(), CliError> {
    let controller = open_controller(config_path, profile)?;
    let report = controller.fetch_all().await?;
    let notes = controller.notes().await;

    if as_json {
        let json_items = notes
            .iter()
            .map(note_to_list_item)
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if notes.is_empty() {
        println!("No saved notes");
    } else {
        for line in format_note_lines(&notes) {
            println!("{line}");
        }
    }

    if !report.is_complete() {
        for warning in format_report_warnings(&report) {
            eprintln!("{warning}");
        }
    }

    Ok(())
}
