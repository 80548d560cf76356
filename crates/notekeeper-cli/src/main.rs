//! NoteKeeper CLI - list, create and delete notes with image attachments.

mod auth;
mod cli;
mod commands;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::auth_cmd::{run_login, run_logout, run_status};
use crate::commands::completions::run_completions;
use crate::commands::delete::run_delete;
use crate::commands::list::run_list;
use crate::error::CliError;

const DEFAULT_LOG_DIRECTIVE: &str = "notekeeper=info";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = DEFAULT_LOG_DIRECTIVE.parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::List { json } => run_list(json, config_path, profile).await?,
        Commands::Add {
            name,
            description,
            image,
        } => {
            run_add(&name, &description, image.as_deref(), config_path, profile).await?;
        }
        Commands::Delete { id } => run_delete(&id, config_path, profile).await?,
        Commands::Login { token } => run_login(&token, profile)?,
        Commands::Logout => run_logout(profile)?,
        Commands::Status => run_status(profile)?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
