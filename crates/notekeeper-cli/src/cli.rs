use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "notekeeper")]
#[command(about = "Keep notes with image attachments in your cloud backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the backend config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Session profile name
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List saved notes
    #[command(alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note name (also the attachment's storage key)
        #[arg(long)]
        name: String,
        /// Note description
        #[arg(long)]
        description: String,
        /// Optional image to attach
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },
    /// Delete a note and its attachment
    #[command(alias = "rm")]
    Delete {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Store a session token issued by your identity provider
    Login {
        /// Session token
        #[arg(long, value_name = "TOKEN")]
        token: String,
    },
    /// Sign out and clear the stored session
    Logout,
    /// Show whether a session is stored
    Status,
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}
