//! CLI argument parsing for claimstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cs")]
#[command(author, version, about = "SQLite-backed claim record store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store a claim document from a JSON file
    Put {
        /// Claim id
        #[arg(required = true)]
        id: String,

        /// Path to a JSON document
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Print a claim document
    Get {
        /// Claim id
        #[arg(required = true)]
        id: String,
    },

    /// List stored claims
    List,

    /// Delete a claim
    Delete {
        /// Claim id
        #[arg(required = true)]
        id: String,
    },
}
