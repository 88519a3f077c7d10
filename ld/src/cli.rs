//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::Tone;

/// LetterDraft - claim letter drafting assistant
#[derive(Parser)]
#[command(
    name = "ld",
    about = "Drafts and revises insurance claim letters from structured intake data",
    version,
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a claim record from an intake file (YAML or JSON)
    New {
        /// Path to the intake file
        file: PathBuf,
    },

    /// Show a claim record and its current letter
    Show {
        /// Claim ID
        claim_id: String,
    },

    /// List stored claims
    List,

    /// List the built-in letter templates
    Templates,

    /// Check a claim for information gaps before drafting
    Gaps {
        /// Claim ID
        claim_id: String,
    },

    /// Generate a letter draft for a claim
    Draft {
        /// Claim ID
        claim_id: String,

        /// Template id (see `ld templates`); omit to draft from intake data
        #[arg(short, long)]
        template: Option<String>,

        /// Tone override (formal, empathetic, firm, neutral)
        #[arg(long)]
        tone: Option<Tone>,

        /// Draft even when the gap check finds missing information
        #[arg(long)]
        skip_gap_check: bool,
    },

    /// Revise the stored letter with a free-text instruction
    Correct {
        /// Claim ID
        claim_id: String,

        /// Revision instruction, e.g. "make the second paragraph firmer"
        instruction: String,

        /// Tone override (formal, empathetic, firm, neutral)
        #[arg(long)]
        tone: Option<Tone>,
    },
}
