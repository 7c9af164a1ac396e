//! CLI argument definitions for the utapack command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Parser, Subcommand};

/// utapack - UTAU voicebank packer
#[derive(Parser)]
#[command(name = "utapack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Show debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Pack a voicebank into batch files and a rewritten oto.ini
    Build {
        /// Voicebank folder holding the pitch folders
        path: String,

        /// Configuration file (default: <PATH>/utapack_config.yaml)
        #[arg(short, long)]
        config: Option<String>,

        /// Folder the output folder is created in (default: <PATH>/UTAPackOutput)
        #[arg(short, long)]
        out_root: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Check tables and clips without writing output
    Validate {
        /// Voicebank folder holding the pitch folders
        path: String,

        /// Configuration file (default: <PATH>/utapack_config.yaml)
        #[arg(short, long)]
        config: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}
