//! utapack CLI - packs UTAU voicebanks into a few large WAV files
//!
//! This binary provides commands for building and validating voicebanks.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli_args;

use cli_args::{Cli, Commands};
use utapack_cli::commands;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so `--json` output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting utapack");

    let result = match cli.command {
        Commands::Build {
            path,
            config,
            out_root,
            json,
        } => commands::build::run(&path, config.as_deref(), out_root.as_deref(), json),
        Commands::Validate { path, config, json } => {
            commands::validate::run(&path, config.as_deref(), json)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
