//! cli
//!
//! Command-line interface layer for jj-bridge.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Build the session ([`crate::ops::Jj`]) from typed configuration
//! - Delegate to command handlers, which print JSON results
//!
//! # Architecture
//!
//! The CLI layer is thin. Every subcommand maps one-to-one onto an
//! operation of the [`crate::ops::Jj`] facade; no repository interaction
//! happens here.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};

use crate::ops::Jj;
use crate::workspace::WorkspaceConfig;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.debug, cli.quiet);

    if let Some(cwd) = &cli.cwd {
        std::env::set_current_dir(cwd)
            .with_context(|| format!("failed to change directory to {}", cwd.display()))?;
    }

    let mut config = WorkspaceConfig::default().with_program(&cli.bin);
    if let Some(workspace) = &cli.workspace {
        config = config.with_hint(workspace);
    }

    let jj = Jj::with_mode(config, cli.mode.into());
    commands::dispatch(cli.command, &jj)
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `--debug` selects debug-level
/// output for this crate and the default is warnings only. `--quiet`
/// suppresses the subscriber entirely.
fn init_tracing(debug: bool, quiet: bool) {
    if quiet {
        return;
    }
    let default_filter = if debug { "jj_bridge=debug" } else { "jj_bridge=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
