//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if started in that directory
//! - `--workspace <path>`: Explicit workspace-root hint
//! - `--bin <path>`: The jj executable to invoke
//! - `--mode <records|per-revision>`: Output-parsing strategy
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Suppress log output entirely

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::parse::ParseMode;

/// jj-bridge - structured, typed operations over the Jujutsu CLI
#[derive(Parser, Debug)]
#[command(name = "jjb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if jjb was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Explicit workspace-root hint (skips discovery)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// The jj executable to invoke
    #[arg(long, global = true, default_value = "jj")]
    pub bin: PathBuf,

    /// Output-parsing strategy
    #[arg(long, global = true, value_enum, default_value_t = ModeArg::Records)]
    pub mode: ModeArg,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Output-parsing strategy flag.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum ModeArg {
    /// One batch query rendering structured records (default)
    Records,
    /// Candidate ids first, then one query per revision field
    PerRevision,
}

impl From<ModeArg> for ParseMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Records => ParseMode::Records,
            ModeArg::PerRevision => ParseMode::PerRevision,
        }
    }
}

impl std::fmt::Display for ModeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeArg::Records => write!(f, "records"),
            ModeArg::PerRevision => write!(f, "per-revision"),
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the revision graph
    #[command(
        name = "log",
        long_about = "Fetch the revision graph as structured records.\n\n\
            Prints one JSON document with the revisions (in the tool's traversal \
            order, each with its parent ids) and the current working-copy revision.",
        after_help = "\
EXAMPLES:
    # Entire graph
    jjb log

    # Most recent 20 revisions
    jjb log --limit 20

    # Drive the per-revision query strategy instead of batch records
    jjb --mode per-revision log --limit 5"
    )]
    Log {
        /// Maximum number of revisions to return
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Describe a single revision
    #[command(name = "describe")]
    Describe {
        /// Revision to describe (revset, e.g. '@', '@-', 'main')
        revision: String,
    },

    /// Rebase a revision (and descendants) onto a destination
    #[command(name = "rebase")]
    Rebase {
        /// Source revision (revset)
        source: String,
        /// Destination revision (revset)
        destination: String,
    },

    /// Squash changes from one revision into another
    #[command(name = "squash")]
    Squash {
        /// Revision to squash (revset)
        revision: String,
        /// Target revision (revset)
        into: String,
    },

    /// Create a new change
    #[command(
        name = "new",
        long_about = "Create a new change, optionally anchored to a parent revision.\n\n\
            Prints the post-creation current-revision id, re-queried from the \
            repository rather than scraped from the creation output."
    )]
    New {
        /// Parent revision (revset); defaults to the working copy
        parent: Option<String>,
    },

    /// Undo the most recent operation
    #[command(name = "undo")]
    Undo,

    /// Report repository status
    #[command(
        name = "status",
        long_about = "Report repository status.\n\n\
            Prints the current revision, whether the working copy has uncommitted \
            changes, and any unresolved conflicts. Conflict and changed-file probes \
            degrade to empty results when the tool does not support them."
    )]
    Status,

    /// List unresolved conflicts
    #[command(name = "conflicts")]
    Conflicts {
        /// Revision to inspect (revset); defaults to the current revision
        revision: Option<String>,
    },

    /// Print the resolved workspace root
    #[command(name = "root")]
    Root,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash
    jjb completion bash > ~/.local/share/bash-completion/completions/jjb

    # Zsh
    jjb completion zsh > ~/.zfunc/_jjb"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
