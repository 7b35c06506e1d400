//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! Each handler validates its arguments into the strong types the
//! operation layer expects, invokes one operation, and prints the result:
//! JSON documents for structured results, bare lines for string results.

use anyhow::{Context as _, Result};
use clap::CommandFactory;
use clap_complete::{generate, shells};
use serde::Serialize;

use super::args::{Cli, Command, Shell};
use crate::core::types::Revset;
use crate::ops::Jj;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, jj: &Jj) -> Result<()> {
    match command {
        Command::Log { limit } => log(jj, limit),
        Command::Describe { revision } => describe(jj, &revision),
        Command::Rebase {
            source,
            destination,
        } => rebase(jj, &source, &destination),
        Command::Squash { revision, into } => squash(jj, &revision, &into),
        Command::New { parent } => new(jj, parent.as_deref()),
        Command::Undo => undo(jj),
        Command::Status => status(jj),
        Command::Conflicts { revision } => conflicts(jj, revision.as_deref()),
        Command::Root => root(jj),
        Command::Completion { shell } => completion(shell),
    }
}

fn log(jj: &Jj, limit: Option<usize>) -> Result<()> {
    let graph = jj.get_log(limit).context("failed to fetch revision log")?;
    print_json(&graph)
}

fn describe(jj: &Jj, revision: &str) -> Result<()> {
    let revset = revset_arg(revision)?;
    let info = jj
        .describe_revision(&revset)
        .with_context(|| format!("failed to describe revision '{revset}'"))?;
    print_json(&info)
}

fn rebase(jj: &Jj, source: &str, destination: &str) -> Result<()> {
    let source = revset_arg(source)?;
    let destination = revset_arg(destination)?;
    let message = jj
        .smart_rebase(&source, &destination)
        .context("rebase failed")?;
    println!("{message}");
    Ok(())
}

fn squash(jj: &Jj, revision: &str, into: &str) -> Result<()> {
    let revision = revset_arg(revision)?;
    let into = revset_arg(into)?;
    let message = jj.squash_changes(&revision, &into).context("squash failed")?;
    println!("{message}");
    Ok(())
}

fn new(jj: &Jj, parent: Option<&str>) -> Result<()> {
    let parent = parent.map(revset_arg).transpose()?;
    let id = jj
        .new_change(parent.as_ref())
        .context("failed to create change")?;
    println!("{id}");
    Ok(())
}

fn undo(jj: &Jj) -> Result<()> {
    let info = jj.undo_last_op().context("undo failed")?;
    print_json(&info)
}

fn status(jj: &Jj) -> Result<()> {
    let info = jj.get_status().context("failed to read status")?;
    print_json(&info)
}

fn conflicts(jj: &Jj, revision: Option<&str>) -> Result<()> {
    let revision = revision.map(revset_arg).transpose()?;
    let list = jj
        .resolve_conflicts(revision.as_ref())
        .context("failed to list conflicts")?;
    print_json(&list)
}

fn root(jj: &Jj) -> Result<()> {
    let root = jj.workspace_root().context("no workspace found")?;
    println!("{}", root.display());
    Ok(())
}

/// Generate shell completion scripts.
fn completion(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, &name, &mut std::io::stdout()),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, &name, &mut std::io::stdout()),
        Shell::Fish => generate(shells::Fish, &mut cmd, &name, &mut std::io::stdout()),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, &name, &mut std::io::stdout()),
    }

    Ok(())
}

/// Validate a revset argument.
fn revset_arg(value: &str) -> Result<Revset> {
    Revset::new(value).with_context(|| format!("invalid revset '{value}'"))
}

/// Print a result as pretty JSON.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to encode result")?;
    println!("{rendered}");
    Ok(())
}
