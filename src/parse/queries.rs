//! parse::queries
//!
//! Per-revision query mode, plus the single-purpose queries shared by
//! both parse strategies.
//!
//! # Strategy
//!
//! The graph query in this mode returns only candidate identifiers (one
//! per line, filtered for plausibility to reject rendering artifacts).
//! Each revision's description, author, and parents are then fetched with
//! separate single-purpose queries. Parent ids come from the revision's
//! immediate-predecessor revset (`<id>-`), filtered the same way.
//!
//! A failed per-revision query leaves that field empty; a failed parent
//! sub-query yields an empty parent list rather than aborting the entry.
//! Only the initial candidate query can fail the operation.

use std::path::Path;

use super::{parse_conflicts, Probe};
use crate::core::model::{ConflictInfo, LogEntry};
use crate::core::types::{RevisionId, Revset};
use crate::jj::{JjError, JjRunner};

/// Template rendering bare commit ids, one per line.
const ID_TEMPLATE: &str = "commit_id ++ \"\\n\"";

/// Fetch the current working-copy revision.
///
/// This is its own dedicated query in both parse modes, independent of
/// the main graph query. Returns `Ok(None)` when the tool prints nothing
/// usable.
pub fn current_revision(runner: &JjRunner, cwd: &Path) -> Result<Option<RevisionId>, JjError> {
    let output = runner.run(
        &["log", "-r", "@", "--no-graph", "-T", "commit_id", "-n", "1"],
        cwd,
    )?;
    Ok(RevisionId::plausible(&output.stdout))
}

/// Resolve a revset to a single revision id.
///
/// # Errors
///
/// Propagates command failure, and returns [`JjError::UnexpectedOutput`]
/// when the tool exits zero without printing a usable id.
pub fn resolve_single(
    runner: &JjRunner,
    cwd: &Path,
    revset: &Revset,
) -> Result<RevisionId, JjError> {
    let args = [
        "log", "-r", revset.as_str(), "--no-graph", "-T", "commit_id", "-n", "1",
    ];
    let output = runner.run(&args, cwd)?;
    RevisionId::plausible(&output.stdout).ok_or_else(|| JjError::UnexpectedOutput {
        command: runner.render_command(&args),
        detail: "output contained no usable revision id".to_string(),
    })
}

/// Fetch the candidate revision ids selected by `revset`.
pub fn candidate_ids(
    runner: &JjRunner,
    cwd: &Path,
    revset: &Revset,
) -> Result<Vec<RevisionId>, JjError> {
    let output = runner.run(
        &["log", "-r", revset.as_str(), "--no-graph", "-T", ID_TEMPLATE],
        cwd,
    )?;
    Ok(output
        .stdout
        .lines()
        .filter_map(RevisionId::plausible)
        .collect())
}

/// Build log entries for `revset` via per-revision queries.
pub fn log_entries(
    runner: &JjRunner,
    cwd: &Path,
    revset: &Revset,
) -> Result<Vec<LogEntry>, JjError> {
    let ids = candidate_ids(runner, cwd, revset)?;
    Ok(ids
        .into_iter()
        .map(|id| entry_for(runner, cwd, id))
        .collect())
}

/// Fetch a single revision's fields, one query per field.
///
/// Field queries are soft: a failure leaves the field empty. Timestamps
/// are not fetched in this mode.
pub fn entry_for(runner: &JjRunner, cwd: &Path, id: RevisionId) -> LogEntry {
    let description = field_query(runner, cwd, &id, "description.first_line()");
    let author = field_query(runner, cwd, &id, "author.name()");
    let parents = parents_of(runner, cwd, &id).known_or(Vec::new(), "parent listing");

    LogEntry {
        commit_id: id,
        description,
        author,
        timestamp: None,
        parents,
    }
}

/// Fetch the immediate parents of a revision.
pub fn parents_of(runner: &JjRunner, cwd: &Path, id: &RevisionId) -> Probe<Vec<RevisionId>> {
    let revset = Revset::parents_of(id);
    let result = runner
        .run(
            &["log", "-r", revset.as_str(), "--no-graph", "-T", ID_TEMPLATE],
            cwd,
        )
        .map(|output| {
            output
                .stdout
                .lines()
                .filter_map(RevisionId::plausible)
                .collect()
        });
    Probe::from_result(result, "parent listing")
}

/// List conflicts, scoped to `revset` when given, repository-wide
/// otherwise.
///
/// Command failure is a negative probe result, not an error; unsupported
/// subcommand variants must not break status or describe calls.
pub fn conflicts(
    runner: &JjRunner,
    cwd: &Path,
    revset: Option<&Revset>,
) -> Probe<Vec<ConflictInfo>> {
    let mut args = vec!["resolve", "--list"];
    if let Some(revset) = revset {
        args.push("-r");
        args.push(revset.as_str());
    }
    let result = runner
        .run(&args, cwd)
        .map(|output| parse_conflicts(&output.stdout));
    Probe::from_result(result, "conflict listing")
}

/// Run a single-value template query against one revision.
///
/// Returns `None` on failure or empty output.
fn field_query(runner: &JjRunner, cwd: &Path, id: &RevisionId, template: &str) -> Option<String> {
    let result = runner.run(
        &["log", "-r", id.as_str(), "--no-graph", "-T", template, "-n", "1"],
        cwd,
    );
    match result {
        Ok(output) => {
            let value = output.stdout_trimmed();
            (!value.is_empty()).then(|| value.to_string())
        }
        Err(e) => {
            tracing::debug!(revision = %id, template, error = %e, "field query failed");
            None
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Write a fake jj script and return a runner for it.
    fn fake_runner(dir: &TempDir, body: &str) -> JjRunner {
        let path: PathBuf = dir.path().join("jj");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        JjRunner::new(path)
    }

    #[test]
    fn current_revision_filters_artifacts() {
        let dir = TempDir::new().unwrap();
        let runner = fake_runner(&dir, "echo ab12cd34ef56ab78");
        let id = current_revision(&runner, dir.path()).unwrap().unwrap();
        assert_eq!(id.as_str(), "ab12cd34ef56ab78");

        let runner = fake_runner(&dir, "echo '@'");
        assert!(current_revision(&runner, dir.path()).unwrap().is_none());
    }

    #[test]
    fn resolve_single_rejects_unusable_output() {
        let dir = TempDir::new().unwrap();
        let runner = fake_runner(&dir, "echo ''");
        let err = resolve_single(&runner, dir.path(), &Revset::working_copy()).unwrap_err();
        assert!(matches!(err, JjError::UnexpectedOutput { .. }));
    }

    #[test]
    fn candidate_ids_skip_short_lines() {
        let dir = TempDir::new().unwrap();
        let runner = fake_runner(
            &dir,
            "printf 'ab12cd34ef56ab78\\n|\\no\\nffeeddccbbaa9988\\n'",
        );
        let ids = candidate_ids(&runner, dir.path(), &Revset::new("all()").unwrap()).unwrap();
        assert_eq!(
            ids.iter().map(|i| i.as_str()).collect::<Vec<_>>(),
            vec!["ab12cd34ef56ab78", "ffeeddccbbaa9988"]
        );
    }

    #[test]
    fn failed_conflict_probe_is_unknown() {
        let dir = TempDir::new().unwrap();
        let runner = fake_runner(&dir, "exit 2");
        let probe = conflicts(&runner, dir.path(), None);
        assert!(probe.is_unknown());
    }

    #[test]
    fn empty_conflict_listing_is_known_empty() {
        let dir = TempDir::new().unwrap();
        let runner = fake_runner(&dir, "exit 0");
        let probe = conflicts(&runner, dir.path(), None);
        assert_eq!(probe, Probe::Known(Vec::new()));
    }

    #[test]
    fn failed_parent_probe_is_unknown() {
        let dir = TempDir::new().unwrap();
        let runner = fake_runner(&dir, "exit 1");
        let id = RevisionId::new("ab12cd34ef56ab78").unwrap();
        assert!(parents_of(&runner, dir.path(), &id).is_unknown());
    }
}
