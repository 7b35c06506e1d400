//! ops
//!
//! The operation adapters: the public, typed contract over the jj CLI.
//!
//! # Architecture
//!
//! [`Jj`] is the session facade a tool-dispatch host holds. Each
//! operation resolves the workspace, issues one or more commands through
//! the runner, feeds output to the parser, and returns a typed result.
//! Control flow is synchronous and linear; there is no pipeline beyond
//! sequential command issuance.
//!
//! A host serving multiple repositories creates one session per scope;
//! the workspace cache lives inside the session, not in process-wide
//! state, and can be seeded from request context before the first
//! operation runs.
//!
//! # Error surface
//!
//! Primary commands propagate [`JjError`] verbatim (command line, exit
//! code, stderr). Auxiliary probes - conflicts, parents, changed files -
//! never fail an operation: an unavailable probe downgrades to an empty
//! result with a warning.
//!
//! # Example
//!
//! ```no_run
//! use jj_bridge::ops::Jj;
//! use jj_bridge::workspace::WorkspaceConfig;
//!
//! let jj = Jj::new(WorkspaceConfig::default());
//! let graph = jj.get_log(Some(20))?;
//! for entry in &graph.revisions {
//!     println!("{} {}", entry.commit_id.short(12), entry.description.as_deref().unwrap_or(""));
//! }
//! # Ok::<(), jj_bridge::jj::JjError>(())
//! ```

use std::path::PathBuf;

use crate::core::model::{
    ConflictInfo, OperationInfo, RevisionGraph, RevisionInfo, StatusInfo,
};
use crate::core::types::{RevisionId, Revset};
use crate::jj::{JjError, JjRunner};
use crate::parse::{self, queries, records, ParseMode, Probe};
use crate::workspace::{WorkspaceConfig, WorkspaceError, WorkspaceResolver};

/// Session facade over the jj CLI.
///
/// Owns the workspace resolver (and its cache), the command runner, and
/// the active parse mode. Cheap to share: all methods take `&self`, and
/// the session is `Send + Sync`.
pub struct Jj {
    runner: JjRunner,
    resolver: WorkspaceResolver,
    mode: ParseMode,
}

impl std::fmt::Debug for Jj {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jj")
            .field("program", &self.runner.program())
            .field("mode", &self.mode)
            .finish()
    }
}

impl Jj {
    /// Create a session with the default parse mode.
    pub fn new(config: WorkspaceConfig) -> Self {
        Self::with_mode(config, ParseMode::default())
    }

    /// Create a session with an explicit parse mode.
    pub fn with_mode(config: WorkspaceConfig, mode: ParseMode) -> Self {
        Self {
            runner: JjRunner::new(&config.program),
            resolver: WorkspaceResolver::new(&config),
            mode,
        }
    }

    /// The active parse mode.
    pub fn parse_mode(&self) -> ParseMode {
        self.mode
    }

    /// Seed the workspace cache from request-scoped context.
    pub fn seed_workspace(&self, root: impl Into<PathBuf>) {
        self.resolver.seed(root);
    }

    /// Clear the workspace cache.
    pub fn clear_workspace(&self) {
        self.resolver.clear();
    }

    /// Resolve the workspace root without running an operation.
    pub fn workspace_root(&self) -> Result<PathBuf, WorkspaceError> {
        self.resolver.resolve(None)
    }

    /// The directory operations run in.
    ///
    /// Falls back to the current directory with a warning when no
    /// workspace resolves; operations still proceed so that callers get
    /// the tool's own error text instead of a flat refusal.
    fn workdir(&self) -> PathBuf {
        match self.resolver.resolve(None) {
            Ok(root) => root,
            Err(e) => {
                let fallback = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                tracing::warn!(
                    error = %e,
                    fallback = %fallback.display(),
                    "no workspace resolved; using current directory"
                );
                fallback
            }
        }
    }

    /// Fetch the revision graph, bounded to `limit` revisions if given.
    pub fn get_log(&self, limit: Option<usize>) -> Result<RevisionGraph, JjError> {
        let cwd = self.workdir();
        let scope = match limit {
            Some(count) => Revset::limited(count),
            None => Revset::all(),
        };

        let revisions = match self.mode {
            ParseMode::Records => records::log_records(&self.runner, &cwd, &scope)?,
            ParseMode::PerRevision => queries::log_entries(&self.runner, &cwd, &scope)?,
        };
        let current_revision = queries::current_revision(&self.runner, &cwd)?;

        Ok(RevisionGraph {
            revisions,
            current_revision,
        })
    }

    /// Describe a single revision, including its conflict state.
    pub fn describe_revision(&self, revset: &Revset) -> Result<RevisionInfo, JjError> {
        let cwd = self.workdir();

        let entry = match self.mode {
            ParseMode::Records => records::log_records(&self.runner, &cwd, revset)?
                .into_iter()
                .next()
                .ok_or_else(|| JjError::UnexpectedOutput {
                    command: format!("{} log -r {}", self.runner.program().display(), revset),
                    detail: "revset selected no revisions".to_string(),
                })?,
            ParseMode::PerRevision => {
                let id = queries::resolve_single(&self.runner, &cwd, revset)?;
                queries::entry_for(&self.runner, &cwd, id)
            }
        };

        let conflicts = queries::conflicts(&self.runner, &cwd, Some(revset))
            .known_or(Vec::new(), "conflict listing");

        Ok(RevisionInfo::from_entry(entry, !conflicts.is_empty()))
    }

    /// Rebase `source` (and descendants) onto `destination`.
    ///
    /// Returns the tool's message, or a synthesized confirmation when the
    /// tool prints nothing on success.
    pub fn smart_rebase(&self, source: &Revset, destination: &Revset) -> Result<String, JjError> {
        let cwd = self.workdir();
        let output = self.runner.run(
            &["rebase", "-s", source.as_str(), "-d", destination.as_str()],
            &cwd,
        )?;
        let message = output.stdout_trimmed();
        if message.is_empty() {
            Ok(format!("Rebased {source} onto {destination}"))
        } else {
            Ok(message.to_string())
        }
    }

    /// Squash `revision` into `into`.
    ///
    /// Same output-or-synthesized-message contract as
    /// [`Jj::smart_rebase`].
    pub fn squash_changes(&self, revision: &Revset, into: &Revset) -> Result<String, JjError> {
        let cwd = self.workdir();
        let output = self.runner.run(
            &["squash", "--from", revision.as_str(), "--into", into.as_str()],
            &cwd,
        )?;
        let message = output.stdout_trimmed();
        if message.is_empty() {
            Ok(format!("Squashed {revision} into {into}"))
        } else {
            Ok(message.to_string())
        }
    }

    /// Create a new change, optionally anchored to `parent`.
    ///
    /// Returns the post-creation current-revision id. The creation
    /// command's own output is never trusted as the identifier source; a
    /// fresh working-copy query is the authority.
    pub fn new_change(&self, parent: Option<&Revset>) -> Result<RevisionId, JjError> {
        let cwd = self.workdir();
        let mut args = vec!["new"];
        if let Some(parent) = parent {
            args.push(parent.as_str());
        }
        self.runner.run(&args, &cwd)?;

        queries::resolve_single(&self.runner, &cwd, &Revset::working_copy())
    }

    /// Undo the most recent operation.
    ///
    /// The returned [`OperationInfo`] describes the operation as it
    /// existed *before* the undo executed; the undo itself is not
    /// reversible by this layer. A failed history read degrades to a
    /// placeholder entry; the undo still runs.
    pub fn undo_last_op(&self) -> Result<OperationInfo, JjError> {
        let cwd = self.workdir();

        let head = match self.mode {
            ParseMode::Records => records::op_head_record(&self.runner, &cwd),
            ParseMode::PerRevision => self
                .runner
                .run(&["op", "log", "-n", "1", "--no-graph"], &cwd)
                .map(|output| parse::parse_op_log_head(&output.stdout)),
        };
        let before = Probe::from_result(head, "operation history")
            .known_or(None, "operation history")
            .unwrap_or_else(OperationInfo::unknown);

        self.runner.run(&["op", "undo"], &cwd)?;

        Ok(before)
    }

    /// Report repository status: current revision, uncommitted changes,
    /// and repository-wide conflicts.
    pub fn get_status(&self) -> Result<StatusInfo, JjError> {
        let cwd = self.workdir();

        let current_revision =
            queries::resolve_single(&self.runner, &cwd, &Revset::working_copy())?;

        let has_uncommitted_changes = match self.runner.run(&["status", "--porcelain"], &cwd) {
            Ok(output) => parse::has_changes_porcelain(&output.stdout),
            Err(e) => {
                tracing::debug!(error = %e, "porcelain status unavailable, using plain status");
                let fallback = self
                    .runner
                    .run(&["status"], &cwd)
                    .map(|output| parse::has_changes_plain(&output.stdout));
                Probe::from_result(fallback, "status").known_or(false, "status")
            }
        };

        let conflicts =
            queries::conflicts(&self.runner, &cwd, None).known_or(Vec::new(), "conflict listing");

        Ok(StatusInfo {
            current_revision,
            has_uncommitted_changes,
            conflicts,
        })
    }

    /// List conflicts in `revision`, or in the current revision when
    /// omitted.
    ///
    /// Probe failure yields an empty list, never an error.
    pub fn resolve_conflicts(
        &self,
        revision: Option<&Revset>,
    ) -> Result<Vec<ConflictInfo>, JjError> {
        let cwd = self.workdir();
        let scope = revision
            .cloned()
            .unwrap_or_else(Revset::working_copy);

        Ok(queries::conflicts(&self.runner, &cwd, Some(&scope))
            .known_or(Vec::new(), "conflict listing"))
    }
}
