//! workspace
//!
//! Workspace-root resolution.
//!
//! # Overview
//!
//! Every operation needs to know which repository it applies to. The
//! resolver answers that with a multi-strategy search, first success wins:
//!
//! 1. The cached root, if it still exists on disk
//! 2. The explicit hint from [`WorkspaceConfig::hint`]
//! 3. Each configured environment variable, in order
//! 4. A root-discovery probe (`jj root`) from a caller-supplied start
//!    path, or the process's current directory
//!
//! For the hint and each environment variable, a cheap marker-directory
//! check (`<path>/.jj`) is tried before falling back to the probe, so a
//! workspace is usually found without spawning a process.
//!
//! # Caching
//!
//! Successful resolution caches the root inside the resolver instance.
//! The cache is mutex-guarded so concurrent callers cannot race on first
//! resolution, and it can be seeded or cleared explicitly by the hosting
//! layer (e.g. to scope a request to a particular workspace before any
//! operation runs). There is no invalidation beyond an existence check at
//! read time and explicit [`WorkspaceResolver::clear`].
//!
//! The resolver is owned by the session that created it, not stored in
//! process-wide state; hosts serving multiple repositories create one
//! session per scope.
//!
//! # Example
//!
//! ```no_run
//! use jj_bridge::workspace::{WorkspaceConfig, WorkspaceResolver};
//!
//! let resolver = WorkspaceResolver::new(&WorkspaceConfig::default());
//! match resolver.resolve(None) {
//!     Ok(root) => println!("workspace: {}", root.display()),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::jj::JjRunner;

/// Environment variables consulted for a workspace-root hint, most
/// specific first. Absence of all of them is not an error; discovery
/// falls through to the probe.
pub const DEFAULT_ENV_VARS: [&str; 3] = ["JJ_WORKSPACE_PATH", "WORKSPACE_PATH", "PWD"];

/// The marker directory identifying a jj workspace root.
const MARKER_DIR: &str = ".jj";

/// Errors from workspace resolution.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// No strategy located a repository root.
    #[error(
        "no jj workspace found (checked hint, environment variables {env_vars:?}, \
         and a root probe from {start})"
    )]
    NotFound {
        /// The environment variables that were consulted
        env_vars: Vec<String>,
        /// The directory the final probe ran from
        start: PathBuf,
    },
}

/// Typed workspace configuration supplied by the calling layer.
///
/// Replaces any guessing about the caller's context: a host that knows
/// which workspace a request applies to passes it in `hint` (or seeds the
/// resolver cache directly).
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    /// Explicit workspace hint from the calling layer.
    pub hint: Option<PathBuf>,
    /// Ordered environment-variable names consulted for a root hint.
    pub env_vars: Vec<String>,
    /// The jj executable to invoke.
    pub program: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            hint: None,
            env_vars: DEFAULT_ENV_VARS.iter().map(|s| s.to_string()).collect(),
            program: PathBuf::from("jj"),
        }
    }
}

impl WorkspaceConfig {
    /// Set an explicit workspace hint.
    pub fn with_hint(mut self, hint: impl Into<PathBuf>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Override the jj executable.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Override the consulted environment variables.
    pub fn with_env_vars<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env_vars = vars.into_iter().map(Into::into).collect();
        self
    }
}

/// Resolves and caches the filesystem root of the active repository.
pub struct WorkspaceResolver {
    runner: JjRunner,
    hint: Option<PathBuf>,
    env_vars: Vec<String>,
    cache: Mutex<Option<PathBuf>>,
}

impl std::fmt::Debug for WorkspaceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceResolver")
            .field("hint", &self.hint)
            .field("env_vars", &self.env_vars)
            .field("cached", &self.cached())
            .finish()
    }
}

impl WorkspaceResolver {
    /// Create a resolver for the given configuration.
    pub fn new(config: &WorkspaceConfig) -> Self {
        Self {
            runner: JjRunner::new(&config.program),
            hint: config.hint.clone(),
            env_vars: config.env_vars.clone(),
            cache: Mutex::new(None),
        }
    }

    /// Resolve the workspace root.
    ///
    /// `start` is the directory the final probe runs from when the cache,
    /// hint, and environment variables all come up empty; it defaults to
    /// the process's current directory.
    ///
    /// Successful resolution caches the root for subsequent calls.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::NotFound`] when every strategy fails.
    pub fn resolve(&self, start: Option<&Path>) -> Result<PathBuf, WorkspaceError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(root) = cache.as_ref() {
            if root.exists() {
                return Ok(root.clone());
            }
            tracing::debug!(root = %root.display(), "cached workspace vanished, re-resolving");
        }

        if let Some(hint) = &self.hint {
            if let Some(root) = self.locate(hint) {
                tracing::debug!(root = %root.display(), "workspace from explicit hint");
                *cache = Some(root.clone());
                return Ok(root);
            }
        }

        for var in &self.env_vars {
            let Ok(value) = std::env::var(var) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            if let Some(root) = self.locate(Path::new(&value)) {
                tracing::debug!(root = %root.display(), var = %var, "workspace from environment");
                *cache = Some(root.clone());
                return Ok(root);
            }
        }

        let start = match start {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };
        if let Some(root) = self.probe(&start) {
            tracing::debug!(root = %root.display(), start = %start.display(), "workspace from root probe");
            *cache = Some(root.clone());
            return Ok(root);
        }

        Err(WorkspaceError::NotFound {
            env_vars: self.env_vars.clone(),
            start,
        })
    }

    /// Seed the cache with a known root.
    ///
    /// Used by hosting layers to scope a session to a workspace taken from
    /// request context before any operation runs.
    pub fn seed(&self, root: impl Into<PathBuf>) {
        let root = root.into();
        tracing::debug!(root = %root.display(), "workspace cache seeded");
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = Some(root);
    }

    /// Clear the cached root.
    pub fn clear(&self) {
        tracing::debug!("workspace cache cleared");
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The currently cached root, if any.
    pub fn cached(&self) -> Option<PathBuf> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Locate a workspace at or above `path`: marker check first, probe
    /// second.
    fn locate(&self, path: &Path) -> Option<PathBuf> {
        if path.join(MARKER_DIR).is_dir() {
            return Some(path.to_path_buf());
        }
        self.probe(path)
    }

    /// Ask the tool for the workspace root containing `from`.
    ///
    /// Failure is a negative result, not an error; resolution falls
    /// through to the next strategy.
    fn probe(&self, from: &Path) -> Option<PathBuf> {
        if !from.is_dir() {
            return None;
        }
        let output = self.runner.run(&["root"], from).ok()?;
        let root = PathBuf::from(output.stdout_trimmed());
        if root.as_os_str().is_empty() || !root.exists() {
            return None;
        }
        Some(root)
    }
}
