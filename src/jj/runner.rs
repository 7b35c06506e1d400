//! jj::runner
//!
//! Subprocess invocation and the typed error taxonomy.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Errors from jj invocations.
///
/// The categorization matters to callers: a missing executable is fatal
/// and never retried, a non-zero exit is surfaced verbatim for primary
/// operations, and auxiliary probes downgrade failures to empty results
/// at a higher layer (see [`crate::parse::Probe`]).
#[derive(Debug, Error)]
pub enum JjError {
    /// The jj executable is not installed or not reachable.
    #[error("jj executable not found: {program} (is Jujutsu installed?)")]
    ExecutableNotFound {
        /// The program that could not be spawned
        program: String,
    },

    /// The tool ran and exited non-zero.
    #[error("jj command failed: {command} (exit code {exit_code})\n{stderr}")]
    CommandFailed {
        /// The full command line that was executed
        command: String,
        /// The process exit code (-1 if terminated by signal)
        exit_code: i32,
        /// Captured stderr text
        stderr: String,
    },

    /// The tool exited zero but its output did not contain what the
    /// operation needs (e.g. no usable revision id).
    #[error("unexpected output from '{command}': {detail}")]
    UnexpectedOutput {
        /// The command line whose output was unusable
        command: String,
        /// What was missing or malformed
        detail: String,
    },

    /// The process could not be spawned for a reason other than a missing
    /// executable (permissions, resource limits, ...).
    #[error("failed to run '{command}': {source}")]
    Spawn {
        /// The command line that failed to spawn
        command: String,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Captured output of a completed jj invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Captured stdout, lossily decoded as UTF-8.
    pub stdout: String,
    /// Captured stderr, lossily decoded as UTF-8.
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout with surrounding whitespace removed.
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }
}

/// Invokes the jj executable.
///
/// The runner is working-directory-agnostic: callers pass the directory
/// each invocation runs in. This keeps the runner free of resolution
/// logic and lets the workspace resolver use it for root probes without a
/// dependency cycle.
///
/// # Example
///
/// ```ignore
/// use jj_bridge::jj::{JjError, JjRunner};
/// use std::path::Path;
///
/// let runner = JjRunner::default();
/// match runner.run(&["log", "-r", "@", "--no-graph", "-T", "commit_id"], Path::new(".")) {
///     Ok(output) => println!("{}", output.stdout_trimmed()),
///     Err(JjError::ExecutableNotFound { .. }) => eprintln!("install jj first"),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JjRunner {
    /// The executable to invoke.
    program: PathBuf,
}

impl Default for JjRunner {
    fn default() -> Self {
        Self::new("jj")
    }
}

impl JjRunner {
    /// Create a runner for the given executable.
    ///
    /// `program` is usually just `"jj"` (resolved via `PATH`), but hosts
    /// and tests may point it at a specific binary.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The executable this runner invokes.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run `jj <args>` in `cwd`, capturing both streams.
    ///
    /// Stdin is never written. There is no retry and no timeout.
    ///
    /// # Errors
    ///
    /// - [`JjError::ExecutableNotFound`] if the program cannot be found
    /// - [`JjError::CommandFailed`] on non-zero exit
    /// - [`JjError::Spawn`] on any other spawn failure
    pub fn run(&self, args: &[&str], cwd: &Path) -> Result<CommandOutput, JjError> {
        let command = self.render_command(args);
        tracing::debug!(command = %command, cwd = %cwd.display(), "running jj");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    JjError::ExecutableNotFound {
                        program: self.program.display().to_string(),
                    }
                } else {
                    JjError::Spawn { command: command.clone(), source }
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(JjError::CommandFailed {
                command,
                exit_code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }

    /// Render the full command line for error messages and logs.
    pub(crate) fn render_command(&self, args: &[&str]) -> String {
        let mut rendered = self.program.display().to_string();
        for arg in args {
            rendered.push(' ');
            if arg.contains(char::is_whitespace) {
                rendered.push('\'');
                rendered.push_str(arg);
                rendered.push('\'');
            } else {
                rendered.push_str(arg);
            }
        }
        rendered
    }
}
