//! jj
//!
//! Single interface for invoking the external `jj` binary.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to the jj executable. Every
//! subprocess invocation in the crate flows through [`JjRunner`], which
//! captures both output streams and normalizes failures into the typed
//! [`JjError`] taxonomy. No other module spawns processes.
//!
//! # Responsibilities
//!
//! - Spawning `jj <subcommand> [flags] [revset]` with an explicit working
//!   directory
//! - Capturing stdout/stderr as text (stdin is never written)
//! - Mapping a missing executable to [`JjError::ExecutableNotFound`]
//! - Mapping non-zero exit to [`JjError::CommandFailed`] with the full
//!   command line, exit code, and stderr
//!
//! # Invariants
//!
//! - No retry and no timeout: every failure surfaces to the caller, and a
//!   hang in the tool hangs the calling operation
//! - The runner never chooses a working directory; callers resolve one
//!   first (see [`crate::workspace`])
//!
//! # Example
//!
//! ```ignore
//! use jj_bridge::jj::JjRunner;
//! use std::path::Path;
//!
//! let runner = JjRunner::default();
//! let output = runner.run(&["root"], Path::new("."))?;
//! println!("workspace root: {}", output.stdout.trim());
//! ```

mod runner;

pub use runner::{CommandOutput, JjError, JjRunner};
