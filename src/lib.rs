//! jj-bridge - structured, typed operations over the Jujutsu (jj) CLI
//!
//! jj-bridge adapts the `jj` command-line tool into a set of callable,
//! structured operations - fetch the revision graph, describe a revision,
//! rebase, squash, create a change, undo an operation, report
//! status/conflicts - for tool-dispatch hosts that invoke named operations
//! with typed arguments and expect typed results, not raw text.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to ops)
//! - [`ops`] - The operation adapters: the public typed contract
//! - [`parse`] - Output normalization into the canonical data model
//! - [`workspace`] - Workspace-root resolution and caching
//! - [`jj`] - Single interface for invoking the external jj binary
//! - [`core`] - Domain types and the result model
//!
//! # Correctness Invariants
//!
//! 1. All subprocess invocations flow through the [`jj`] doorway
//! 2. Primary command failures surface verbatim (command, exit code,
//!    stderr); auxiliary probe failures only downgrade result completeness
//! 3. Parsed output only becomes a revision identifier after plausibility
//!    validation
//! 4. No state is persisted beyond the session-owned workspace cache

pub mod cli;
pub mod core;
pub mod jj;
pub mod ops;
pub mod parse;
pub mod workspace;

pub use crate::core::model::{
    ConflictInfo, LogEntry, OperationInfo, RevisionGraph, RevisionInfo, StatusInfo,
};
pub use crate::core::types::{RevisionId, Revset};
pub use crate::jj::{JjError, JjRunner};
pub use crate::ops::Jj;
pub use crate::parse::ParseMode;
pub use crate::workspace::{WorkspaceConfig, WorkspaceError, WorkspaceResolver};
