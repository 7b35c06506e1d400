//! core::model
//!
//! The canonical data model produced by the output-normalization layer.
//!
//! # Overview
//!
//! Every operation reconstructs its result freshly from tool output; none
//! of these types are persisted. Each value is an immutable snapshot owned
//! exclusively by the call that produced it.
//!
//! Both parse strategies ([`crate::parse::ParseMode`]) normalize into the
//! same shapes, so callers never see which output mode the tool was
//! queried in.
//!
//! # Relationships
//!
//! - [`RevisionGraph`] aggregates [`LogEntry`]
//! - [`StatusInfo`] aggregates [`ConflictInfo`]

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::types::RevisionId;

/// Conflict type tag for merge conflicts.
///
/// The conflict listing does not distinguish conflict kinds today; every
/// record carries this tag.
pub const CONFLICT_TYPE_MERGE: &str = "merge";

/// A single entry from a revision-graph query.
///
/// Same shape as [`RevisionInfo`] minus the conflict flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Commit id.
    pub commit_id: RevisionId,
    /// First line of the commit message, if any.
    pub description: Option<String>,
    /// Author name, if known.
    pub author: Option<String>,
    /// Committer timestamp, if the output mode carried one.
    pub timestamp: Option<DateTime<FixedOffset>>,
    /// Parent commit ids, in tool order. Empty for root revisions.
    pub parents: Vec<RevisionId>,
}

/// Detailed information about one revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionInfo {
    /// The resolved commit id of the queried revision.
    pub revision_id: RevisionId,
    /// First line of the commit message, if any.
    pub description: Option<String>,
    /// Author name, if known.
    pub author: Option<String>,
    /// Committer timestamp, if the output mode carried one.
    pub timestamp: Option<DateTime<FixedOffset>>,
    /// Parent commit ids, in tool order. Empty for root revisions.
    pub parents: Vec<RevisionId>,
    /// Whether the revision has unresolved conflicts.
    pub has_conflicts: bool,
}

impl RevisionInfo {
    /// Build a `RevisionInfo` from a log entry plus a conflict probe result.
    pub fn from_entry(entry: LogEntry, has_conflicts: bool) -> Self {
        Self {
            revision_id: entry.commit_id,
            description: entry.description,
            author: entry.author,
            timestamp: entry.timestamp,
            parents: entry.parents,
            has_conflicts,
        }
    }
}

/// An ordered sequence of revisions plus the current working-copy revision.
///
/// Order is the tool's traversal order. It is not guaranteed topological;
/// the parser carries through whatever the tool reports, including a
/// `current_revision` that may or may not fall inside the query scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionGraph {
    /// Revisions in tool traversal order.
    pub revisions: Vec<LogEntry>,
    /// The current working-copy revision, if the tool reported one.
    pub current_revision: Option<RevisionId>,
}

/// One conflicted file reported by the conflict listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictInfo {
    /// Path of the conflicted file. Never empty.
    pub file_path: String,
    /// Conflict type tag. Currently always [`CONFLICT_TYPE_MERGE`].
    pub conflict_type: String,
    /// Free-text detail from the listing, if the line carried any.
    pub details: Option<String>,
}

impl ConflictInfo {
    /// Build a merge-conflict record for a file path.
    pub fn merge(file_path: impl Into<String>, details: Option<String>) -> Self {
        Self {
            file_path: file_path.into(),
            conflict_type: CONFLICT_TYPE_MERGE.to_string(),
            details,
        }
    }
}

/// One entry from the tool's operation history.
///
/// Consumed once by `undo_last_op`: the entry describes the operation as
/// it existed *before* the undo ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationInfo {
    /// Operation id.
    pub operation_id: String,
    /// Operation type/description text.
    pub operation_type: String,
    /// Operation timestamp, as the tool printed it.
    pub timestamp: Option<String>,
    /// Longer description, when the history entry carried one.
    pub description: Option<String>,
}

impl OperationInfo {
    /// Placeholder entry used when the history head cannot be read.
    pub fn unknown() -> Self {
        Self {
            operation_id: "unknown".to_string(),
            operation_type: "unknown".to_string(),
            timestamp: None,
            description: None,
        }
    }
}

/// Current repository status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    /// Current working-copy revision.
    pub current_revision: RevisionId,
    /// Whether the working copy has uncommitted changes.
    pub has_uncommitted_changes: bool,
    /// Unresolved conflicts, repository-wide. Empty when none were found
    /// or the conflict probe was unavailable.
    pub conflicts: Vec<ConflictInfo>,
}
