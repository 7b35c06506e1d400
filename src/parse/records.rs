//! parse::records
//!
//! Batch record mode: one log query whose template renders a
//! line-delimited structured record per revision.
//!
//! # Record format
//!
//! Each line is one revision, fields separated by the ASCII unit
//! separator (U+001F):
//!
//! ```text
//! <commit_id> US <description first line> US <author name> US <timestamp> US <parent ids>
//! ```
//!
//! The parent-id field joins ids with the ASCII record separator
//! (U+001E); it is empty for root revisions. The separators cannot occur
//! in the surrounded fields (jj strips control characters from
//! descriptions and author names), which keeps the format unambiguous
//! without quoting.
//!
//! # Leniency
//!
//! Line-level: a line with the wrong field count or an implausible commit
//! id is skipped with a warning; the rest of the batch still parses.
//! Field-level: an unparsable timestamp or implausible parent id degrades
//! to `None`/dropped without discarding the line.

use std::path::Path;

use chrono::DateTime;

use crate::core::model::{LogEntry, OperationInfo};
use crate::core::types::{RevisionId, Revset};
use crate::jj::{JjError, JjRunner};

/// Field separator within a record line (ASCII unit separator).
pub const FIELD_SEP: char = '\u{1f}';

/// Separator between parent ids inside the parent field (ASCII record
/// separator).
pub const PARENT_SEP: char = '\u{1e}';

/// Timestamp format rendered by [`LOG_TEMPLATE`] and expected by the
/// parser.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Template rendering one revision record per line.
pub const LOG_TEMPLATE: &str = "commit_id ++ \"\u{1f}\" ++ description.first_line() ++ \"\u{1f}\" ++ author.name() ++ \"\u{1f}\" ++ committer.timestamp().format(\"%Y-%m-%dT%H:%M:%S%z\") ++ \"\u{1f}\" ++ parents.map(|c| c.commit_id()).join(\"\u{1e}\") ++ \"\\n\"";

/// Template rendering one operation-history record per line.
pub const OP_TEMPLATE: &str =
    "id ++ \"\u{1f}\" ++ description ++ \"\u{1f}\" ++ time.start() ++ \"\\n\"";

/// Number of fields in a revision record.
const LOG_FIELDS: usize = 5;

/// Number of fields in an operation record.
const OP_FIELDS: usize = 3;

/// Query the revision graph for `revset` and parse the record stream.
pub fn log_records(
    runner: &JjRunner,
    cwd: &Path,
    revset: &Revset,
) -> Result<Vec<LogEntry>, JjError> {
    let output = runner.run(
        &["log", "-r", revset.as_str(), "--no-graph", "-T", LOG_TEMPLATE],
        cwd,
    )?;
    Ok(parse_log_records(&output.stdout))
}

/// Query the newest operation-history entry and parse it.
pub fn op_head_record(runner: &JjRunner, cwd: &Path) -> Result<Option<OperationInfo>, JjError> {
    let output = runner.run(
        &["op", "log", "-n", "1", "--no-graph", "-T", OP_TEMPLATE],
        cwd,
    )?;
    Ok(parse_op_record(&output.stdout))
}

/// Parse a stream of revision record lines.
///
/// Malformed lines are skipped with a warning; valid neighbors still
/// produce entries.
pub fn parse_log_records(stdout: &str) -> Vec<LogEntry> {
    let mut entries = Vec::new();
    for line in stdout.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_log_record(line) {
            Some(entry) => entries.push(entry),
            None => tracing::warn!(line, "skipping malformed log record"),
        }
    }
    entries
}

/// Parse one revision record line.
fn parse_log_record(line: &str) -> Option<LogEntry> {
    let fields: Vec<&str> = line.split(FIELD_SEP).collect();
    if fields.len() != LOG_FIELDS {
        return None;
    }

    let commit_id = RevisionId::plausible(fields[0])?;
    let description = nonempty(fields[1]);
    let author = nonempty(fields[2]);
    let timestamp = DateTime::parse_from_str(fields[3].trim(), TIMESTAMP_FORMAT).ok();
    let parents = fields[4]
        .split(PARENT_SEP)
        .filter_map(RevisionId::plausible)
        .collect();

    Some(LogEntry {
        commit_id,
        description,
        author,
        timestamp,
        parents,
    })
}

/// Parse the first operation record line, if any.
pub fn parse_op_record(stdout: &str) -> Option<OperationInfo> {
    let line = stdout.lines().find(|line| !line.trim().is_empty())?;
    let fields: Vec<&str> = line.split(FIELD_SEP).collect();
    if fields.len() != OP_FIELDS {
        tracing::warn!(line, "skipping malformed operation record");
        return None;
    }

    let operation_id = fields[0].trim();
    if operation_id.is_empty() {
        tracing::warn!(line, "operation record has empty id");
        return None;
    }
    let operation_type = nonempty(fields[1]).unwrap_or_else(|| "unknown".to_string());

    Some(OperationInfo {
        operation_id: operation_id.to_string(),
        operation_type: operation_type.clone(),
        timestamp: nonempty(fields[2]),
        description: Some(operation_type),
    })
}

/// Trim a field; empty becomes `None`.
fn nonempty(field: &str) -> Option<String> {
    let field = field.trim();
    (!field.is_empty()).then(|| field.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> String {
        fields.join("\u{1f}")
    }

    #[test]
    fn well_formed_record_is_lossless() {
        let line = record(&[
            "ab12cd34ef56ab78",
            "fix the parser",
            "Test User",
            "2024-05-01T12:30:00+0200",
            "ffeeddccbbaa9988\u{1e}1122334455667788",
        ]);
        let entries = parse_log_records(&line);
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.commit_id.as_str(), "ab12cd34ef56ab78");
        assert_eq!(entry.description.as_deref(), Some("fix the parser"));
        assert_eq!(entry.author.as_deref(), Some("Test User"));
        assert_eq!(
            entry.timestamp.unwrap().to_rfc3339(),
            "2024-05-01T12:30:00+02:00"
        );
        assert_eq!(
            entry.parents.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
            vec!["ffeeddccbbaa9988", "1122334455667788"]
        );
    }

    #[test]
    fn empty_fields_become_none() {
        let line = record(&["ab12cd34ef56ab78", "", "", "", ""]);
        let entries = parse_log_records(&line);
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.description, None);
        assert_eq!(entry.author, None);
        assert_eq!(entry.timestamp, None);
        assert!(entry.parents.is_empty());
    }

    #[test]
    fn malformed_lines_are_isolated() {
        let stdout = format!(
            "{}\nnot a record\n{}\n",
            record(&["ab12cd34ef56ab78", "first", "A", "", ""]),
            record(&["ffeeddccbbaa9988", "second", "B", "", "ab12cd34ef56ab78"]),
        );
        let entries = parse_log_records(&stdout);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].commit_id.as_str(), "ab12cd34ef56ab78");
        assert_eq!(entries[1].commit_id.as_str(), "ffeeddccbbaa9988");
        assert_eq!(entries[1].parents.len(), 1);
    }

    #[test]
    fn implausible_commit_id_skips_line() {
        let line = record(&["@", "desc", "A", "", ""]);
        assert!(parse_log_records(&line).is_empty());
    }

    #[test]
    fn bad_timestamp_degrades_to_none() {
        let line = record(&["ab12cd34ef56ab78", "d", "A", "yesterday-ish", ""]);
        let entries = parse_log_records(&line);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].timestamp, None);
    }

    #[test]
    fn implausible_parent_ids_are_dropped() {
        let line = record(&[
            "ab12cd34ef56ab78",
            "d",
            "A",
            "",
            "ffeeddccbbaa9988\u{1e}|\u{1e}",
        ]);
        let entries = parse_log_records(&line);
        assert_eq!(entries[0].parents.len(), 1);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let stdout = format!("\n  \n{}\n\n", record(&["ab12cd34ef56ab78", "", "", "", ""]));
        assert_eq!(parse_log_records(&stdout).len(), 1);
    }

    mod op_record {
        use super::*;

        #[test]
        fn parses_fields() {
            let line = "opid12345\u{1f}undo operation abc\u{1f}2024-05-01 12:30:00";
            let op = parse_op_record(line).unwrap();
            assert_eq!(op.operation_id, "opid12345");
            assert_eq!(op.operation_type, "undo operation abc");
            assert_eq!(op.timestamp.as_deref(), Some("2024-05-01 12:30:00"));
        }

        #[test]
        fn empty_description_becomes_unknown() {
            let line = "opid12345\u{1f}\u{1f}";
            let op = parse_op_record(line).unwrap();
            assert_eq!(op.operation_type, "unknown");
            assert_eq!(op.timestamp, None);
        }

        #[test]
        fn wrong_field_count_is_none() {
            assert!(parse_op_record("opid12345 only free text").is_none());
            assert!(parse_op_record("").is_none());
        }
    }
}
