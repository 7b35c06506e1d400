//! parse
//!
//! Output normalization: converts raw jj output into the canonical data
//! model.
//!
//! # Strategies
//!
//! The tool can be queried in two output shapes, selected by
//! [`ParseMode`]:
//!
//! - [`ParseMode::Records`] (default) - one batch query whose template
//!   renders a line-delimited structured record per revision
//!   ([`records`])
//! - [`ParseMode::PerRevision`] - a candidate-id query followed by
//!   single-purpose queries per revision ([`queries`])
//!
//! Both normalize to the same [`crate::core::model`] shapes. Parsing is
//! best-effort: a malformed record is skipped with a warning and never
//! aborts the batch.
//!
//! # Soft probes
//!
//! Auxiliary sub-queries (conflicts, parents, changed files) return
//! [`Probe`], which keeps "the tool reported nothing" distinct from "the
//! query failed". Callers downgrade `Unknown` to an empty value with a
//! warning; probe failure never propagates. This trades false negatives
//! for resilience against tool subcommand variation.

pub mod queries;
pub mod records;

use crate::core::model::{ConflictInfo, OperationInfo};

/// Which output shape to drive the tool in.
///
/// Records is the system of record; PerRevision is retained because both
/// tool output shapes must stay drivable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// One batch query, template-rendered structured records.
    #[default]
    Records,
    /// Candidate ids first, then single-purpose queries per revision.
    PerRevision,
}

/// Result of an auxiliary sub-query that is allowed to fail.
///
/// `Known` carries what the tool reported (possibly empty). `Unknown`
/// means the query itself failed; callers decide what to substitute and
/// the substitution is logged, keeping the empty/unknown distinction
/// visible in diagnostics even though the public result model flattens
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    /// The query ran; this is what it reported.
    Known(T),
    /// The query failed; nothing is known.
    Unknown,
}

impl<T> Probe<T> {
    /// Build a probe result from a runner result, logging the failure.
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>, what: &str) -> Self {
        match result {
            Ok(value) => Probe::Known(value),
            Err(e) => {
                tracing::debug!(probe = what, error = %e, "probe query failed");
                Probe::Unknown
            }
        }
    }

    /// Unwrap a known value, or substitute `fallback` with a warning.
    pub fn known_or(self, fallback: T, what: &str) -> T {
        match self {
            Probe::Known(value) => value,
            Probe::Unknown => {
                tracing::warn!(probe = what, "probe unavailable; treating as empty");
                fallback
            }
        }
    }

    /// Whether the probe failed.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Probe::Unknown)
    }
}

/// Marker line identifying working-copy changes in plain status output.
///
/// Used by the fallback changed-file probe when the porcelain form is
/// unavailable.
pub const WORKING_COPY_MARKER: &str = "Working copy changes:";

/// Interpret porcelain-style status output: one line per changed file.
pub fn has_changes_porcelain(stdout: &str) -> bool {
    stdout.lines().any(|line| !line.trim().is_empty())
}

/// Interpret plain status output via the working-copy marker.
pub fn has_changes_plain(stdout: &str) -> bool {
    stdout.contains(WORKING_COPY_MARKER)
}

/// Parse conflict-listing output.
///
/// One conflict per non-empty line. A line splits on a tab (or a run of
/// two-plus spaces) into file path and detail text; with no delimiter the
/// whole line is the path. The conflict type is always `"merge"`.
pub fn parse_conflicts(stdout: &str) -> Vec<ConflictInfo> {
    stdout
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let (path, details) = split_conflict_line(line);
            Some(ConflictInfo::merge(path, details))
        })
        .collect()
}

/// Split a conflict line into file path and optional detail text.
fn split_conflict_line(line: &str) -> (&str, Option<String>) {
    let (path, detail) = match line.split_once('\t') {
        Some((path, detail)) => (path, detail),
        None => match line.find("  ") {
            Some(idx) => line.split_at(idx),
            None => return (line, None),
        },
    };
    let path = path.trim_end();
    let detail = detail.trim();
    if detail.is_empty() {
        (path, None)
    } else {
        (path, Some(detail.to_string()))
    }
}

/// Parse the head entry of free-text operation-history output.
///
/// Expected shape (as `jj op log --no-graph` prints it):
///
/// ```text
/// <operation_id> <user>@<host> <timestamp>, lasted <duration>
/// <operation description>
/// ```
///
/// The first whitespace-separated token is the operation id; the text
/// between the user token and the duration clause is the timestamp; the
/// second non-empty line is the operation type/description. Returns
/// `None` when no head entry is present.
pub fn parse_op_log_head(stdout: &str) -> Option<OperationInfo> {
    let mut lines = stdout.lines().filter(|line| !line.trim().is_empty());
    let first = lines.next()?.trim();

    let tokens: Vec<&str> = first.split_whitespace().collect();
    let operation_id = tokens.first()?.to_string();

    let timestamp = tokens
        .iter()
        .position(|t| t.contains('@'))
        .map(|i| tokens[i + 1..].join(" "))
        .and_then(|rest| {
            let rest = rest.split(", lasted").next().unwrap_or("").trim().to_string();
            (!rest.is_empty()).then_some(rest)
        });

    let operation_type = lines
        .next()
        .map(|line| line.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    Some(OperationInfo {
        operation_id,
        operation_type: operation_type.clone(),
        timestamp,
        description: Some(operation_type),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    mod probe {
        use super::*;

        #[test]
        fn known_passes_through() {
            let probe: Probe<Vec<u8>> = Probe::Known(vec![1]);
            assert_eq!(probe.known_or(vec![], "test"), vec![1]);
        }

        #[test]
        fn unknown_substitutes_fallback() {
            let probe: Probe<Vec<u8>> = Probe::Unknown;
            assert!(probe.is_unknown());
            assert_eq!(probe.known_or(vec![], "test"), Vec::<u8>::new());
        }

        #[test]
        fn from_result_maps_err_to_unknown() {
            let ok: Probe<u8> = Probe::from_result(Ok::<_, String>(7), "test");
            let err: Probe<u8> = Probe::from_result(Err::<u8, _>("boom".to_string()), "test");
            assert_eq!(ok, Probe::Known(7));
            assert!(err.is_unknown());
        }
    }

    mod conflicts {
        use super::*;

        #[test]
        fn one_record_per_nonempty_line() {
            let parsed = parse_conflicts("foo.txt\n\nbar/baz.rs\n");
            assert_eq!(parsed.len(), 2);
            assert_eq!(parsed[0].file_path, "foo.txt");
            assert_eq!(parsed[1].file_path, "bar/baz.rs");
            assert!(parsed.iter().all(|c| c.conflict_type == "merge"));
        }

        #[test]
        fn tab_delimiter_separates_details() {
            let parsed = parse_conflicts("foo.txt\t2-sided conflict\n");
            assert_eq!(parsed[0].file_path, "foo.txt");
            assert_eq!(parsed[0].details.as_deref(), Some("2-sided conflict"));
        }

        #[test]
        fn space_run_delimiter_separates_details() {
            let parsed = parse_conflicts("foo.txt    2-sided conflict\n");
            assert_eq!(parsed[0].file_path, "foo.txt");
            assert_eq!(parsed[0].details.as_deref(), Some("2-sided conflict"));
        }

        #[test]
        fn no_delimiter_means_no_details() {
            let parsed = parse_conflicts("some file.txt\n");
            assert_eq!(parsed[0].file_path, "some file.txt");
            assert_eq!(parsed[0].details, None);
        }

        #[test]
        fn empty_output_is_no_conflicts() {
            assert!(parse_conflicts("").is_empty());
            assert!(parse_conflicts("\n  \n").is_empty());
        }
    }

    mod status {
        use super::*;

        #[test]
        fn porcelain_lines_mean_changes() {
            assert!(has_changes_porcelain("M src/lib.rs\n"));
            assert!(!has_changes_porcelain(""));
            assert!(!has_changes_porcelain("\n\n"));
        }

        #[test]
        fn plain_marker_means_changes() {
            assert!(has_changes_plain(
                "Working copy changes:\nM src/lib.rs\n"
            ));
            assert!(!has_changes_plain("The working copy is clean\n"));
        }
    }

    mod op_log {
        use super::*;

        #[test]
        fn parses_head_entry() {
            let stdout = "\
b51416386f26 test@host 2024-05-01 12:30:00, lasted 12ms
squash commits into b51416386f26
args: jj squash
";
            let op = parse_op_log_head(stdout).unwrap();
            assert_eq!(op.operation_id, "b51416386f26");
            assert_eq!(op.operation_type, "squash commits into b51416386f26");
            assert_eq!(op.timestamp.as_deref(), Some("2024-05-01 12:30:00"));
            assert_eq!(op.description.as_deref(), Some("squash commits into b51416386f26"));
        }

        #[test]
        fn missing_description_line_is_unknown() {
            let op = parse_op_log_head("b51416386f26 test@host now\n").unwrap();
            assert_eq!(op.operation_type, "unknown");
            assert_eq!(op.timestamp.as_deref(), Some("now"));
        }

        #[test]
        fn empty_output_is_none() {
            assert!(parse_op_log_head("").is_none());
            assert!(parse_op_log_head("\n\n").is_none());
        }
    }
}
