//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`RevisionId`] - Validated jj revision identifier
//! - [`Revset`] - Validated revset expression
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs. Parsed tool
//! output only ever becomes a [`RevisionId`] after passing the plausibility
//! rules; caller-supplied revision selectors only ever reach the command
//! line as a [`Revset`].
//!
//! # Examples
//!
//! ```
//! use jj_bridge::core::types::{RevisionId, Revset};
//!
//! // Valid constructions
//! let id = RevisionId::new("pqzkwonm4b7c8d9e").unwrap();
//! let revset = Revset::new("ancestors(@)").unwrap();
//!
//! // Invalid constructions fail at creation time
//! assert!(RevisionId::new("short").is_err());
//! assert!(Revset::new("").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid revision id: {0}")]
    InvalidRevisionId(String),

    #[error("invalid revset: {0}")]
    InvalidRevset(String),
}

/// A validated jj revision identifier.
///
/// Covers both commit ids (hex) and change ids (the `k`-`z` alphabet jj
/// uses for change identifiers). Identifiers are normalized to lowercase.
///
/// Rules:
/// - At least [`RevisionId::MIN_LEN`] characters (graph renderings and
///   truncated prefixes below that length are not stable handles)
/// - Lowercase ASCII letters and digits only
///
/// # Example
///
/// ```
/// use jj_bridge::core::types::RevisionId;
///
/// let id = RevisionId::new("AB12CD34EF56AB78").unwrap();
/// assert_eq!(id.as_str(), "ab12cd34ef56ab78");
/// assert_eq!(id.short(8), "ab12cd34");
///
/// // Too short or non-alphanumeric values are rejected
/// assert!(RevisionId::new("ab12").is_err());
/// assert!(RevisionId::new("ab12cd34ef56 78").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RevisionId(String);

impl RevisionId {
    /// Minimum plausible identifier length.
    ///
    /// Shorter strings in tool output are treated as rendering artifacts,
    /// not identifiers.
    pub const MIN_LEN: usize = 8;

    /// Create a new validated revision id.
    ///
    /// The id is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRevisionId` if the string is too short or
    /// contains characters outside the jj identifier alphabets.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into().to_ascii_lowercase();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Parse a candidate identifier out of a line of tool output.
    ///
    /// Trims surrounding whitespace and returns `None` for anything that
    /// fails validation. This is the filter both parse modes apply to
    /// reject graph-rendering artifacts.
    ///
    /// # Example
    ///
    /// ```
    /// use jj_bridge::core::types::RevisionId;
    ///
    /// assert!(RevisionId::plausible("  ab12cd34ef56ab78\n").is_some());
    /// assert!(RevisionId::plausible("|").is_none());
    /// assert!(RevisionId::plausible("").is_none());
    /// ```
    pub fn plausible(line: &str) -> Option<Self> {
        Self::new(line.trim()).ok()
    }

    /// Get an abbreviated form of the id.
    ///
    /// Returns the first `len` characters. If `len` exceeds the id length,
    /// returns the full id.
    ///
    /// # Example
    ///
    /// ```
    /// use jj_bridge::core::types::RevisionId;
    ///
    /// let id = RevisionId::new("ab12cd34ef56ab78").unwrap();
    /// assert_eq!(id.short(4), "ab12");
    /// assert_eq!(id.short(99), "ab12cd34ef56ab78");
    /// ```
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    /// Validate a revision id.
    fn validate(id: &str) -> Result<(), TypeError> {
        if id.len() < Self::MIN_LEN {
            return Err(TypeError::InvalidRevisionId(format!(
                "expected at least {} characters, got {}",
                Self::MIN_LEN,
                id.len()
            )));
        }
        if !id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return Err(TypeError::InvalidRevisionId(
                "revision id must be lowercase alphanumeric".into(),
            ));
        }
        Ok(())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RevisionId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RevisionId> for String {
    fn from(id: RevisionId) -> Self {
        id.0
    }
}

impl AsRef<str> for RevisionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RevisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated revset expression.
///
/// Revsets select one or more revisions (`@`, `@-`, `main`,
/// `ancestors(x)`, ...). Validation is intentionally loose - jj itself is
/// the authority on revset syntax - but values that could corrupt a
/// command line are rejected:
///
/// - Cannot be empty
/// - Cannot contain newlines, carriage returns, or NUL
/// - Cannot start with `-` (would be parsed as a flag)
///
/// # Example
///
/// ```
/// use jj_bridge::core::types::Revset;
///
/// let current = Revset::new("@").unwrap();
/// assert_eq!(current.as_str(), "@");
///
/// let parents = Revset::new("ab12cd34-").unwrap();
/// assert_eq!(parents.as_str(), "ab12cd34-");
///
/// assert!(Revset::new("").is_err());
/// assert!(Revset::new("-s evil").is_err());
/// assert!(Revset::new("a\nb").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Revset(String);

impl Revset {
    /// Create a new validated revset expression.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRevset` if the expression is empty,
    /// contains line breaks or NUL, or starts with `-`.
    pub fn new(expr: impl Into<String>) -> Result<Self, TypeError> {
        let expr = expr.into();
        Self::validate(&expr)?;
        Ok(Self(expr))
    }

    /// The working-copy revset (`@`).
    pub fn working_copy() -> Self {
        Self("@".to_string())
    }

    /// The revset selecting every revision.
    pub fn all() -> Self {
        Self("all()".to_string())
    }

    /// The revset bounding `all()` to at most `count` revisions.
    ///
    /// # Example
    ///
    /// ```
    /// use jj_bridge::core::types::Revset;
    ///
    /// assert_eq!(Revset::limited(10).as_str(), "limit(10, all())");
    /// ```
    pub fn limited(count: usize) -> Self {
        Self(format!("limit({count}, all())"))
    }

    /// The revset selecting the immediate parents of a revision.
    ///
    /// # Example
    ///
    /// ```
    /// use jj_bridge::core::types::{RevisionId, Revset};
    ///
    /// let id = RevisionId::new("ab12cd34ef56ab78").unwrap();
    /// let parents = Revset::parents_of(&id);
    /// assert_eq!(parents.as_str(), "ab12cd34ef56ab78-");
    /// ```
    pub fn parents_of(id: &RevisionId) -> Self {
        Self(format!("{}-", id.as_str()))
    }

    /// A revset selecting a single revision by id.
    pub fn single(id: &RevisionId) -> Self {
        Self(id.as_str().to_string())
    }

    /// Validate a revset expression.
    fn validate(expr: &str) -> Result<(), TypeError> {
        if expr.is_empty() {
            return Err(TypeError::InvalidRevset("revset cannot be empty".into()));
        }
        if expr.starts_with('-') {
            return Err(TypeError::InvalidRevset(
                "revset cannot start with '-'".into(),
            ));
        }
        if expr.chars().any(|c| c == '\n' || c == '\r' || c == '\0') {
            return Err(TypeError::InvalidRevset(
                "revset cannot contain line breaks or NUL".into(),
            ));
        }
        Ok(())
    }

    /// Get the expression as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Revset {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Revset> for String {
    fn from(revset: Revset) -> Self {
        revset.0
    }
}

impl From<&RevisionId> for Revset {
    fn from(id: &RevisionId) -> Self {
        Self::single(id)
    }
}

impl AsRef<str> for Revset {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Revset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
