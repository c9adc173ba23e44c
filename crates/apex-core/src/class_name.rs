// crates/apex-core/src/class_name.rs
// ============================================================================
// Module: Apex Class Name
// Description: Apex class name with an explicit "unknown" sentinel.
// Purpose: Model spec.md §3's "class name (or the sentinel `Unknown`)" without
//          conflating it with an absent `Option`.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A job reference's class name is either known text extracted from the log,
//! or the explicit `Unknown` sentinel when extraction could not determine a
//! class. This is distinct from `Option<String>`: `Unknown` is itself a
//! meaningful, reportable value, not an absence.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// An Apex class name, or the explicit `Unknown` sentinel.
///
/// # Invariants
/// - `Known` values are never empty strings; an empty string is normalized to
///   `Unknown` at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassName {
    /// A class name extracted from the log text.
    Known(String),
    /// No class name could be determined.
    Unknown,
}

impl ClassName {
    /// Creates a class name from optional extracted text, normalizing an
    /// empty or whitespace-only string to [`ClassName::Unknown`].
    #[must_use]
    pub fn from_text(text: Option<&str>) -> Self {
        match text.map(str::trim) {
            Some(trimmed) if !trimmed.is_empty() => Self::Known(trimmed.to_string()),
            _ => Self::Unknown,
        }
    }

    /// Returns true when this is the `Unknown` sentinel.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns the known name as a string slice, or `None` for `Unknown`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Known(name) => Some(name.as_str()),
            Self::Unknown => None,
        }
    }

    /// Returns the class name with any namespace prefix (`Namespace.Class`)
    /// stripped, or `None` for `Unknown`.
    #[must_use]
    pub fn without_namespace(&self) -> Option<&str> {
        self.as_str()
            .map(|name| name.rsplit('.').next().unwrap_or(name))
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(name) => f.write_str(name),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_normalizes_to_unknown() {
        assert_eq!(ClassName::from_text(Some("  ")), ClassName::Unknown);
        assert_eq!(ClassName::from_text(None), ClassName::Unknown);
    }

    #[test]
    fn strips_namespace_prefix() {
        let name = ClassName::from_text(Some("myns.MyQueueable"));
        assert_eq!(name.without_namespace(), Some("MyQueueable"));
    }

    #[test]
    fn unknown_has_no_namespace_stripped_form() {
        assert_eq!(ClassName::Unknown.without_namespace(), None);
    }
}
