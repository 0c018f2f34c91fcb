//! Non-fatal observations made while compiling.

use std::fmt;

use serde::Serialize;

/// A tolerated irregularity in the query text.
///
/// Diagnostics never abort compilation; they are handed to the caller's sink
/// as they occur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A character other than whitespace, a connector or a closing bracket
    /// was skipped while looking for the connector after a filter.
    UnexpectedCharacter {
        /// The skipped character.
        found: char,
        /// Byte offset.
        offset: usize,
    },
}

impl Diagnostic {
    /// Byte offset the diagnostic refers to.
    pub fn offset(&self) -> usize {
        match self {
            Diagnostic::UnexpectedCharacter { offset, .. } => *offset,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnexpectedCharacter { found, offset } => write!(
                f,
                "ignored unexpected character {found:?} while looking for a connector (byte {offset})"
            ),
        }
    }
}
