//! Error types for the query compiler.

use thiserror::Error;

use super::ast::{ArithmeticOperator, LogicalOperator};
use crate::registry::FilterKind;

/// A specialized Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// Cursor bookkeeping failures.
///
/// These indicate a bug in the parser itself, never a problem with the query.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StructuralError {
    /// The cursor was asked to move past the last character.
    #[error("cursor cannot advance past the end of the query (position {position})")]
    PastEnd {
        /// Character index the cursor was at.
        position: usize,
    },

    /// The cursor was asked to move before the first character.
    #[error("cursor cannot retreat before the start of the query")]
    BeforeStart,
}

/// The query text itself is invalid.
///
/// Every variant carries the byte offset in the source where the problem was
/// detected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The first meaningful character is not an opening bracket.
    #[error("query must start with '{{' (found {} at byte {offset})", describe_found(.found))]
    MissingRootObject {
        /// The offending character, `None` when the query is only whitespace.
        found: Option<char>,
        /// Byte offset.
        offset: usize,
    },

    /// The input ended inside a cluster.
    #[error("object is not closed (input ends at byte {offset})")]
    UnterminatedObject {
        /// Byte offset.
        offset: usize,
    },

    /// The input ended inside a filter.
    #[error("filter '{filter}' is not terminated (input ends at byte {offset})")]
    UnterminatedFilter {
        /// Filter identifier scanned so far.
        filter: String,
        /// Byte offset.
        offset: usize,
    },

    /// The input ended inside a calculator's operand list.
    #[error("calculator is not closed (input ends at byte {offset})")]
    UnterminatedCalculator {
        /// Byte offset.
        offset: usize,
    },

    /// No filter is registered under the identifier.
    #[error("no filter matches id \"{identifier}\" (byte {offset}){}", describe_suggestion(.suggestion))]
    UnknownFilter {
        /// The unrecognized identifier.
        identifier: String,
        /// Closest registered identifier, if any.
        suggestion: Option<String>,
        /// Byte offset.
        offset: usize,
    },

    /// The object closed before an operator was found.
    #[error("filter '{filter}' has no operator (byte {offset})")]
    MissingOperator {
        /// Filter identifier.
        filter: String,
        /// Byte offset.
        offset: usize,
    },

    /// The operator symbol is not a comparison operator.
    #[error("unknown operator '{symbol}' for filter '{filter}' (byte {offset})")]
    UnknownOperator {
        /// Filter identifier.
        filter: String,
        /// The unrecognized symbol.
        symbol: String,
        /// Byte offset.
        offset: usize,
    },

    /// The object closed before an argument was opened.
    #[error("filter '{filter}' has no argument (byte {offset})")]
    MissingArgument {
        /// Filter identifier.
        filter: String,
        /// Byte offset.
        offset: usize,
    },

    /// The argument was opened but not closed with a second `"`.
    #[error("argument of filter '{filter}' {} (byte {offset})", describe_unterminated(.captured))]
    UnterminatedArgument {
        /// Filter identifier.
        filter: String,
        /// Whether any argument content was captured before the failure.
        captured: bool,
        /// Byte offset.
        offset: usize,
    },

    /// A connector appeared before any node in its cluster.
    #[error("connector '{connector}' has no preceding filter (byte {offset})")]
    DanglingConnector {
        /// The connector.
        connector: LogicalOperator,
        /// Byte offset.
        offset: usize,
    },

    /// Two sibling nodes are not joined by a connector.
    #[error("missing connector before byte {offset}")]
    MissingConnector {
        /// Byte offset of the node that follows the unjoined sibling.
        offset: usize,
    },

    /// A calculator operand references a non-numerical filter.
    #[error("filter '{identifier}' of kind {kind} cannot be a calculator operand; only numerical filters can (byte {offset})")]
    InvalidOperandType {
        /// Filter identifier.
        identifier: String,
        /// The filter's kind.
        kind: FilterKind,
        /// Byte offset.
        offset: usize,
    },

    /// A character between operands is not an arithmetic operator.
    #[error("unknown arithmetic operator '{symbol}' (byte {offset})")]
    UnknownArithmetic {
        /// The offending character.
        symbol: char,
        /// Byte offset.
        offset: usize,
    },

    /// An operand mixes identifier and digit characters, or has neither.
    #[error("operand is neither a filter nor a literal (byte {offset})")]
    MalformedOperand {
        /// Byte offset.
        offset: usize,
    },

    /// A calculator has no operands.
    #[error("calculator has no operands (byte {offset})")]
    EmptyCalculator {
        /// Byte offset.
        offset: usize,
    },

    /// The last operand of a calculator is followed by an arithmetic operator.
    #[error("arithmetic operator '{operator}' has no right-hand operand (byte {offset})")]
    DanglingArithmetic {
        /// The trailing operator.
        operator: ArithmeticOperator,
        /// Byte offset.
        offset: usize,
    },

    /// Clusters are nested deeper than the parser allows.
    #[error("clusters are nested more than {limit} levels deep (byte {offset})")]
    NestingTooDeep {
        /// Maximum nesting depth.
        limit: usize,
        /// Byte offset of the opening bracket that exceeded it.
        offset: usize,
    },
}

impl QueryError {
    /// Byte offset in the source where the error was detected.
    pub fn offset(&self) -> usize {
        match self {
            QueryError::MissingRootObject { offset, .. }
            | QueryError::UnterminatedObject { offset }
            | QueryError::UnterminatedFilter { offset, .. }
            | QueryError::UnterminatedCalculator { offset }
            | QueryError::UnknownFilter { offset, .. }
            | QueryError::MissingOperator { offset, .. }
            | QueryError::UnknownOperator { offset, .. }
            | QueryError::MissingArgument { offset, .. }
            | QueryError::UnterminatedArgument { offset, .. }
            | QueryError::DanglingConnector { offset, .. }
            | QueryError::MissingConnector { offset }
            | QueryError::InvalidOperandType { offset, .. }
            | QueryError::UnknownArithmetic { offset, .. }
            | QueryError::MalformedOperand { offset }
            | QueryError::EmptyCalculator { offset }
            | QueryError::DanglingArithmetic { offset, .. }
            | QueryError::NestingTooDeep { offset, .. } => *offset,
        }
    }
}

/// Any failure of a compilation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompileError {
    /// Internal cursor bookkeeping failure.
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),

    /// Invalid query text.
    #[error("query error: {0}")]
    Query(#[from] QueryError),
}

impl CompileError {
    /// Returns the query error, if this is one.
    pub fn as_query_error(&self) -> Option<&QueryError> {
        match self {
            CompileError::Query(e) => Some(e),
            CompileError::Structural(_) => None,
        }
    }

    /// Byte offset of a query error.
    pub fn offset(&self) -> Option<usize> {
        self.as_query_error().map(QueryError::offset)
    }
}

fn describe_found(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("'{c}'"),
        None => "only whitespace".to_string(),
    }
}

fn describe_suggestion(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{s}'?"),
        None => String::new(),
    }
}

fn describe_unterminated(captured: &bool) -> &'static str {
    if *captured {
        "is not closed; arguments must end with '\"'"
    } else {
        "is empty or malformed; arguments must be enclosed in '\"'"
    }
}
