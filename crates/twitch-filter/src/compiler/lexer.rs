//! Character classification for the query language.
//!
//! The lexer is a pure function over single characters. It never moves the
//! cursor; all positioning belongs to the parser.

/// Token class of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Space, tab, carriage return or line feed.
    Whitespace,
    /// `(`, `{` or `[`.
    OpenBracket,
    /// `)`, `}` or `]`.
    CloseBracket,
    /// `'`.
    SingleQuote,
    /// `"`.
    DoubleQuote,
    /// `&`.
    LogicalAnd,
    /// `|`.
    LogicalOr,
    /// `^`.
    LogicalXor,
    /// `\`.
    Escape,
    /// `#`.
    Sharp,
    /// Anything else.
    Unknown,
}

/// Classifies a character.
///
/// Bracket styles are interchangeable and never matched against each other.
pub fn classify(c: char) -> TokenKind {
    match c {
        ' ' | '\t' | '\r' | '\n' => TokenKind::Whitespace,
        '(' | '{' | '[' => TokenKind::OpenBracket,
        ')' | '}' | ']' => TokenKind::CloseBracket,
        '\'' => TokenKind::SingleQuote,
        '"' => TokenKind::DoubleQuote,
        '&' => TokenKind::LogicalAnd,
        '|' => TokenKind::LogicalOr,
        '^' => TokenKind::LogicalXor,
        '\\' => TokenKind::Escape,
        '#' => TokenKind::Sharp,
        _ => TokenKind::Unknown,
    }
}

/// Whether `c` may appear in a filter identifier (`[A-Za-z_]`).
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
