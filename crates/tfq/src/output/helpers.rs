//! Common helper functions for output formatting.

use owo_colors::OwoColorize;
use twitch_filter_rs::compiler::LogicalOperator;
use twitch_filter_rs::{Diagnostic, FilterKind};

/// Formats a diagnostic as a warning line.
pub fn format_warning(diagnostic: &Diagnostic, use_colors: bool) -> String {
    let label = if use_colors {
        "warning:".yellow().bold().to_string()
    } else {
        "warning:".to_string()
    };
    format!("{label} {diagnostic}")
}

/// Formats a filter kind for display.
pub fn format_kind(kind: FilterKind, use_colors: bool) -> String {
    let label = kind.to_string();
    if use_colors {
        match kind {
            FilterKind::Numerical => label.cyan().to_string(),
            FilterKind::Text => label.magenta().to_string(),
        }
    } else {
        label
    }
}

/// Formats the connector after a node, empty when there is none.
pub fn format_connector(operator: LogicalOperator, use_colors: bool) -> String {
    match operator.symbol() {
        Some(symbol) if use_colors => format!(" {}", symbol.to_string().yellow()),
        Some(symbol) => format!(" {symbol}"),
        None => String::new(),
    }
}

/// Quotes an argument, escaping control characters.
pub fn quote_argument(argument: &str) -> String {
    format!("{argument:?}")
}

/// Pluralizes `noun` for `count`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_warning_plain() {
        let diagnostic = Diagnostic::UnexpectedCharacter {
            found: 'x',
            offset: 7,
        };
        assert_eq!(
            format_warning(&diagnostic, false),
            "warning: ignored unexpected character 'x' while looking for a connector (byte 7)"
        );
    }

    #[test]
    fn test_format_connector() {
        assert_eq!(format_connector(LogicalOperator::And, false), " &");
        assert_eq!(format_connector(LogicalOperator::Xor, false), " ^");
        assert_eq!(format_connector(LogicalOperator::None, false), "");
        assert_eq!(format_connector(LogicalOperator::None, true), "");
    }

    #[test]
    fn test_quote_argument_escapes_newlines() {
        assert_eq!(quote_argument("a\nb"), r#""a\nb""#);
        assert_eq!(quote_argument("100"), r#""100""#);
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(0, "filter"), "0 filters");
        assert_eq!(plural(1, "filter"), "1 filter");
        assert_eq!(plural(2, "cluster"), "2 clusters");
    }

    #[test]
    fn test_format_kind_plain() {
        assert_eq!(format_kind(FilterKind::Numerical, false), "numerical");
        assert_eq!(format_kind(FilterKind::Text, false), "text");
    }
}
