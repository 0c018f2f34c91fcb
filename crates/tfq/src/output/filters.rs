//! Filter registry output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use twitch_filter_rs::FilterKind;

use super::helpers::format_kind;

/// Where a filter definition comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterSource {
    Builtin,
    Config,
}

impl FilterSource {
    fn label(self) -> &'static str {
        match self {
            FilterSource::Builtin => "builtin",
            FilterSource::Config => "config",
        }
    }
}

/// JSON output structure for a single filter.
#[derive(Debug, Serialize)]
pub struct FilterOutput<'a> {
    pub id: &'a str,
    pub kind: FilterKind,
    pub source: FilterSource,
}

/// JSON output structure for the filters command.
#[derive(Serialize)]
pub struct FiltersListOutput<'a> {
    pub filters: &'a [FilterOutput<'a>],
}

/// Formats filters as JSON.
pub fn format_filters_json(filters: &[FilterOutput<'_>]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&FiltersListOutput { filters })
}

/// Formats filters as a table.
pub fn format_filters_table(filters: &[FilterOutput<'_>], use_colors: bool) -> String {
    if filters.is_empty() {
        return "No filters registered.\n".to_string();
    }

    let width = filters
        .iter()
        .map(|f| f.id.len())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    let mut output = String::new();

    let header = format!("{:<width$}  {:<9}  {}", "ID", "Kind", "Source");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for filter in filters {
        // Escape codes would skew `{:<9}`, so pad by hand.
        let padding = " ".repeat(9usize.saturating_sub(filter.kind.to_string().len()));
        let kind = format!("{}{}", format_kind(filter.kind, use_colors), padding);
        output.push_str(&format!(
            "{:<width$}  {}  {}\n",
            filter.id,
            kind,
            filter.source.label()
        ));
    }

    output
}
