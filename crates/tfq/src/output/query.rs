//! Compiled query output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use twitch_filter_rs::compiler::{CalculationOperand, FilterNode, OperandValue};
use twitch_filter_rs::{Diagnostic, Query};

use super::helpers::{format_connector, format_kind, plural, quote_argument};

/// Node counts of a compiled query.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryStats {
    pub filters: usize,
    pub calculators: usize,
    /// Nested clusters; the root is not counted.
    pub clusters: usize,
    /// Deepest cluster nesting below the root.
    pub depth: usize,
}

impl QueryStats {
    /// Counts the nodes of `query`.
    pub fn of(query: &Query) -> Self {
        let mut stats = Self::default();
        stats.visit(query.nodes(), 0);
        stats
    }

    fn visit(&mut self, nodes: &[FilterNode], depth: usize) {
        self.depth = self.depth.max(depth);
        for node in nodes {
            match node {
                FilterNode::Filter(_) => self.filters += 1,
                FilterNode::Calculator(_) => self.calculators += 1,
                FilterNode::Cluster(cluster) => {
                    self.clusters += 1;
                    self.visit(&cluster.children, depth + 1);
                }
            }
        }
    }
}

/// JSON output structure for the check command.
#[derive(Serialize)]
pub struct CheckOutput<'a> {
    pub valid: bool,
    pub empty: bool,
    #[serde(flatten)]
    pub stats: QueryStats,
    pub diagnostics: &'a [Diagnostic],
}

/// Formats a successful check as JSON.
pub fn format_check_json(
    query: Option<&Query>,
    diagnostics: &[Diagnostic],
) -> Result<String, serde_json::Error> {
    let output = CheckOutput {
        valid: true,
        empty: query.is_none(),
        stats: query.map(QueryStats::of).unwrap_or_default(),
        diagnostics,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats a successful check as a one-line summary.
pub fn format_check_summary(query: Option<&Query>, use_colors: bool) -> String {
    let Some(query) = query else {
        return "Empty query: nothing to filter.\n".to_string();
    };

    let stats = QueryStats::of(query);
    let label = if use_colors {
        "Valid query:".green().bold().to_string()
    } else {
        "Valid query:".to_string()
    };

    format!(
        "{} {}, {}, {}\n",
        label,
        plural(stats.filters, "filter"),
        plural(stats.calculators, "calculator"),
        plural(stats.clusters, "cluster"),
    )
}

/// JSON output structure for the ast command.
#[derive(Serialize)]
pub struct AstOutput<'a> {
    pub query: Option<&'a Query>,
    pub diagnostics: &'a [Diagnostic],
}

/// Formats a compiled query as JSON.
pub fn format_query_json(
    query: Option<&Query>,
    diagnostics: &[Diagnostic],
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&AstOutput { query, diagnostics })
}

/// Formats a compiled query as an indented tree.
pub fn format_query_tree(query: Option<&Query>, use_colors: bool) -> String {
    let Some(query) = query else {
        return "(empty query)\n".to_string();
    };

    let mut output = String::new();
    if use_colors {
        output.push_str(&format!("{}\n", "query".bold()));
    } else {
        output.push_str("query\n");
    }
    write_children(&mut output, query.nodes(), "", use_colors);
    output
}

fn write_children(output: &mut String, nodes: &[FilterNode], prefix: &str, use_colors: bool) {
    for (i, node) in nodes.iter().enumerate() {
        let (branch, indent) = if i + 1 == nodes.len() {
            ("└─ ", "   ")
        } else {
            ("├─ ", "│  ")
        };

        output.push_str(prefix);
        output.push_str(branch);
        output.push_str(&describe_node(node, use_colors));
        output.push_str(&format_connector(node.logical_operator(), use_colors));
        output.push('\n');

        if let FilterNode::Cluster(cluster) = node {
            write_children(output, &cluster.children, &format!("{prefix}{indent}"), use_colors);
        }
    }
}

fn describe_node(node: &FilterNode, use_colors: bool) -> String {
    match node {
        FilterNode::Filter(filter) => {
            let identifier = if use_colors {
                filter.identifier.bold().to_string()
            } else {
                filter.identifier.clone()
            };
            format!(
                "{} {} {} ({})",
                identifier,
                filter.comparison.symbol(),
                quote_argument(&filter.argument),
                format_kind(filter.kind, use_colors),
            )
        }
        FilterNode::Calculator(calculator) => format!(
            "#({}) {} {}",
            format_expression(&calculator.operands),
            calculator.comparison.symbol(),
            quote_argument(&calculator.argument),
        ),
        FilterNode::Cluster(cluster) => {
            let label = format!("cluster {}", cluster.id);
            if use_colors {
                label.dimmed().to_string()
            } else {
                label
            }
        }
    }
}

/// Renders calculator operands back into arithmetic notation.
fn format_expression(operands: &[CalculationOperand]) -> String {
    let mut expression = String::new();
    for operand in operands {
        match &operand.value {
            OperandValue::Filter(identifier) => expression.push_str(identifier),
            OperandValue::Literal(digits) => expression.push_str(digits),
        }
        if let Some(operator) = operand.arithmetic {
            expression.push_str(&format!(" {operator} "));
        }
    }
    expression
}
