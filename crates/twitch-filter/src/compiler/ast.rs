//! Abstract Syntax Tree (AST) for compiled queries.

use std::fmt;

use serde::Serialize;

use crate::registry::FilterKind;

/// Comparison applied between a filter's output and its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    /// `:`
    Include,
    /// `.`
    IncludeTolerance,
    /// `::`
    Regex,
    /// `==`
    Equal,
    /// `!=`
    Unequal,
    /// `>`
    GreaterThan,
    /// `<`
    LessThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<=`
    LessThanOrEqual,
}

impl ComparisonOperator {
    /// Resolves an operator symbol by exact match.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ":" => Some(ComparisonOperator::Include),
            "." => Some(ComparisonOperator::IncludeTolerance),
            "::" => Some(ComparisonOperator::Regex),
            "==" => Some(ComparisonOperator::Equal),
            "!=" => Some(ComparisonOperator::Unequal),
            ">" => Some(ComparisonOperator::GreaterThan),
            "<" => Some(ComparisonOperator::LessThan),
            ">=" => Some(ComparisonOperator::GreaterThanOrEqual),
            "<=" => Some(ComparisonOperator::LessThanOrEqual),
            _ => None,
        }
    }

    /// The operator's symbol in query text.
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Include => ":",
            ComparisonOperator::IncludeTolerance => ".",
            ComparisonOperator::Regex => "::",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::Unequal => "!=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThanOrEqual => "<=",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Arithmetic linking a calculator operand to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithmeticOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl ArithmeticOperator {
    /// Resolves an arithmetic operator character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(ArithmeticOperator::Add),
            '-' => Some(ArithmeticOperator::Sub),
            '*' => Some(ArithmeticOperator::Mul),
            '/' => Some(ArithmeticOperator::Div),
            _ => None,
        }
    }

    /// The operator's symbol in query text.
    pub fn symbol(self) -> char {
        match self {
            ArithmeticOperator::Add => '+',
            ArithmeticOperator::Sub => '-',
            ArithmeticOperator::Mul => '*',
            ArithmeticOperator::Div => '/',
        }
    }
}

impl fmt::Display for ArithmeticOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// How a node combines with the next sibling in its cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOperator {
    /// `&`
    And,
    /// `|`
    Or,
    /// `^`
    Xor,
    /// Terminator: the node is the last of its cluster.
    #[default]
    None,
}

impl LogicalOperator {
    /// The connector's symbol, `None` for the terminator.
    pub fn symbol(self) -> Option<char> {
        match self {
            LogicalOperator::And => Some('&'),
            LogicalOperator::Or => Some('|'),
            LogicalOperator::Xor => Some('^'),
            LogicalOperator::None => None,
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(c) => write!(f, "{c}"),
            None => f.write_str("none"),
        }
    }
}

/// Identifies a cluster within one compiled query.
///
/// Clusters are numbered in the order their opening bracket appears; the root
/// cluster is always [`ClusterId::ROOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClusterId(pub usize);

impl ClusterId {
    /// The root cluster whose children form the [`Query`].
    pub const ROOT: ClusterId = ClusterId(0);
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One occurrence of a named filter in the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterReference {
    /// Registered identifier.
    pub identifier: String,
    /// Kind reported by the registry.
    pub kind: FilterKind,
    /// Comparison against the argument.
    pub comparison: ComparisonOperator,
    /// Escape-decoded argument text.
    pub argument: String,
    /// Connector to the next sibling.
    pub logical_operator: LogicalOperator,
}

/// Value of a calculator operand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OperandValue {
    /// Output of a numerical filter, by identifier.
    Filter(String),
    /// Decimal digits.
    Literal(String),
}

/// One term of a calculator's arithmetic expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationOperand {
    /// The operand value.
    pub value: OperandValue,
    /// Operator linking to the next operand; `None` on the last one.
    pub arithmetic: Option<ArithmeticOperator>,
}

impl CalculationOperand {
    /// Filter identifier, if the operand is a filter.
    pub fn filter_identifier(&self) -> Option<&str> {
        match &self.value {
            OperandValue::Filter(id) => Some(id),
            OperandValue::Literal(_) => None,
        }
    }

    /// Literal digits, if the operand is a literal.
    pub fn literal(&self) -> Option<&str> {
        match &self.value {
            OperandValue::Literal(digits) => Some(digits),
            OperandValue::Filter(_) => None,
        }
    }
}

/// Arithmetic over operands, compared against an argument like a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Calculator {
    /// Cluster the calculator belongs to.
    pub parent: ClusterId,
    /// Operands in source order.
    pub operands: Vec<CalculationOperand>,
    /// Comparison against the argument.
    pub comparison: ComparisonOperator,
    /// Escape-decoded argument text.
    pub argument: String,
    /// Connector to the next sibling.
    pub logical_operator: LogicalOperator,
}

/// A bracketed group of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCluster {
    /// This cluster's id.
    pub id: ClusterId,
    /// Enclosing cluster; `None` only for the root.
    pub parent: Option<ClusterId>,
    /// Children in source order.
    pub children: Vec<FilterNode>,
    /// Connector to the next sibling.
    pub logical_operator: LogicalOperator,
}

impl FilterCluster {
    pub(crate) fn new(id: ClusterId, parent: Option<ClusterId>) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            logical_operator: LogicalOperator::None,
        }
    }
}

/// A child of a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum FilterNode {
    /// A filter predicate.
    Filter(FilterReference),
    /// An arithmetic comparison.
    Calculator(Calculator),
    /// A nested group.
    Cluster(FilterCluster),
}

impl FilterNode {
    /// Connector to the next sibling.
    pub fn logical_operator(&self) -> LogicalOperator {
        match self {
            FilterNode::Filter(f) => f.logical_operator,
            FilterNode::Calculator(c) => c.logical_operator,
            FilterNode::Cluster(c) => c.logical_operator,
        }
    }

    pub(crate) fn set_logical_operator(&mut self, operator: LogicalOperator) {
        match self {
            FilterNode::Filter(f) => f.logical_operator = operator,
            FilterNode::Calculator(c) => c.logical_operator = operator,
            FilterNode::Cluster(c) => c.logical_operator = operator,
        }
    }

    /// Returns the filter, if this node is one.
    pub fn as_filter(&self) -> Option<&FilterReference> {
        match self {
            FilterNode::Filter(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the calculator, if this node is one.
    pub fn as_calculator(&self) -> Option<&Calculator> {
        match self {
            FilterNode::Calculator(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the cluster, if this node is one.
    pub fn as_cluster(&self) -> Option<&FilterCluster> {
        match self {
            FilterNode::Cluster(c) => Some(c),
            _ => None,
        }
    }
}

/// A compiled query: the children of the root cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Query {
    nodes: Vec<FilterNode>,
}

impl Query {
    pub(crate) fn new(nodes: Vec<FilterNode>) -> Self {
        Self { nodes }
    }

    /// Top-level nodes in source order.
    pub fn nodes(&self) -> &[FilterNode] {
        &self.nodes
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the root cluster was empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over top-level nodes.
    pub fn iter(&self) -> std::slice::Iter<'_, FilterNode> {
        self.nodes.iter()
    }

    /// Consumes the query, returning its top-level nodes.
    pub fn into_nodes(self) -> Vec<FilterNode> {
        self.nodes
    }
}

impl<'a> IntoIterator for &'a Query {
    type Item = &'a FilterNode;
    type IntoIter = std::slice::Iter<'a, FilterNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
