//! Recursive descent parser for filter queries.

use super::ast::{
    ArithmeticOperator, CalculationOperand, Calculator, ClusterId, ComparisonOperator,
    FilterCluster, FilterNode, FilterReference, LogicalOperator, OperandValue, Query,
};
use super::cursor::Cursor;
use super::diagnostic::Diagnostic;
use super::error::{CompileResult, QueryError};
use super::lexer::{classify, is_identifier_char, TokenKind};
use crate::registry::{suggest_identifier, FilterDescriptor, FilterKind, FilterRegistry};

/// Name reported in errors raised while scanning a calculator's comparison.
const CALCULATOR_NAME: &str = "#calc";

/// Deepest cluster nesting accepted, counting the root cluster.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parser state for a single compilation.
///
/// The parser walks the source one character at a time. Every scan starts by
/// advancing onto the next character and leaves the cursor on the last
/// character it consumed; scans that stop on a token belonging to their
/// caller step back so the caller observes it.
///
/// # Grammar
///
/// ```text
/// query        := '{' cluster-body
/// cluster-body := (space | child-cluster | calculator | filter | connector)* '}'
/// filter       := identifier operator '"' argument '"' connector?
/// calculator   := '#(' operand (arith-op operand)* ')' operator '"' argument '"' connector?
/// operand      := identifier | digits
/// connector    := '&' | '|' | '^'
/// ```
pub(crate) struct QueryParser<'r, 'd, R: FilterRegistry + ?Sized> {
    cursor: Cursor,
    registry: &'r R,
    on_diagnostic: &'d mut dyn FnMut(Diagnostic),
    next_cluster_id: usize,
    depth: usize,
}

impl<'r, 'd, R: FilterRegistry + ?Sized> QueryParser<'r, 'd, R> {
    /// Compiles `source`, returning `None` when it is empty.
    pub(crate) fn parse(
        source: &str,
        registry: &'r R,
        on_diagnostic: &'d mut dyn FnMut(Diagnostic),
    ) -> CompileResult<Option<Query>> {
        let Some(cursor) = Cursor::new(source) else {
            return Ok(None);
        };

        let mut parser = Self {
            cursor,
            registry,
            on_diagnostic,
            next_cluster_id: 0,
            depth: 0,
        };
        parser.parse_query().map(Some)
    }

    /// Skips leading whitespace and parses the root cluster.
    ///
    /// Anything after the root cluster closes is not read.
    fn parse_query(&mut self) -> CompileResult<Query> {
        loop {
            let c = self.cursor.current();
            match classify(c) {
                TokenKind::Whitespace => {
                    if !self.cursor.has_next() {
                        return Err(QueryError::MissingRootObject {
                            found: None,
                            offset: self.cursor.offset(),
                        }
                        .into());
                    }
                    self.cursor.advance()?;
                }
                TokenKind::OpenBracket => {
                    let root = self.parse_cluster(None)?;
                    return Ok(Query::new(root.children));
                }
                _ => {
                    return Err(QueryError::MissingRootObject {
                        found: Some(c),
                        offset: self.cursor.offset(),
                    }
                    .into())
                }
            }
        }
    }

    fn allocate_cluster_id(&mut self) -> ClusterId {
        let id = ClusterId(self.next_cluster_id);
        self.next_cluster_id += 1;
        id
    }

    // ==================== Clusters ====================

    /// Parses a cluster; the cursor is on its opening bracket.
    ///
    /// Fails with [`QueryError::NestingTooDeep`] rather than recursing past
    /// [`MAX_NESTING_DEPTH`].
    fn parse_cluster(&mut self, parent: Option<ClusterId>) -> CompileResult<FilterCluster> {
        if self.depth == MAX_NESTING_DEPTH {
            return Err(QueryError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                offset: self.cursor.offset(),
            }
            .into());
        }

        self.depth += 1;
        let cluster = self.parse_cluster_body(parent);
        self.depth -= 1;
        cluster
    }

    fn parse_cluster_body(&mut self, parent: Option<ClusterId>) -> CompileResult<FilterCluster> {
        let mut cluster = FilterCluster::new(self.allocate_cluster_id(), parent);

        loop {
            if !self.cursor.has_next() {
                return Err(QueryError::UnterminatedObject {
                    offset: self.cursor.offset(),
                }
                .into());
            }
            self.cursor.advance()?;
            let offset = self.cursor.offset();

            match classify(self.cursor.current()) {
                TokenKind::Whitespace => {}
                TokenKind::OpenBracket => {
                    let child = self.parse_cluster(Some(cluster.id))?;
                    append_child(&mut cluster, FilterNode::Cluster(child), offset)?;
                }
                TokenKind::CloseBracket => return Ok(cluster),
                TokenKind::Sharp => {
                    if !self.cursor.has_next() {
                        return Err(QueryError::UnterminatedObject { offset }.into());
                    }
                    self.cursor.advance()?;
                    // Only `#(` starts a calculator; the character after any
                    // other `#` is consumed without producing a node.
                    if classify(self.cursor.current()) == TokenKind::OpenBracket {
                        let calculator = self.parse_calculator(cluster.id, offset)?;
                        append_child(&mut cluster, FilterNode::Calculator(calculator), offset)?;
                    }
                }
                TokenKind::LogicalAnd => attach_connector(&mut cluster, LogicalOperator::And, offset)?,
                TokenKind::LogicalOr => attach_connector(&mut cluster, LogicalOperator::Or, offset)?,
                TokenKind::LogicalXor => attach_connector(&mut cluster, LogicalOperator::Xor, offset)?,
                _ => {
                    let filter = self.parse_filter()?;
                    append_child(&mut cluster, FilterNode::Filter(filter), offset)?;
                }
            }
        }
    }

    // ==================== Filters ====================

    /// Parses a filter; the cursor is on its first character.
    fn parse_filter(&mut self) -> CompileResult<FilterReference> {
        let start = self.cursor.offset();
        self.cursor.retreat()?;

        let identifier = self.scan_identifier()?;
        let kind = self.resolve_filter(&identifier, start)?.kind;
        self.cursor.retreat()?;

        let comparison = self.scan_comparison(&identifier)?;
        let argument = self.scan_argument(&identifier)?;
        let logical_operator = self.scan_connector()?;

        Ok(FilterReference {
            identifier,
            kind,
            comparison,
            argument,
            logical_operator,
        })
    }

    /// Reads `[A-Za-z_]*`, stopping on whitespace or any other character.
    fn scan_identifier(&mut self) -> CompileResult<String> {
        let mut identifier = String::new();

        loop {
            if !self.cursor.has_next() {
                return Err(QueryError::UnterminatedFilter {
                    filter: identifier,
                    offset: self.cursor.offset(),
                }
                .into());
            }
            self.cursor.advance()?;

            let c = self.cursor.current();
            match classify(c) {
                TokenKind::Whitespace => break,
                TokenKind::CloseBracket => {
                    return Err(QueryError::MissingOperator {
                        filter: identifier,
                        offset: self.cursor.offset(),
                    }
                    .into())
                }
                _ if is_identifier_char(c) => identifier.push(c),
                _ => break,
            }
        }

        Ok(identifier)
    }

    fn resolve_filter(
        &self,
        identifier: &str,
        offset: usize,
    ) -> Result<&'r FilterDescriptor, QueryError> {
        let registry: &'r R = self.registry;
        registry
            .lookup(identifier)
            .ok_or_else(|| QueryError::UnknownFilter {
                identifier: identifier.to_string(),
                suggestion: suggest_identifier(registry, identifier),
                offset,
            })
    }

    /// Reads the punctuation between an identifier and its argument.
    ///
    /// Leaves the cursor on the last symbol character.
    fn scan_comparison(&mut self, filter: &str) -> CompileResult<ComparisonOperator> {
        let mut symbol = String::new();
        let mut symbol_offset = None;

        loop {
            if !self.cursor.has_next() {
                return Err(QueryError::UnterminatedFilter {
                    filter: filter.to_string(),
                    offset: self.cursor.offset(),
                }
                .into());
            }
            self.cursor.advance()?;

            let c = self.cursor.current();
            match classify(c) {
                TokenKind::Whitespace => {
                    if !symbol.is_empty() {
                        break;
                    }
                }
                TokenKind::DoubleQuote => break,
                TokenKind::CloseBracket => {
                    let filter = filter.to_string();
                    let offset = self.cursor.offset();
                    let error = if symbol.is_empty() {
                        QueryError::MissingOperator { filter, offset }
                    } else {
                        QueryError::MissingArgument { filter, offset }
                    };
                    return Err(error.into());
                }
                _ if is_identifier_char(c) => break,
                _ => {
                    symbol_offset.get_or_insert(self.cursor.offset());
                    symbol.push(c);
                }
            }
        }

        let Some(symbol_offset) = symbol_offset else {
            return Err(QueryError::MissingOperator {
                filter: filter.to_string(),
                offset: self.cursor.offset(),
            }
            .into());
        };
        self.cursor.retreat()?;

        ComparisonOperator::from_symbol(&symbol).ok_or_else(|| {
            QueryError::UnknownOperator {
                filter: filter.to_string(),
                symbol,
                offset: symbol_offset,
            }
            .into()
        })
    }

    /// Reads a double-quoted argument, decoding escapes.
    ///
    /// Whitespace is dropped even between the quotes. Leaves the cursor on
    /// the closing quote.
    fn scan_argument(&mut self, filter: &str) -> CompileResult<String> {
        let mut argument = String::new();
        let mut quotes = 0;

        loop {
            if !self.cursor.has_next() {
                return Err(self.unfinished_argument(filter, quotes, &argument).into());
            }
            self.cursor.advance()?;

            let c = self.cursor.current();
            match classify(c) {
                TokenKind::Whitespace => {}
                TokenKind::Escape => {
                    if !self.cursor.has_next() {
                        return Err(self.unfinished_argument(filter, quotes, &argument).into());
                    }
                    self.cursor.advance()?;
                    argument.push(decode_escape(self.cursor.current()));
                }
                TokenKind::DoubleQuote => {
                    quotes += 1;
                    if quotes == 2 {
                        break;
                    }
                }
                TokenKind::CloseBracket => {
                    return Err(self.unfinished_argument(filter, quotes, &argument).into());
                }
                _ => {
                    if quotes == 1 {
                        argument.push(c);
                    }
                }
            }
        }

        Ok(argument)
    }

    fn unfinished_argument(&self, filter: &str, quotes: usize, argument: &str) -> QueryError {
        let filter = filter.to_string();
        let offset = self.cursor.offset();
        if quotes == 0 {
            QueryError::MissingArgument { filter, offset }
        } else {
            QueryError::UnterminatedArgument {
                filter,
                captured: !argument.is_empty(),
                offset,
            }
        }
    }

    /// Looks ahead for the connector following a filter or calculator.
    ///
    /// Steps back so the enclosing cluster sees the connector or closing
    /// bracket again. Other characters are reported and skipped.
    fn scan_connector(&mut self) -> CompileResult<LogicalOperator> {
        loop {
            if !self.cursor.has_next() {
                return Err(QueryError::UnterminatedObject {
                    offset: self.cursor.offset(),
                }
                .into());
            }
            self.cursor.advance()?;

            let c = self.cursor.current();
            let operator = match classify(c) {
                TokenKind::Whitespace => continue,
                TokenKind::CloseBracket => LogicalOperator::None,
                TokenKind::LogicalAnd => LogicalOperator::And,
                TokenKind::LogicalOr => LogicalOperator::Or,
                TokenKind::LogicalXor => LogicalOperator::Xor,
                _ => {
                    (self.on_diagnostic)(Diagnostic::UnexpectedCharacter {
                        found: c,
                        offset: self.cursor.offset(),
                    });
                    continue;
                }
            };

            self.cursor.retreat()?;
            return Ok(operator);
        }
    }

    // ==================== Calculators ====================

    /// Parses a calculator; the cursor is on the bracket after `#`.
    fn parse_calculator(&mut self, parent: ClusterId, start: usize) -> CompileResult<Calculator> {
        let mut operands: Vec<CalculationOperand> = Vec::new();

        loop {
            if self.cursor.remaining() < 2 {
                return Err(QueryError::UnterminatedCalculator {
                    offset: self.cursor.offset(),
                }
                .into());
            }
            self.cursor.advance()?;

            match classify(self.cursor.current()) {
                // Calculators are flat: inner brackets are skipped, not nested.
                TokenKind::Whitespace | TokenKind::OpenBracket => {}
                TokenKind::CloseBracket => break,
                _ => {
                    let operand = self.parse_operand()?;
                    let closed = classify(self.cursor.current()) == TokenKind::CloseBracket;
                    operands.push(operand);
                    if closed {
                        break;
                    }
                }
            }
        }

        match operands.last() {
            None => return Err(QueryError::EmptyCalculator { offset: start }.into()),
            Some(CalculationOperand {
                arithmetic: Some(operator),
                ..
            }) => {
                return Err(QueryError::DanglingArithmetic {
                    operator: *operator,
                    offset: self.cursor.offset(),
                }
                .into())
            }
            Some(_) => {}
        }

        let comparison = self.scan_comparison(CALCULATOR_NAME)?;
        let argument = self.scan_argument(CALCULATOR_NAME)?;
        let logical_operator = self.scan_connector()?;

        Ok(Calculator {
            parent,
            operands,
            comparison,
            argument,
            logical_operator,
        })
    }

    /// Parses one operand; the cursor is on its first character.
    ///
    /// Stops on the arithmetic operator that follows it, or on the closing
    /// bracket of the operand list.
    fn parse_operand(&mut self) -> CompileResult<CalculationOperand> {
        let start = self.cursor.offset();
        let mut identifier = String::new();
        let mut digits = String::new();
        let mut arithmetic = None;

        loop {
            let c = self.cursor.current();
            match classify(c) {
                TokenKind::Whitespace => {}
                TokenKind::CloseBracket => break,
                _ if is_identifier_char(c) => identifier.push(c),
                _ if c.is_ascii_digit() => digits.push(c),
                _ => {
                    let operator = ArithmeticOperator::from_char(c).ok_or_else(|| {
                        QueryError::UnknownArithmetic {
                            symbol: c,
                            offset: self.cursor.offset(),
                        }
                    })?;
                    arithmetic = Some(operator);
                    break;
                }
            }

            if !self.cursor.has_next() {
                return Err(QueryError::UnterminatedCalculator {
                    offset: self.cursor.offset(),
                }
                .into());
            }
            self.cursor.advance()?;
        }

        let value = self.resolve_operand(identifier, digits, start)?;
        Ok(CalculationOperand { value, arithmetic })
    }

    fn resolve_operand(
        &self,
        identifier: String,
        digits: String,
        offset: usize,
    ) -> Result<OperandValue, QueryError> {
        match (identifier.is_empty(), digits.is_empty()) {
            (true, false) => Ok(OperandValue::Literal(digits)),
            (false, true) => {
                let kind = self.resolve_filter(&identifier, offset)?.kind;
                if kind != FilterKind::Numerical {
                    return Err(QueryError::InvalidOperandType {
                        identifier,
                        kind,
                        offset,
                    });
                }
                Ok(OperandValue::Filter(identifier))
            }
            _ => Err(QueryError::MalformedOperand { offset }),
        }
    }
}

/// Appends a node, requiring the previous sibling to carry a connector.
fn append_child(
    cluster: &mut FilterCluster,
    node: FilterNode,
    offset: usize,
) -> Result<(), QueryError> {
    if let Some(previous) = cluster.children.last() {
        if previous.logical_operator() == LogicalOperator::None {
            return Err(QueryError::MissingConnector { offset });
        }
    }
    cluster.children.push(node);
    Ok(())
}

/// Sets the connector of the most recently appended node.
fn attach_connector(
    cluster: &mut FilterCluster,
    connector: LogicalOperator,
    offset: usize,
) -> Result<(), QueryError> {
    match cluster.children.last_mut() {
        Some(node) => {
            node.set_logical_operator(connector);
            Ok(())
        }
        None => Err(QueryError::DanglingConnector { connector, offset }),
    }
}

fn decode_escape(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        other => other,
    }
}
