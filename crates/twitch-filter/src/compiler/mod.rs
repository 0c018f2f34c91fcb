//! Compiler for the bracket-delimited filter query language.
//!
//! A query describes which posts to accept by combining named filters,
//! nested clusters, calculators and logical connectors. Compilation produces
//! a [`Query`] AST; evaluating it is left to the host application.
//!
//! # Syntax
//!
//! ## Filters
//! `identifier operator "argument"`, e.g. `favorite_count > "100"`.
//! Identifiers are `[A-Za-z_]+` and must be registered in the
//! [`FilterRegistry`].
//!
//! ## Comparison Operators
//! - `:` - include
//! - `.` - include with tolerance
//! - `::` - regular expression
//! - `==`, `!=` - equality
//! - `>`, `<`, `>=`, `<=` - ordering
//!
//! ## Arguments
//! Arguments are enclosed in double quotes. `\n` and `\r` decode to line
//! feed and carriage return; any other escaped character is taken literally.
//! Whitespace inside an argument is dropped: `"a b"` reads as `ab`.
//!
//! ## Connectors
//! - `&` - AND
//! - `|` - OR
//! - `^` - XOR
//!
//! A connector binds to the node before it.
//!
//! ## Clusters
//! `{ ... }`, `( ... )` and `[ ... ]` group nodes. Bracket styles are
//! interchangeable and are not matched against each other. Clusters may
//! nest at most [`MAX_NESTING_DEPTH`] levels, counting the outermost one.
//!
//! ## Calculators
//! `#(operand + operand ...) operator "argument"` applies `+ - * /` to
//! numerical filters and integer literals, then compares the result.
//!
//! # Example
//!
//! ```
//! use twitch_filter_rs::compiler::{Compiler, FilterNode, LogicalOperator};
//! use twitch_filter_rs::FilterSet;
//!
//! let filters = FilterSet::builtin();
//! let compiler = Compiler::new(&filters);
//!
//! let query = compiler
//!     .compile(r#"{favorite_count>"10" & text::"rust"}"#)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(query.len(), 2);
//! assert_eq!(query.nodes()[0].logical_operator(), LogicalOperator::And);
//! assert!(matches!(query.nodes()[1], FilterNode::Filter(_)));
//!
//! // Empty input compiles to nothing.
//! assert!(compiler.compile("").unwrap().is_none());
//! ```

mod ast;
mod cursor;
mod diagnostic;
mod error;
mod lexer;
mod parser;

pub use ast::{
    ArithmeticOperator, CalculationOperand, Calculator, ClusterId, ComparisonOperator,
    FilterCluster, FilterNode, FilterReference, LogicalOperator, OperandValue, Query,
};
pub use cursor::Cursor;
pub use diagnostic::Diagnostic;
pub use error::{CompileError, CompileResult, QueryError, StructuralError};
pub use lexer::{classify, is_identifier_char, TokenKind};

use crate::registry::{FilterRegistry, FilterSet};
use parser::QueryParser;
pub use parser::MAX_NESTING_DEPTH;

/// Compiles query text against a filter registry.
///
/// A `Compiler` only borrows its registry. Every call builds its own parsing
/// context, so one compiler can serve any number of compilations, including
/// concurrent ones when the registry is `Sync`.
pub struct Compiler<'r, R: FilterRegistry + ?Sized = FilterSet> {
    registry: &'r R,
}

impl<R: FilterRegistry + ?Sized> Clone for Compiler<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: FilterRegistry + ?Sized> Copy for Compiler<'_, R> {}

impl<'r, R: FilterRegistry + ?Sized> Compiler<'r, R> {
    /// Creates a compiler over `registry`.
    pub fn new(registry: &'r R) -> Self {
        Self { registry }
    }

    /// The registry filters are resolved against.
    pub fn registry(&self) -> &'r R {
        self.registry
    }

    /// Compiles `source`, discarding diagnostics.
    ///
    /// # Returns
    ///
    /// `Ok(None)` for empty input, otherwise the compiled [`Query`].
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Query`] when the text is not a valid query and
    /// [`CompileError::Structural`] if the parser loses track of its cursor.
    /// The first error aborts compilation.
    pub fn compile(&self, source: &str) -> CompileResult<Option<Query>> {
        self.compile_with_diagnostics(source, |_| {})
    }

    /// Compiles `source`, passing each [`Diagnostic`] to `on_diagnostic` as
    /// it is found.
    ///
    /// # Errors
    ///
    /// Same as [`compile`](Self::compile).
    pub fn compile_with_diagnostics<F>(
        &self,
        source: &str,
        mut on_diagnostic: F,
    ) -> CompileResult<Option<Query>>
    where
        F: FnMut(Diagnostic),
    {
        QueryParser::parse(source, self.registry, &mut on_diagnostic)
    }

    /// Compiles `source`, collecting diagnostics alongside the result.
    pub fn compile_collecting(&self, source: &str) -> (CompileResult<Option<Query>>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let result = self.compile_with_diagnostics(source, |d| diagnostics.push(d));
        (result, diagnostics)
    }
}

/// Compiles `source` against `registry`.
///
/// Shorthand for `Compiler::new(registry).compile(source)`.
///
/// # Errors
///
/// See [`Compiler::compile`].
pub fn compile<R: FilterRegistry + ?Sized>(
    source: &str,
    registry: &R,
) -> CompileResult<Option<Query>> {
    Compiler::new(registry).compile(source)
}
