//! Query compiler for the Twitch client's post filters.
//!
//! This crate turns filter query text such as
//! `{favorite_count >= "100" & text :: "rust|cargo"}` into a [`Query`] AST.
//! It consults a [`FilterRegistry`] to resolve filter identifiers and their
//! kinds, and never evaluates filters itself.
//!
//! See [`compiler`] for the query syntax.

pub mod compiler;
pub mod registry;

pub use compiler::{compile, CompileError, CompileResult, Compiler, Diagnostic, Query, QueryError};
pub use registry::{FilterDescriptor, FilterKind, FilterRegistry, FilterSet};
