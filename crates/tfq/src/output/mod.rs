//! Output formatting utilities for the tfq CLI.
//!
//! - [`query`] - compiled query output (check summary, syntax tree)
//! - [`filters`] - filter registry listing
//! - [`helpers`] - common formatting utilities

mod filters;
pub mod helpers;
mod query;

pub use filters::{format_filters_json, format_filters_table, FilterOutput, FilterSource};
pub use query::{format_check_json, format_check_summary, format_query_json, format_query_tree};
