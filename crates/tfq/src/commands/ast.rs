//! Ast command implementation.

use twitch_filter_rs::FilterSet;

use super::{compile_query, read_query, CommandContext, Result};
use crate::output::{format_query_json, format_query_tree};

/// Executes the ast command, printing the compiled query as a tree or JSON.
pub fn execute(ctx: &CommandContext, registry: &FilterSet, query: Option<&str>) -> Result<()> {
    let source = read_query(query)?;
    let (query, diagnostics) = compile_query(ctx, registry, &source)?;

    if ctx.json_output {
        println!("{}", format_query_json(query.as_ref(), &diagnostics)?);
    } else if !ctx.quiet {
        print!("{}", format_query_tree(query.as_ref(), ctx.use_colors));
    }

    Ok(())
}
