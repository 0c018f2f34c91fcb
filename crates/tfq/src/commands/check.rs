//! Check command implementation.
//!
//! Compiles a query and reports whether it is valid.

use twitch_filter_rs::FilterSet;

use super::{compile_query, read_query, CommandContext, Result};
use crate::output::{format_check_json, format_check_summary};

/// Executes the check command.
///
/// # Errors
///
/// Returns the compile error when the query is invalid, or an I/O error if
/// stdin cannot be read.
pub fn execute(ctx: &CommandContext, registry: &FilterSet, query: Option<&str>) -> Result<()> {
    let source = read_query(query)?;
    let (query, diagnostics) = compile_query(ctx, registry, &source)?;

    if ctx.json_output {
        println!("{}", format_check_json(query.as_ref(), &diagnostics)?);
    } else if !ctx.quiet {
        print!("{}", format_check_summary(query.as_ref(), ctx.use_colors));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandError;
    use twitch_filter_rs::{CompileError, QueryError};

    fn context() -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            verbose: false,
            config_path: None,
        }
    }

    #[test]
    fn test_valid_query() {
        let registry = FilterSet::builtin();
        assert!(execute(&context(), &registry, Some(r#"{text:"a"}"#)).is_ok());
    }

    #[test]
    fn test_empty_query_is_valid() {
        let registry = FilterSet::builtin();
        assert!(execute(&context(), &registry, Some("")).is_ok());
    }

    #[test]
    fn test_invalid_query() {
        let registry = FilterSet::builtin();
        let error = execute(&context(), &registry, Some(r#"{text:"a}"#)).unwrap_err();
        assert!(matches!(
            error,
            CommandError::Compile(CompileError::Query(QueryError::UnterminatedArgument {
                captured: true,
                ..
            }))
        ));
    }
}
