//! Command implementations for the tfq CLI.

pub mod ast;
pub mod check;
pub mod completions;
pub mod config;
pub mod filters;

use std::io::{self, Read};
use std::path::PathBuf;

use twitch_filter_rs::{CompileError, Compiler, Diagnostic, FilterSet, Query};

use crate::cli::Cli;
use crate::output::helpers::format_warning;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The query failed to compile.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common settings.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Config file named on the command line or in `TFQ_CONFIG`.
    pub config_path: Option<PathBuf>,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color,
            quiet: cli.quiet,
            verbose: cli.verbose,
            config_path: cli.config.clone(),
        }
    }
}

/// Returns the query text given on the command line, or reads it from stdin
/// when the argument is absent or `-`.
pub fn read_query(query: Option<&str>) -> Result<String> {
    match query {
        Some(text) if text != "-" => Ok(text.to_string()),
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Compiles `source`, printing diagnostics as warnings on stderr.
///
/// Diagnostics are also returned so JSON output can include them.
pub fn compile_query(
    ctx: &CommandContext,
    registry: &FilterSet,
    source: &str,
) -> Result<(Option<Query>, Vec<Diagnostic>)> {
    if ctx.verbose {
        eprintln!(
            "Compiling {} bytes against {} filters",
            source.len(),
            registry.len()
        );
    }

    let (result, diagnostics) = Compiler::new(registry).compile_collecting(source);

    if !ctx.json_output && !ctx.quiet {
        for diagnostic in &diagnostics {
            eprintln!("{}", format_warning(diagnostic, ctx.use_colors));
        }
    }

    Ok((result?, diagnostics))
}
