use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use commands::{CommandContext, CommandError};
use twitch_filter_rs::CompileError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", error_json(&e));
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

fn run(cli: &Cli) -> commands::Result<()> {
    let mut ctx = CommandContext::from_cli(cli);
    if std::env::var_os("NO_COLOR").is_some() {
        ctx.use_colors = false;
    }

    match &cli.command {
        Some(Commands::Check { query }) => {
            let config = commands::config::load_for(&mut ctx)?;
            commands::check::execute(&ctx, &config.registry(), query.as_deref())
        }
        Some(Commands::Ast { query }) => {
            let config = commands::config::load_for(&mut ctx)?;
            commands::ast::execute(&ctx, &config.registry(), query.as_deref())
        }
        Some(Commands::Filters) => {
            let config = commands::config::load_for(&mut ctx)?;
            commands::filters::execute(&ctx, &config)
        }
        Some(Commands::Config { command }) => match command {
            Some(ConfigCommands::Show) | None => commands::config::execute_show(&ctx),
            Some(ConfigCommands::Path) => commands::config::execute_path(&ctx),
            Some(ConfigCommands::Init { force }) => commands::config::execute_init(&ctx, *force),
        },
        Some(Commands::Completions { shell }) => {
            commands::completions::execute(shell).map_err(CommandError::Io)
        }
        None => {
            if !ctx.quiet {
                println!("tfq - Twitch filter query checker");
                println!("Use --help for usage information");
            }
            Ok(())
        }
    }
}

/// Builds the JSON error document printed with `--json`.
fn error_json(e: &CommandError) -> String {
    let mut error = serde_json::json!({
        "code": error_code(e),
        "message": e.to_string(),
    });
    if let CommandError::Compile(compile) = e {
        if let Some(offset) = compile.offset() {
            error["offset"] = offset.into();
        }
    }

    let document = serde_json::json!({ "error": error });
    serde_json::to_string_pretty(&document).unwrap_or_else(|_| document.to_string())
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Compile(CompileError::Query(_)) => "QUERY_ERROR",
        CommandError::Compile(CompileError::Structural(_)) => "STRUCTURAL_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit status for an error.
fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Compile(CompileError::Query(_)) => 1,
        CommandError::Compile(CompileError::Structural(_)) => 4,
        CommandError::Io(_) => 3,
        CommandError::Config(_) => 5,
        CommandError::Json(_) => 1,
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    ExitCode::from(exit_status(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use twitch_filter_rs::compiler::StructuralError;
    use twitch_filter_rs::QueryError;

    fn query_error() -> CommandError {
        CommandError::Compile(CompileError::Query(QueryError::MissingConnector { offset: 9 }))
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(error_code(&query_error()), "QUERY_ERROR");
        assert_eq!(
            error_code(&CommandError::Compile(StructuralError::BeforeStart.into())),
            "STRUCTURAL_ERROR"
        );
        assert_eq!(
            error_code(&CommandError::Config("x".to_string())),
            "CONFIG_ERROR"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_status(&query_error()), 1);
        assert_eq!(
            exit_status(&CommandError::Compile(StructuralError::BeforeStart.into())),
            4
        );
        assert_eq!(
            exit_status(&CommandError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "boom"
            ))),
            3
        );
        assert_eq!(exit_status(&CommandError::Config("x".to_string())), 5);
    }

    #[test]
    fn test_error_json_includes_offset() {
        let json: serde_json::Value = serde_json::from_str(&error_json(&query_error())).unwrap();
        assert_eq!(json["error"]["code"], "QUERY_ERROR");
        assert_eq!(json["error"]["offset"], 9);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("query error:"));
    }

    #[test]
    fn test_error_json_without_offset() {
        let json: serde_json::Value =
            serde_json::from_str(&error_json(&CommandError::Config("bad".to_string()))).unwrap();
        assert_eq!(json["error"]["code"], "CONFIG_ERROR");
        assert!(json["error"].get("offset").is_none());
    }
}
