//! Config command implementation.
//!
//! The config file lives at ~/.config/tfq/config.toml unless `--config` or
//! `TFQ_CONFIG` names another file. Filters declared in it extend the
//! built-in registry.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use twitch_filter_rs::compiler::is_identifier_char;
use twitch_filter_rs::{FilterDescriptor, FilterSet};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# tfq - Twitch filter query checker configuration

# Config schema version (do not modify)
version = 1

# Output preferences
[output]
# color = true    # Enable colors (respects NO_COLOR env)

# Filters queries may reference in addition to the built-in ones.
# A filter with a built-in id replaces it. kind is "numerical" or "text".
# [[filters]]
# id = "reply_count"
# kind = "numerical"
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Extra filters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterDescriptor>,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            output: OutputConfig::default(),
            filters: Vec::new(),
        }
    }
}

impl Config {
    /// Built-in filters extended with the configured ones.
    pub fn registry(&self) -> FilterSet {
        let mut registry = FilterSet::builtin();
        registry.extend(self.filters.iter().cloned());
        registry
    }

    /// Whether `identifier` was declared in this config.
    pub fn declares(&self, identifier: &str) -> bool {
        self.filters.iter().any(|f| f.identifier == identifier)
    }
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/tfq/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("tfq"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("tfq"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path, preferring an explicitly named file.
pub fn get_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from `path`, falling back to defaults when the
/// file does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Resolves and loads the configuration for a command.
///
/// Applies the configured color preference to `ctx`.
pub fn load_for(ctx: &mut CommandContext) -> Result<Config> {
    let path = get_config_path(ctx.config_path.as_deref())?;
    let config = load_config(&path)?;

    if ctx.verbose {
        let state = if path.exists() { "" } else { " (not found, using defaults)" };
        eprintln!("Using config {}{}", path.display(), state);
    }
    if config.output.color == Some(false) {
        ctx.use_colors = false;
    }

    Ok(config)
}

/// Migrates config to current version if needed, then validates it.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        return Err(CommandError::Config(format!(
            "Config version {} is newer than supported version {}",
            config.version, CONFIG_VERSION
        )));
    }
    config.version = CONFIG_VERSION;

    for filter in &config.filters {
        if filter.identifier.is_empty() || !filter.identifier.chars().all(is_identifier_char) {
            return Err(CommandError::Config(format!(
                "Invalid filter id '{}'. Ids may only contain letters and '_'",
                filter.identifier
            )));
        }
    }

    Ok(config)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path(ctx.config_path.as_deref())?;
    let config = load_config(&path)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            println!("[output]");
            if let Some(color) = config.output.color {
                println!("  color: {}", color);
            }

            println!("\n[filters]");
            if config.filters.is_empty() {
                println!("  (none)");
            }
            for filter in &config.filters {
                println!("  {}: {}", filter.identifier, filter.kind);
            }
        } else {
            println!("(No config file exists. Run 'tfq config init' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path(ctx.config_path.as_deref())?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Executes the config init command.
///
/// # Errors
///
/// Returns an error if the file already exists and `force` is not set, or if
/// it cannot be written.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path(ctx.config_path.as_deref())?;

    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "Config already exists at {}. Use --force to overwrite it",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CommandError::Config(format!("Failed to create config directory: {}", e)))?;
    }

    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Created config at {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;
    use twitch_filter_rs::{FilterKind, FilterRegistry};

    fn context(config_path: Option<PathBuf>) -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: true,
            quiet: true,
            verbose: false,
            config_path,
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.output.color.is_none());
        assert!(config.filters.is_empty());
    }

    #[test]
    fn test_default_config_text_parses_to_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.output.color.is_none());
        assert!(config.filters.is_empty());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
version = 1

[output]
color = false

[[filters]]
id = "reply_count"
kind = "numerical"

[[filters]]
id = "user_name"
kind = "text"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.color, Some(false));
        assert_eq!(
            config.filters,
            vec![
                FilterDescriptor::numerical("reply_count"),
                FilterDescriptor::text("user_name"),
            ]
        );
    }

    #[test]
    fn test_config_deserialization_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.filters.is_empty());
    }

    #[test]
    fn test_unknown_filter_kind_rejected() {
        let toml_str = r#"
[[filters]]
id = "reply_count"
kind = "boolean"
"#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            version: CONFIG_VERSION,
            output: OutputConfig { color: Some(true) },
            filters: vec![FilterDescriptor::text("user_name")],
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("color = true"));
        assert!(toml_str.contains("[[filters]]"));
        assert!(toml_str.contains(r#"id = "user_name""#));
        assert!(toml_str.contains(r#"kind = "text""#));
    }

    #[test]
    fn test_registry_extends_builtins() {
        let config = Config {
            filters: vec![
                FilterDescriptor::numerical("reply_count"),
                FilterDescriptor::numerical("text"),
            ],
            ..Config::default()
        };

        let registry = config.registry();
        assert_eq!(registry.len(), FilterSet::builtin().len() + 1);
        assert_eq!(
            registry.lookup("reply_count").map(|f| f.kind),
            Some(FilterKind::Numerical)
        );
        // Configured filters replace built-ins with the same id.
        assert_eq!(
            registry.lookup("text").map(|f| f.kind),
            Some(FilterKind::Numerical)
        );
        assert!(config.declares("reply_count"));
        assert!(!config.declares("favorite_count"));
    }

    #[test]
    fn test_migrate_rejects_newer_version() {
        let config = Config {
            version: CONFIG_VERSION + 1,
            ..Config::default()
        };
        assert!(matches!(
            migrate_config(config),
            Err(CommandError::Config(_))
        ));
    }

    #[test]
    fn test_migrate_rejects_invalid_filter_id() {
        for id in ["", "reply-count", "count2"] {
            let config = Config {
                filters: vec![FilterDescriptor::numerical(id)],
                ..Config::default()
            };
            assert!(migrate_config(config).is_err(), "{id:?} should be rejected");
        }
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(&temp_dir.path().join("missing.toml")).unwrap();
        assert!(config.filters.is_empty());
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "version = [").unwrap();

        let error = load_config(&path).unwrap_err();
        assert!(error.to_string().contains("Failed to parse config"), "{error}");
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = get_config_path(Some(Path::new("/tmp/custom/tfq.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom/tfq.toml"));
    }

    #[test]
    #[serial]
    fn test_xdg_config_home() {
        let original = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", "/tmp/tfq-xdg");

        let path = get_config_path(None);

        match original {
            Some(value) => env::set_var("XDG_CONFIG_HOME", value),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }

        assert_eq!(path.unwrap(), PathBuf::from("/tmp/tfq-xdg/tfq/config.toml"));
    }

    #[test]
    fn test_init_writes_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        let ctx = context(Some(path.clone()));

        execute_init(&ctx, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        // A second init refuses to overwrite without --force.
        assert!(matches!(
            execute_init(&ctx, false),
            Err(CommandError::Config(_))
        ));
        execute_init(&ctx, true).unwrap();
    }

    #[test]
    fn test_load_for_applies_color_preference() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[output]\ncolor = false\n").unwrap();

        let mut ctx = context(Some(path));
        load_for(&mut ctx).unwrap();
        assert!(!ctx.use_colors);
    }
}
