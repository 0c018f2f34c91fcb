//! Filters command implementation.
//!
//! Lists the filters queries can reference: the built-in set plus any
//! declared in the config file.

use super::config::Config;
use super::{CommandContext, Result};
use crate::output::{format_filters_json, format_filters_table, FilterOutput, FilterSource};

/// Executes the filters command.
pub fn execute(ctx: &CommandContext, config: &Config) -> Result<()> {
    let registry = config.registry();
    let filters: Vec<FilterOutput> = registry
        .iter()
        .map(|f| FilterOutput {
            id: &f.identifier,
            kind: f.kind,
            source: source_of(config, &f.identifier),
        })
        .collect();

    if ctx.json_output {
        println!("{}", format_filters_json(&filters)?);
    } else if !ctx.quiet {
        print!("{}", format_filters_table(&filters, ctx.use_colors));
    }

    Ok(())
}

fn source_of(config: &Config, identifier: &str) -> FilterSource {
    if config.declares(identifier) {
        FilterSource::Config
    } else {
        FilterSource::Builtin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twitch_filter_rs::FilterDescriptor;

    #[test]
    fn test_source_of() {
        let config = Config {
            filters: vec![
                FilterDescriptor::numerical("reply_count"),
                FilterDescriptor::numerical("text"),
            ],
            ..Config::default()
        };
        assert_eq!(source_of(&config, "reply_count"), FilterSource::Config);
        // An overridden built-in is reported as coming from the config.
        assert_eq!(source_of(&config, "text"), FilterSource::Config);
        assert_eq!(source_of(&config, "favorite_count"), FilterSource::Builtin);
    }
}
