//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::Cli;
use crate::{
    config::{OutputFormat, RemovalConfig},
    utils::{ColorParser, ConfigValidator},
};
use anyhow::{Context, Result};

/// Convert CLI arguments to a `RemovalConfig`
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build the configuration from CLI arguments
    ///
    /// Values from `--config` form the base; explicit flags override them.
    pub(crate) fn from_cli(cli: &Cli) -> Result<RemovalConfig> {
        let mut config = match &cli.config {
            Some(path) => RemovalConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?,
            None => RemovalConfig::default(),
        };

        if let Some(format) = cli.format {
            config.output_format = OutputFormat::from(format);
        }
        if let Some(quality) = cli.jpeg_quality {
            config.jpeg_quality = quality;
        }
        if let Some(color) = &cli.background_color {
            config.background_color =
                ColorParser::parse_hex(color).context("Invalid background color")?;
        }
        config.debug = config.debug || cli.verbose >= 2;

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Validate CLI arguments for consistency
    pub(crate) fn validate_cli(cli: &Cli) -> Result<()> {
        if let Some(quality) = cli.jpeg_quality {
            ConfigValidator::validate_quality("jpeg_quality", quality)
                .context("Invalid quality settings")?;
        }

        if let Some(color) = &cli.background_color {
            if !ColorParser::is_valid_hex(color) {
                anyhow::bail!("Invalid background color '{}': expected #RRGGBB or #RGB", color);
            }
        }

        ConfigValidator::validate_output_target(cli.output.as_deref(), cli.input.len())
            .context("Invalid output target")?;

        if cli.input.iter().any(|input| input == "-") && cli.input.len() > 1 {
            anyhow::bail!("Stdin (-) cannot be combined with other inputs");
        }

        if let Some(pattern) = &cli.pattern {
            glob::Pattern::new(pattern)
                .with_context(|| format!("Invalid file pattern: {}", pattern))?;
        }

        Ok(())
    }
}
