//! Config command - configuration management

use crate::{CliContext, Exit, OutputFormat, OutputFormatter};
use anyhow::Context;
use auditchain::ClientConfig;
use clap::Subcommand;
use std::path::Path;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Print secrets instead of masking them
        #[arg(long)]
        reveal: bool,
    },

    /// Validate configuration file
    Validate,

    /// Initialize a new configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, default_value = "auditchain.toml")]
        output: String,

        /// Overwrite existing file
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn execute(ctx: &CliContext, command: ConfigCommand) -> anyhow::Result<Exit> {
    let formatter = OutputFormatter::new(ctx.output_format);

    match &command {
        ConfigCommand::Show { reveal } => command.show_config(ctx, *reveal, &formatter),
        ConfigCommand::Validate => command.validate_config(ctx, &formatter),
        ConfigCommand::Init { output, force } => command.init_config(output, *force, &formatter),
    }
}

fn mask(secret: Option<&str>, reveal: bool) -> String {
    match secret {
        None => "(not set)".to_string(),
        Some(s) if reveal => s.to_string(),
        Some(s) => {
            let count = s.chars().count();
            if count > 8 {
                format!("****{}", s.chars().skip(count - 4).collect::<String>())
            } else {
                "****".to_string()
            }
        }
    }
}

impl ConfigCommand {
    fn show_config(
        &self,
        ctx: &CliContext,
        reveal: bool,
        formatter: &OutputFormatter,
    ) -> anyhow::Result<Exit> {
        let config = &ctx.config;
        let source = ctx
            .config_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(defaults)".to_string());

        match ctx.output_format {
            OutputFormat::Json => {
                let mut shown = config.clone();
                if !reveal {
                    shown.access_token = shown.access_token.as_deref().map(|t| mask(Some(t), false));
                    shown.api_key = shown.api_key.as_deref().map(|k| mask(Some(k), false));
                }
                formatter.json(&serde_json::json!({ "source": source, "config": shown }));
            }
            _ => {
                formatter.section("Configuration");
                formatter.kv("Config file", &source);
                formatter.kv("Base URL", &config.base_url);
                formatter.kv("Access token", &mask(config.access_token.as_deref(), reveal));
                formatter.kv("API key", &mask(config.api_key.as_deref(), reveal));
                formatter.kv("Timeout (s)", &config.timeout_secs.to_string());
                formatter.kv("Page size", &config.page_size.to_string());
                formatter.kv("Max pages", &config.max_pages.to_string());

                formatter.section("Retry");
                formatter.kv("Max retries", &config.retry.max_retries.to_string());
                formatter.kv("Backoff (ms)", &config.retry.backoff_ms.to_string());
                formatter.kv("Max backoff (ms)", &config.retry.max_backoff_ms.to_string());
            }
        }

        Ok(Exit::Success)
    }

    fn validate_config(&self, ctx: &CliContext, formatter: &OutputFormatter) -> anyhow::Result<Exit> {
        if let Some(path) = &ctx.config_path {
            ctx.status(&format!("Validating configuration: {:?}", path));
        }

        let (errors, warnings) = ctx.validate_config();
        if !errors.is_empty() {
            for error in &errors {
                formatter.error(error);
            }
            anyhow::bail!("configuration has {} error(s)", errors.len());
        }

        if warnings.is_empty() {
            formatter.success("Configuration is valid");
        } else {
            formatter.success("Configuration is valid with warnings:");
            for warning in warnings {
                formatter.warning(&warning);
            }
        }

        Ok(Exit::Success)
    }

    fn init_config(
        &self,
        output: &str,
        force: bool,
        formatter: &OutputFormatter,
    ) -> anyhow::Result<Exit> {
        let path = Path::new(output);

        if path.exists() && !force {
            anyhow::bail!("File already exists: {}. Use --force to overwrite.", output);
        }

        let rendered = ClientConfig::default().to_toml_string()?;
        let template = format!(
            "# auditchain configuration\n# Generated by: auditchain config init\n\
             # Credentials may also come from AUDITCHAIN_API_KEY / AUDITCHAIN_ACCESS_TOKEN.\n\n{}",
            rendered
        );

        std::fs::write(path, template).context("Failed to write config file")?;

        formatter.success(&format!("Created configuration file: {}", output));
        Ok(Exit::Success)
    }
}
