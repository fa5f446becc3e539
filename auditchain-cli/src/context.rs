//! CLI context - shared state for all commands

use auditchain::{ApiClient, ClientConfig};
use std::path::{Path, PathBuf};

/// Shared context for CLI commands
pub struct CliContext {
    /// Configuration file in use, if one was found
    pub config_path: Option<PathBuf>,
    /// Loaded client configuration, environment overrides applied
    pub config: ClientConfig,
    /// Output format preference
    pub output_format: super::OutputFormat,
    /// Quiet mode (suppress status messages)
    pub quiet: bool,
}

impl CliContext {
    /// Load configuration from `path`, or from the default search paths.
    pub fn new(path: Option<&Path>) -> anyhow::Result<Self> {
        let (config, config_path) = ClientConfig::load(path)?;
        Ok(Self::from_config(config, config_path))
    }

    pub fn from_config(config: ClientConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            config,
            output_format: super::OutputFormat::Table,
            quiet: false,
        }
    }

    /// Build an API client from the loaded configuration
    pub fn client(&self) -> anyhow::Result<ApiClient> {
        Ok(ApiClient::new(self.config.clone())?)
    }

    /// Hard errors from `ClientConfig::validate` plus credential warnings.
    pub fn validate_config(&self) -> (Vec<String>, Vec<String>) {
        let errors = self.config.validate().err().unwrap_or_default();

        let mut warnings = Vec::new();
        if self.config.api_key.is_none() {
            warnings.push("No default api_key; project commands need --api-key".to_string());
        }
        if self.config.access_token.is_none() {
            warnings.push("No access_token; run `auditchain login` for user stats".to_string());
        }
        (errors, warnings)
    }

    /// Print status message (respects quiet mode)
    pub fn status(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_reports_missing_credentials() {
        let ctx = CliContext::from_config(ClientConfig::default(), None);
        let (errors, warnings) = ctx.validate_config();
        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 2);

        let ctx = CliContext::from_config(
            ClientConfig::default()
                .with_api_key("k")
                .with_access_token("t"),
            None,
        );
        let (errors, warnings) = ctx.validate_config();
        assert!(errors.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let ctx = CliContext::from_config(
            ClientConfig {
                page_size: 0,
                ..ClientConfig::default()
            },
            None,
        );
        let (errors, _) = ctx.validate_config();
        assert_eq!(errors, vec!["page_size must be greater than 0".to_string()]);
    }
}
