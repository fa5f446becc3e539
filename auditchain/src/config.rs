use crate::client::retry::RetryPolicy;
use crate::error::{ChainError, ChainResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://carlo.algorethics.ai/api";

pub const ENV_BASE_URL: &str = "AUDITCHAIN_BASE_URL";
pub const ENV_ACCESS_TOKEN: &str = "AUDITCHAIN_ACCESS_TOKEN";
pub const ENV_API_KEY: &str = "AUDITCHAIN_API_KEY";

/// Connection settings for the compliance API.
///
/// Passed explicitly to `ApiClient::new`; there is no process-wide client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root; `/dashboard` and `/auth` are appended per endpoint
    pub base_url: String,
    /// JWT for user-level endpoints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Default project API key, sent as `x-api-key`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Page size used when walking compliance history
    pub page_size: u32,
    /// Upper bound on history pages fetched in one walk
    pub max_pages: u32,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            api_key: None,
            timeout_secs: 30,
            page_size: 50,
            max_pages: 1_000,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(content: &str) -> ChainResult<Self> {
        toml::from_str(content).map_err(|e| ChainError::Config(e.to_string()))
    }

    /// Create a configuration from a TOML file
    pub fn from_file(path: &Path) -> ChainResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChainError::Config(format!("failed to read config file {:?}: {}", path, e))
        })?;
        toml::from_str(&content).map_err(|e| {
            ChainError::Config(format!("failed to parse config file {:?}: {}", path, e))
        })
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    /// Environment overrides are applied in both cases.
    pub fn load(path: Option<&Path>) -> ChainResult<(Self, Option<PathBuf>)> {
        let found = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_paths().into_iter().find(|p| p.exists()),
        };

        let mut config = match &found {
            Some(p) if p.exists() => Self::from_file(p)?,
            Some(p) => {
                return Err(ChainError::Config(format!(
                    "config file {:?} does not exist",
                    p
                )))
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok((config, found))
    }

    pub fn default_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("auditchain.toml"),
            PathBuf::from("config/auditchain.toml"),
        ]
    }

    /// Apply `AUDITCHAIN_*` overrides through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|s| !s.is_empty()) {
            self.base_url = url;
        }
        if let Some(token) = lookup(ENV_ACCESS_TOKEN).filter(|s| !s.is_empty()) {
            self.access_token = Some(token);
        }
        if let Some(key) = lookup(ENV_API_KEY).filter(|s| !s.is_empty()) {
            self.api_key = Some(key);
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            errors.push(format!(
                "base_url must start with http:// or https:// (got '{}')",
                self.base_url
            ));
        } else if reqwest::Url::parse(&self.base_url).is_err() {
            errors.push(format!("base_url '{}' is not a valid URL", self.base_url));
        }
        if self.timeout_secs == 0 {
            errors.push("timeout_secs must be greater than 0".to_string());
        }
        if self.page_size == 0 {
            errors.push("page_size must be greater than 0".to_string());
        }
        if self.max_pages == 0 {
            errors.push("max_pages must be greater than 0".to_string());
        }
        if self.retry.backoff_ms > self.retry.max_backoff_ms {
            errors.push("retry.backoff_ms must not exceed retry.max_backoff_ms".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn to_toml_string(&self) -> ChainResult<String> {
        toml::to_string_pretty(self).map_err(|e| ChainError::Config(e.to_string()))
    }
}
