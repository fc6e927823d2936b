//! Provider configuration structures
//!
//! Per-provider state (endpoint, webhook URL and secret, organization flag) is
//! held here and handed to the providers at construction. Nothing is global.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_GITHUB_ENDPOINT, DEFAULT_GITLAB_ENDPOINT, DEFAULT_HTTP_BASE_BACKOFF_MS,
    DEFAULT_HTTP_MAX_ATTEMPTS, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::errors::ConfigError;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub github: Option<GitHubSettings>,
    #[serde(default)]
    pub gitlab: Option<GitLabSettings>,
}

impl ProvidersConfig {
    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when a provider section is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.max_attempts == 0 {
            return Err(ConfigError::Invalid("http.max_attempts must be at least 1".into()));
        }
        if let Some(github) = &self.github {
            if github.endpoint.trim().is_empty() {
                return Err(ConfigError::Invalid("github.endpoint must not be empty".into()));
            }
        }
        if let Some(gitlab) = &self.gitlab {
            if gitlab.webhook_url.trim().is_empty() {
                return Err(ConfigError::Invalid("gitlab.webhook_url is required".into()));
            }
        }
        Ok(())
    }
}

/// Transport settings shared by both providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total attempts per request. Defaults to 1 so upstream failures reach
    /// the engine unmodified.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            max_attempts: DEFAULT_HTTP_MAX_ATTEMPTS,
            base_backoff_ms: DEFAULT_HTTP_BASE_BACKOFF_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// GitHub provider instance settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubSettings {
    #[serde(default = "default_github_endpoint")]
    pub endpoint: String,
    /// Base URL hooks registered by this system point at. Used to pick our
    /// hook out of a repository's hook list.
    #[serde(default)]
    pub webhook_url: String,
    /// Whether the authenticated owner is an organization.
    #[serde(default)]
    pub is_org: bool,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self { endpoint: default_github_endpoint(), webhook_url: String::new(), is_org: false }
    }
}

/// GitLab provider instance settings. `Debug` redacts the webhook secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLabSettings {
    #[serde(default = "default_gitlab_endpoint")]
    pub endpoint: String,
    pub webhook_url: String,
    #[serde(default)]
    pub current_webhook_secret: String,
}

impl fmt::Debug for GitLabSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitLabSettings")
            .field("endpoint", &self.endpoint)
            .field("webhook_url", &self.webhook_url)
            .field("current_webhook_secret", &"<redacted>")
            .finish()
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_max_attempts() -> usize {
    DEFAULT_HTTP_MAX_ATTEMPTS
}

fn default_base_backoff_ms() -> u64 {
    DEFAULT_HTTP_BASE_BACKOFF_MS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_github_endpoint() -> String {
    DEFAULT_GITHUB_ENDPOINT.to_string()
}

fn default_gitlab_endpoint() -> String {
    DEFAULT_GITLAB_ENDPOINT.to_string()
}
