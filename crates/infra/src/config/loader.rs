//! Configuration loader
//!
//! Loads provider configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If no provider is configured there, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `FORGEPROPS_HTTP_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `FORGEPROPS_HTTP_MAX_ATTEMPTS`: Total attempts per request
//! - `FORGEPROPS_HTTP_BASE_BACKOFF_MS`: Backoff before the first retry
//! - `FORGEPROPS_HTTP_USER_AGENT`: User agent sent to the APIs
//! - `FORGEPROPS_GITHUB_ENDPOINT`: GitHub API base URL
//! - `FORGEPROPS_GITHUB_WEBHOOK_URL`: Base URL of hooks this system registers
//! - `FORGEPROPS_GITHUB_IS_ORG`: Whether the owner is an organization
//! - `FORGEPROPS_GITLAB_ENDPOINT`: GitLab API base URL
//! - `FORGEPROPS_GITLAB_WEBHOOK_URL`: Base URL of hooks this system registers
//! - `FORGEPROPS_GITLAB_WEBHOOK_SECRET`: Current webhook secret
//!
//! A provider section is present when its endpoint or webhook URL variable is
//! set.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./forgeprops.json` or `./forgeprops.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use forgeprops_domain::{
    ConfigError, GitHubSettings, GitLabSettings, HttpSettings, ProvidersConfig,
};

const ENV_PREFIX: &str = "FORGEPROPS_";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If no provider is
/// configured there, falls back to loading from a config file.
///
/// # Errors
/// Returns [`ConfigError`] if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<ProvidersConfig, ConfigError> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns [`ConfigError::NotFound`] if no provider section is configured and
/// [`ConfigError::Invalid`] for unparsable values.
pub fn load_from_env() -> Result<ProvidersConfig, ConfigError> {
    let defaults = HttpSettings::default();
    let http = HttpSettings {
        timeout_secs: env_parse("HTTP_TIMEOUT_SECS")?.unwrap_or(defaults.timeout_secs),
        max_attempts: env_parse("HTTP_MAX_ATTEMPTS")?.unwrap_or(defaults.max_attempts),
        base_backoff_ms: env_parse("HTTP_BASE_BACKOFF_MS")?.unwrap_or(defaults.base_backoff_ms),
        user_agent: env_var("HTTP_USER_AGENT").unwrap_or(defaults.user_agent),
    };

    let github_endpoint = env_var("GITHUB_ENDPOINT");
    let github_webhook = env_var("GITHUB_WEBHOOK_URL");
    let github = if github_endpoint.is_some() || github_webhook.is_some() {
        let defaults = GitHubSettings::default();
        Some(GitHubSettings {
            endpoint: github_endpoint.unwrap_or(defaults.endpoint),
            webhook_url: github_webhook.unwrap_or_default(),
            is_org: env_bool("GITHUB_IS_ORG", false),
        })
    } else {
        None
    };

    let gitlab_endpoint = env_var("GITLAB_ENDPOINT");
    let gitlab_webhook = env_var("GITLAB_WEBHOOK_URL");
    let gitlab = if gitlab_endpoint.is_some() || gitlab_webhook.is_some() {
        Some(GitLabSettings {
            endpoint: gitlab_endpoint
                .unwrap_or_else(|| forgeprops_domain::constants::DEFAULT_GITLAB_ENDPOINT.into()),
            webhook_url: gitlab_webhook.unwrap_or_default(),
            current_webhook_secret: env_var("GITLAB_WEBHOOK_SECRET").unwrap_or_default(),
        })
    } else {
        None
    };

    if github.is_none() && gitlab.is_none() {
        return Err(ConfigError::NotFound(format!(
            "no provider configured via {ENV_PREFIX}GITHUB_* or {ENV_PREFIX}GITLAB_* variables"
        )));
    }

    let config = ProvidersConfig { http, github, gitlab };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns [`ConfigError`] if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The parsed configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<ProvidersConfig, ConfigError> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound(p.display().to_string()));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ConfigError::NotFound("no config file in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ProvidersConfig, ConfigError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ConfigError::Invalid(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ConfigError::Invalid(format!("Invalid JSON format: {e}"))),
        _ => Err(ConfigError::Invalid(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("forgeprops.json"),
        dir.join("forgeprops.toml"),
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

fn env_var(suffix: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{suffix}")).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an optional numeric environment variable.
fn env_parse<T>(suffix: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(suffix)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                ConfigError::Invalid(format!("Invalid value for {ENV_PREFIX}{suffix}: {e}"))
            })
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(suffix: &str, default: bool) -> bool {
    env_var(suffix)
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
