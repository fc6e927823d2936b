//! Authenticated GitHub REST client

use forgeprops_domain::{ConfigError, GitHubSettings, HttpSettings, WrapperError};
use serde::de::DeserializeOwned;

use crate::http::HttpClient;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client handed to every GitHub fetch wrapper.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: HttpClient,
    webhook_url: String,
}

impl GitHubClient {
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for an unusable endpoint or token.
    pub fn new(
        settings: &GitHubSettings,
        http: &HttpSettings,
        access_token: &str,
    ) -> Result<Self, ConfigError> {
        let client = HttpClient::builder(&settings.endpoint)
            .settings(http)
            .bearer_token(access_token)
            .header("accept", GITHUB_ACCEPT)
            .header("x-github-api-version", GITHUB_API_VERSION)
            .build()?;
        Ok(Self::from_http(client, settings.webhook_url.clone()))
    }

    pub fn from_http(http: HttpClient, webhook_url: impl Into<String>) -> Self {
        Self { http, webhook_url: webhook_url.into() }
    }

    pub const fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Base URL of the hooks this system registers.
    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, WrapperError> {
        self.http.get_json(path, &[]).await
    }
}
