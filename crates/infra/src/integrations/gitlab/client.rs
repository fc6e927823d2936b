//! Authenticated GitLab REST client

use forgeprops_domain::{ConfigError, GitLabSettings, HttpSettings, WrapperError};
use serde::de::DeserializeOwned;

use crate::http::HttpClient;

/// GitLab API client handed to every GitLab fetch wrapper.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: HttpClient,
    webhook_url: String,
}

impl GitLabClient {
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when the webhook URL is empty or the
    /// endpoint or token is unusable.
    pub fn new(
        settings: &GitLabSettings,
        http: &HttpSettings,
        access_token: &str,
    ) -> Result<Self, ConfigError> {
        if settings.webhook_url.trim().is_empty() {
            return Err(ConfigError::Invalid("gitlab.webhook_url is required".into()));
        }
        let client = HttpClient::builder(&settings.endpoint)
            .settings(http)
            .bearer_token(access_token)
            .header("accept", "application/json")
            .build()?;
        Ok(Self::from_http(client, settings.webhook_url.clone()))
    }

    pub fn from_http(http: HttpClient, webhook_url: impl Into<String>) -> Self {
        Self { http, webhook_url: webhook_url.into() }
    }

    pub const fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WrapperError> {
        self.http.get_json(path, query).await
    }
}

#[cfg(test)]
mod tests {
    use forgeprops_domain::constants::DEFAULT_GITLAB_ENDPOINT;

    use super::*;

    #[test]
    fn webhook_url_is_required() {
        let settings = GitLabSettings {
            endpoint: DEFAULT_GITLAB_ENDPOINT.into(),
            webhook_url: String::new(),
            current_webhook_secret: String::new(),
        };
        let err = GitLabClient::new(&settings, &HttpSettings::default(), "token").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn default_endpoint_keeps_api_prefix() {
        let settings = GitLabSettings {
            endpoint: DEFAULT_GITLAB_ENDPOINT.into(),
            webhook_url: "https://hooks.example/gitlab".into(),
            current_webhook_secret: String::new(),
        };
        let client = GitLabClient::new(&settings, &HttpSettings::default(), "token").unwrap();
        assert_eq!(
            client.http().url("projects/1").unwrap().as_str(),
            "https://gitlab.com/api/v4/projects/1"
        );
    }
}
