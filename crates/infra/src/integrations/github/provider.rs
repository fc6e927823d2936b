//! GitHub provider construction

use std::sync::Arc;

use forgeprops_core::PropertyService;
use forgeprops_domain::{ConfigError, GitHubSettings, HttpSettings, ProviderType};
use tracing::info;

use super::client::GitHubClient;
use super::properties::property_fetchers;
use super::records;
use crate::integrations::provider::ForgeProvider;

pub const GITHUB_CLASS: &str = "github";

const CAPABILITIES: &[ProviderType] =
    &[ProviderType::Git, ProviderType::Rest, ProviderType::Github, ProviderType::RepoLister];

/// GitHub provider; one instance per configured GitHub account.
pub type GitHubProvider = ForgeProvider<GitHubClient>;

impl GitHubProvider {
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when the client cannot be built or
    /// the fetcher table is inconsistent.
    pub fn new(
        settings: &GitHubSettings,
        http: &HttpSettings,
        access_token: &str,
    ) -> Result<Self, ConfigError> {
        let client = GitHubClient::new(settings, http, access_token)?;
        info!(endpoint = %settings.endpoint, is_org = settings.is_org, "github provider configured");
        Self::with_client(client, settings.is_org)
    }

    /// # Errors
    /// Returns [`ConfigError::Invalid`] when the fetcher table is
    /// inconsistent.
    pub fn with_client(client: GitHubClient, is_org: bool) -> Result<Self, ConfigError> {
        let fetchers =
            property_fetchers().map_err(|e| ConfigError::Invalid(format!("github fetchers: {e}")))?;
        let service = PropertyService::new(Arc::new(client), is_org, Arc::new(fetchers));
        Ok(Self::from_parts(GITHUB_CLASS, CAPABILITIES, service, records::to_record))
    }
}
