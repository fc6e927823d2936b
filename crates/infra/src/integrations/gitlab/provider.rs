//! GitLab provider construction

use std::sync::Arc;

use forgeprops_core::PropertyService;
use forgeprops_domain::{ConfigError, GitLabSettings, HttpSettings, ProviderType};
use tracing::info;

use super::client::GitLabClient;
use super::properties::property_fetchers;
use super::records;
use crate::integrations::provider::ForgeProvider;

pub const GITLAB_CLASS: &str = "gitlab";

const CAPABILITIES: &[ProviderType] = &[ProviderType::Git, ProviderType::Rest];

/// GitLab provider; one instance per configured GitLab account.
pub type GitLabProvider = ForgeProvider<GitLabClient>;

impl GitLabProvider {
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when the webhook URL is missing, the
    /// client cannot be built or the fetcher table is inconsistent.
    pub fn new(
        settings: &GitLabSettings,
        http: &HttpSettings,
        access_token: &str,
    ) -> Result<Self, ConfigError> {
        let client = GitLabClient::new(settings, http, access_token)?;
        info!(endpoint = %settings.endpoint, "gitlab provider configured");
        Self::with_client(client)
    }

    /// # Errors
    /// Returns [`ConfigError::Invalid`] when the fetcher table is
    /// inconsistent.
    pub fn with_client(client: GitLabClient) -> Result<Self, ConfigError> {
        let fetchers =
            property_fetchers().map_err(|e| ConfigError::Invalid(format!("gitlab fetchers: {e}")))?;
        let service = PropertyService::new(Arc::new(client), false, Arc::new(fetchers));
        Ok(Self::from_parts(GITLAB_CLASS, CAPABILITIES, service, records::to_record))
    }
}

#[cfg(test)]
mod tests {
    use forgeprops_core::PropertyProvider;
    use forgeprops_domain::{EntityType, FetchError, PropertyBag};

    use super::*;
    use crate::http::HttpClient;

    fn provider() -> GitLabProvider {
        let http = HttpClient::builder("https://gitlab.test/api/v4").build().unwrap();
        GitLabProvider::with_client(GitLabClient::from_http(http, "https://hooks.test/gl")).unwrap()
    }

    #[test]
    fn gitlab_has_no_artifacts() {
        let provider = provider();
        assert!(!provider.supports_entity(EntityType::Artifact));
        assert!(provider.supports_entity(EntityType::PullRequest));
        assert!(provider.supported_properties(EntityType::Artifact).is_empty());
        assert!(!provider.can_implement(ProviderType::Github));
        assert!(provider.can_implement(ProviderType::Git));
    }

    #[test]
    fn artifact_record_is_rejected_before_conversion() {
        let err = provider()
            .properties_to_record(EntityType::Artifact, PropertyBag::new())
            .unwrap_err();
        assert_eq!(err, FetchError::UnsupportedEntity(EntityType::Artifact));
    }

    #[test]
    fn hook_keys_are_operational() {
        assert_eq!(
            provider().operational_properties(EntityType::Repository),
            ["gitlab/hook_id", "gitlab/hook_url"]
        );
    }
}
