//! Provider factory keyed by provider class

use std::fmt;
use std::sync::Arc;

use forgeprops_core::PropertyProvider;
use forgeprops_domain::{ConfigError, ProvidersConfig};

use super::github::{GitHubProvider, GITHUB_CLASS};
use super::gitlab::{GitLabProvider, GITLAB_CLASS};

/// Secrets handed to a provider at construction. Never logged.
#[derive(Clone, Default)]
pub struct ProviderCredentials {
    pub access_token: String,
}

impl ProviderCredentials {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into() }
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials").field("access_token", &"<redacted>").finish()
    }
}

/// Build the provider for `class` from its configuration section.
///
/// # Errors
/// Returns [`ConfigError::Invalid`] for an unknown class, a missing or
/// invalid configuration section, or an unusable client.
pub fn create_provider(
    class: &str,
    config: &ProvidersConfig,
    credentials: &ProviderCredentials,
) -> Result<Arc<dyn PropertyProvider>, ConfigError> {
    config.validate()?;
    match class {
        GITHUB_CLASS => {
            let settings = config.github.clone().unwrap_or_default();
            let provider = GitHubProvider::new(&settings, &config.http, &credentials.access_token)?;
            Ok(Arc::new(provider))
        }
        GITLAB_CLASS => {
            let settings = config
                .gitlab
                .as_ref()
                .ok_or_else(|| ConfigError::Invalid("gitlab section is required".into()))?;
            let provider = GitLabProvider::new(settings, &config.http, &credentials.access_token)?;
            Ok(Arc::new(provider))
        }
        other => Err(ConfigError::Invalid(format!("unknown provider class: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use forgeprops_domain::{EntityType, GitLabSettings};

    use super::*;

    #[test]
    fn github_works_with_defaults() {
        let provider =
            create_provider("github", &ProvidersConfig::default(), &ProviderCredentials::new("t"))
                .unwrap();
        assert_eq!(provider.class(), "github");
        assert!(provider.supports_entity(EntityType::Artifact));
    }

    #[test]
    fn gitlab_requires_its_section() {
        let Err(err) =
            create_provider("gitlab", &ProvidersConfig::default(), &ProviderCredentials::default())
        else {
            panic!("gitlab without its section must be rejected");
        };
        assert!(matches!(err, ConfigError::Invalid(_)));

        let config = ProvidersConfig {
            gitlab: Some(GitLabSettings {
                endpoint: "https://gitlab.example/api/v4".into(),
                webhook_url: "https://hooks.example/gitlab".into(),
                current_webhook_secret: String::new(),
            }),
            ..ProvidersConfig::default()
        };
        let provider = create_provider("gitlab", &config, &ProviderCredentials::new("t")).unwrap();
        assert!(!provider.supports_entity(EntityType::Artifact));
    }

    #[test]
    fn unknown_class_is_rejected() {
        let Err(err) =
            create_provider("bitbucket", &ProvidersConfig::default(), &ProviderCredentials::default())
        else {
            panic!("unknown class must be rejected");
        };
        assert_eq!(err, ConfigError::Invalid("unknown provider class: bitbucket".into()));
    }

    #[test]
    fn credentials_are_redacted() {
        let debug = format!("{:?}", ProviderCredentials::new("ghp_secret"));
        assert!(!debug.contains("ghp_secret"));
    }
}
