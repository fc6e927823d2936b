//! Entity and provider capability enumerations

use serde::{Deserialize, Serialize};

use crate::impl_domain_enum_conversions;

/// A tracked external object kind.
///
/// Providers may support a strict subset; GitLab, for instance, has no
/// artifact support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Repository,
    PullRequest,
    Artifact,
    Release,
}

impl_domain_enum_conversions!(EntityType {
    Repository => "repository",
    PullRequest => "pull_request",
    Artifact => "artifact",
    Release => "release",
});

/// Capability traits a provider can implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    Git,
    Rest,
    Github,
    RepoLister,
}

impl_domain_enum_conversions!(ProviderType {
    Git => "git",
    Rest => "rest",
    Github => "github",
    RepoLister => "repo_lister",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_type_round_trips_through_strings() {
        for entity in EntityType::ALL {
            assert_eq!(entity.as_str().parse::<EntityType>(), Ok(*entity));
        }
        assert_eq!(EntityType::PullRequest.to_string(), "pull_request");
    }

    #[test]
    fn entity_type_serde_matches_display() {
        let json = serde_json::to_string(&EntityType::PullRequest).unwrap();
        assert_eq!(json, "\"pull_request\"");
    }

    #[test]
    fn provider_type_rejects_unknown_traits() {
        assert!("oci".parse::<ProviderType>().is_err());
        assert_eq!("REPO_LISTER".parse::<ProviderType>(), Ok(ProviderType::RepoLister));
    }
}
