//! Source-control provider integrations

pub mod factory;
pub mod github;
pub mod gitlab;
pub mod provider;

use forgeprops_domain::RawProperties;
use serde_json::Value;

pub use factory::{create_provider, ProviderCredentials};
pub use github::GitHubProvider;
pub use gitlab::GitLabProvider;
pub use provider::{ForgeProvider, RecordConverter};

/// Raw wrapper output from literal key/value pairs.
pub(crate) fn raw_properties<const N: usize>(entries: [(&str, Value); N]) -> RawProperties {
    entries.into_iter().map(|(key, value)| (key.to_string(), value)).collect()
}

/// Percent-encode one path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
