//! GitHub entity fetchers
//!
//! One module per entity type. Each declares its property keys, the fetch
//! wrappers that produce them, and the name resolver.

pub mod artifact;
pub mod pull_request;
pub mod release;
pub mod repository;

use forgeprops_core::{DefinitionError, FetcherRegistry};

use super::client::GitHubClient;

/// Fetcher table for every entity type GitHub supports.
///
/// # Errors
/// Returns a [`DefinitionError`] if a fetcher table is inconsistent.
pub fn property_fetchers() -> Result<FetcherRegistry<GitHubClient>, DefinitionError> {
    FetcherRegistry::new()
        .register(repository::fetcher()?)?
        .register(pull_request::fetcher()?)?
        .register(artifact::fetcher()?)?
        .register(release::fetcher()?)
}
