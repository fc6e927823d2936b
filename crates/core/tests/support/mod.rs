//! Shared test helpers for `forgeprops-core` integration tests.
//!
//! In-memory fetch wrappers and a small repository-shaped fetcher table so the
//! service tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod wrappers;

use std::sync::Arc;

use forgeprops_core::properties::identity::{qualified_name, resolve_identity};
use forgeprops_core::{EntityFetcher, FetcherRegistry, PropertyService, SharedWrapper};
use forgeprops_domain::{EntityType, IdentityError, PropertyBag};

pub use wrappers::{FailingWrapper, PendingWrapper, StaticWrapper};

pub const REPO_KEYS: [&str; 3] = ["name", "repo_id", "is_private"];
pub const HOOK_KEYS: [&str; 2] = ["hook_id", "hook_url"];

pub fn repo_name(props: &PropertyBag) -> Result<String, IdentityError> {
    let segments = resolve_identity(props, &["repo_owner", "repo_name"])
        .map_err(|_| IdentityError::MissingRequiredProperty("name".into()))?;
    Ok(qualified_name(&segments))
}

/// Repository fetcher with a metadata origin and an operational hook origin.
pub fn repository_fetcher(repo: SharedWrapper<()>, hooks: SharedWrapper<()>) -> EntityFetcher<()> {
    EntityFetcher::builder(EntityType::Repository, repo_name)
        .origin(REPO_KEYS, repo)
        .origin(HOOK_KEYS, hooks)
        .operational(HOOK_KEYS)
        .build()
        .expect("valid repository fetcher")
}

pub fn service_with(fetcher: EntityFetcher<()>) -> PropertyService<()> {
    let registry = FetcherRegistry::new().register(fetcher).expect("single registration");
    PropertyService::new(Arc::new(()), false, Arc::new(registry))
}
