//! Port interfaces for property fetching

use std::sync::Arc;

use async_trait::async_trait;
use forgeprops_domain::{EntityType, PropertyBag, RawProperties, WrapperError};

use super::context::FetchContext;
use super::fetcher::EntityFetcher;

/// One upstream API call that produces every key of its origin.
///
/// `C` is the provider's client handle. Implementations must return all keys
/// declared by the owning origin on success; partial results are not
/// representable.
#[async_trait]
pub trait PropertyWrapper<C: ?Sized + Sync>: Send + Sync {
    /// Fetch the origin's properties for the entity identified by `lookup`.
    async fn fetch(
        &self,
        ctx: &FetchContext,
        client: &C,
        is_org: bool,
        lookup: &PropertyBag,
    ) -> Result<RawProperties, WrapperError>;
}

/// Wrappers are shared so identity (`Arc::ptr_eq`) marks the batching unit.
pub type SharedWrapper<C> = Arc<dyn PropertyWrapper<C>>;

/// Resolves the entity fetcher for an entity type.
pub trait PropertyFetcherFactory<C: ?Sized + Sync>: Send + Sync {
    /// `None` means this provider does not support the entity type.
    fn entity_property_fetcher(&self, entity: EntityType) -> Option<&EntityFetcher<C>>;
}
