//! Provider property service
//!
//! Orchestrates single-key and all-properties fetches over a provider's
//! fetcher table and applies the operational merge policy.

use std::fmt;
use std::sync::Arc;

use forgeprops_domain::{
    EntityType, FetchError, Property, PropertyBag, RawProperties, Result, WrapperError,
};
use futures::future::try_join_all;
use tracing::{debug, instrument, warn};

use super::context::FetchContext;
use super::fetcher::EntityFetcher;
use super::merge::merge_operational;
use super::ports::PropertyFetcherFactory;

/// Property fetching for one provider instance.
///
/// Holds the live client, the organization flag and the immutable fetcher
/// table. Stateless across calls; safe to share between tasks.
pub struct PropertyService<C: ?Sized + Sync> {
    client: Arc<C>,
    is_org: bool,
    fetchers: Option<Arc<dyn PropertyFetcherFactory<C>>>,
}

impl<C: ?Sized + Sync> PropertyService<C> {
    pub fn new(client: Arc<C>, is_org: bool, fetchers: Arc<dyn PropertyFetcherFactory<C>>) -> Self {
        Self { client, is_org, fetchers: Some(fetchers) }
    }

    /// Service without a fetcher table; every fetch fails with
    /// [`FetchError::NotInitialized`].
    pub fn uninitialized(client: Arc<C>, is_org: bool) -> Self {
        Self { client, is_org, fetchers: None }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub const fn is_org(&self) -> bool {
        self.is_org
    }

    /// Registry introspection for capability checks.
    pub fn entity_property_fetcher(&self, entity: EntityType) -> Option<&EntityFetcher<C>> {
        self.fetchers.as_ref()?.entity_property_fetcher(entity)
    }

    fn resolve_fetcher(&self, entity: EntityType) -> Result<&EntityFetcher<C>> {
        let fetchers = self.fetchers.as_ref().ok_or(FetchError::NotInitialized)?;
        fetchers.entity_property_fetcher(entity).ok_or(FetchError::UnsupportedEntity(entity))
    }

    /// Display name of an entity from its properties. No network access.
    ///
    /// # Errors
    /// Returns [`FetchError::Identity`] when identity keys are missing, or
    /// the usual resolution errors.
    pub fn get_entity_name(&self, entity: EntityType, props: &PropertyBag) -> Result<String> {
        Ok(self.resolve_fetcher(entity)?.get_name(props)?)
    }

    /// Fetch a single property, invoking only the wrapper of the origin that
    /// declares `key`.
    ///
    /// # Errors
    /// See [`FetchError`]; wrapper failures carry the entity and key.
    #[instrument(skip(self, ctx, lookup))]
    pub async fn fetch_property(
        &self,
        ctx: &FetchContext,
        lookup: &PropertyBag,
        entity: EntityType,
        key: &str,
    ) -> Result<Property> {
        let fetcher = self.resolve_fetcher(entity)?;
        let wrapper = fetcher.wrapper_for_property(key).ok_or_else(|| {
            FetchError::UnsupportedProperty { entity, key: key.to_string() }
        })?;

        let mut raw = ctx
            .run(wrapper.fetch(ctx, &*self.client, self.is_org, lookup))
            .await
            .map_err(|source| wrapper_failure(entity, Some(key), source))?;

        let Some(value) = raw.remove(key) else {
            warn!(key, "wrapper result is missing a key its origin declares");
            return Err(FetchError::PropertyNotProduced { entity, key: key.to_string() });
        };

        debug!(key, "fetched property");
        Ok(Property::from_raw(key, value)?)
    }

    /// Fetch every property of the entity, one wrapper call per origin, and
    /// keep the operational keys of `cached`.
    ///
    /// All-or-nothing: the first wrapper failure drops the in-flight calls
    /// and fails the whole fetch.
    ///
    /// # Errors
    /// See [`FetchError`]; wrapper failures carry the entity.
    #[instrument(skip(self, ctx, lookup, cached), fields(has_cache = cached.is_some()))]
    pub async fn fetch_all_properties(
        &self,
        ctx: &FetchContext,
        lookup: &PropertyBag,
        entity: EntityType,
        cached: Option<&PropertyBag>,
    ) -> Result<PropertyBag> {
        let fetcher = self.resolve_fetcher(entity)?;
        let client = &*self.client;

        let calls = fetcher
            .all_property_wrappers()
            .into_iter()
            .map(|wrapper| ctx.run(wrapper.fetch(ctx, client, self.is_org, lookup)));
        let results =
            try_join_all(calls).await.map_err(|source| wrapper_failure(entity, None, source))?;

        let mut raw = RawProperties::new();
        for result in results {
            raw.extend(result);
        }

        let upstream = PropertyBag::from_raw(raw)?;
        let merged = merge_operational(&upstream, cached, fetcher.operational_properties());
        debug!(origins = fetcher.origins().len(), properties = merged.len(), "fetched all properties");
        Ok(merged)
    }
}

impl<C: ?Sized + Sync> fmt::Debug for PropertyService<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyService")
            .field("is_org", &self.is_org)
            .field("initialized", &self.fetchers.is_some())
            .finish_non_exhaustive()
    }
}

/// Identity failures describe the lookup, not the upstream, so they surface
/// as [`FetchError::Identity`].
fn wrapper_failure(entity: EntityType, key: Option<&str>, source: WrapperError) -> FetchError {
    match source {
        WrapperError::Identity(err) => FetchError::Identity(err),
        source => {
            debug!(%entity, ?key, error = %source, "wrapper call failed");
            FetchError::WrapperFailed { entity, key: key.map(str::to_string), source }
        }
    }
}
