//! Shared [`PropertyProvider`] implementation over a provider's property
//! service

use async_trait::async_trait;
use forgeprops_core::{FetchContext, PropertyProvider, PropertyService};
use forgeprops_domain::{
    EntityRecord, EntityType, FetchError, Property, PropertyBag, ProviderType, Result,
};
use tracing::instrument;

/// Converts a fetched bag into the provider's typed record.
pub type RecordConverter = fn(EntityType, PropertyBag) -> Result<EntityRecord>;

/// One configured provider instance.
///
/// Thread-safe; share it behind an `Arc<dyn PropertyProvider>`.
pub struct ForgeProvider<C: Send + Sync + 'static> {
    class: &'static str,
    capabilities: &'static [ProviderType],
    service: PropertyService<C>,
    to_record: RecordConverter,
}

impl<C: Send + Sync + 'static> ForgeProvider<C> {
    pub(crate) const fn from_parts(
        class: &'static str,
        capabilities: &'static [ProviderType],
        service: PropertyService<C>,
        to_record: RecordConverter,
    ) -> Self {
        Self { class, capabilities, service, to_record }
    }

    pub const fn service(&self) -> &PropertyService<C> {
        &self.service
    }
}

#[async_trait]
impl<C: Send + Sync + 'static> PropertyProvider for ForgeProvider<C> {
    fn class(&self) -> &'static str {
        self.class
    }

    fn can_implement(&self, capability: ProviderType) -> bool {
        self.capabilities.contains(&capability)
    }

    fn supported_entities(&self) -> Vec<EntityType> {
        EntityType::ALL
            .iter()
            .copied()
            .filter(|entity| self.service.entity_property_fetcher(*entity).is_some())
            .collect()
    }

    fn supported_properties(&self, entity: EntityType) -> Vec<String> {
        self.service
            .entity_property_fetcher(entity)
            .map(|fetcher| fetcher.declared_keys().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn operational_properties(&self, entity: EntityType) -> Vec<String> {
        self.service
            .entity_property_fetcher(entity)
            .map(|fetcher| fetcher.operational_properties().to_vec())
            .unwrap_or_default()
    }

    #[instrument(skip(self, ctx, lookup), fields(provider = self.class))]
    async fn fetch_property(
        &self,
        ctx: &FetchContext,
        lookup: &PropertyBag,
        entity: EntityType,
        key: &str,
    ) -> Result<Property> {
        self.service.fetch_property(ctx, lookup, entity, key).await
    }

    #[instrument(skip(self, ctx, lookup, cached), fields(provider = self.class))]
    async fn fetch_all_properties(
        &self,
        ctx: &FetchContext,
        lookup: &PropertyBag,
        entity: EntityType,
        cached: Option<&PropertyBag>,
    ) -> Result<PropertyBag> {
        self.service.fetch_all_properties(ctx, lookup, entity, cached).await
    }

    fn get_entity_name(&self, entity: EntityType, props: &PropertyBag) -> Result<String> {
        self.service.get_entity_name(entity, props)
    }

    /// # Errors
    /// Unsupported entities fail with `FetchError::UnsupportedEntity` before
    /// the converter runs.
    fn properties_to_record(&self, entity: EntityType, props: PropertyBag) -> Result<EntityRecord> {
        if !self.supports_entity(entity) {
            return Err(FetchError::UnsupportedEntity(entity));
        }
        (self.to_record)(entity, props)
    }
}
