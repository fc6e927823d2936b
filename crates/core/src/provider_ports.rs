//! Provider-facing port
//!
//! Object-safe surface over every provider implementation so callers can hold
//! an `Arc<dyn PropertyProvider>` without knowing the provider's client type.

use async_trait::async_trait;
use forgeprops_domain::{EntityRecord, EntityType, Property, PropertyBag, ProviderType, Result};

use crate::properties::context::FetchContext;

/// Property operations of one configured provider instance
#[async_trait]
pub trait PropertyProvider: Send + Sync {
    /// Provider class name (`"github"`, `"gitlab"`).
    fn class(&self) -> &'static str;

    /// Whether the provider implements the given capability.
    fn can_implement(&self, capability: ProviderType) -> bool;

    fn supported_entities(&self) -> Vec<EntityType>;

    fn supports_entity(&self, entity: EntityType) -> bool {
        self.supported_entities().contains(&entity)
    }

    /// Every key any origin of the entity declares. Empty when unsupported.
    fn supported_properties(&self, entity: EntityType) -> Vec<String>;

    /// Keys whose cached values win over upstream ones. Empty when
    /// unsupported.
    fn operational_properties(&self, entity: EntityType) -> Vec<String>;

    /// Fetch a single property of an entity.
    async fn fetch_property(
        &self,
        ctx: &FetchContext,
        lookup: &PropertyBag,
        entity: EntityType,
        key: &str,
    ) -> Result<Property>;

    /// Fetch every property of an entity and keep the cached operational
    /// ones.
    async fn fetch_all_properties(
        &self,
        ctx: &FetchContext,
        lookup: &PropertyBag,
        entity: EntityType,
        cached: Option<&PropertyBag>,
    ) -> Result<PropertyBag>;

    /// Display name of an entity, without network access.
    fn get_entity_name(&self, entity: EntityType, props: &PropertyBag) -> Result<String>;

    /// Typed record built from a fetched property bag.
    fn properties_to_record(&self, entity: EntityType, props: PropertyBag) -> Result<EntityRecord>;
}
