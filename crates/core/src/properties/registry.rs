//! Explicit entity-type → fetcher registry

use std::collections::HashMap;
use std::fmt;

use forgeprops_domain::EntityType;

use super::errors::DefinitionError;
use super::fetcher::EntityFetcher;
use super::ports::PropertyFetcherFactory;

/// Registry of the entity fetchers one provider instance supports.
pub struct FetcherRegistry<C: ?Sized + Sync> {
    fetchers: HashMap<EntityType, EntityFetcher<C>>,
}

impl<C: ?Sized + Sync> FetcherRegistry<C> {
    pub fn new() -> Self {
        Self { fetchers: HashMap::new() }
    }

    /// Register the fetcher for its entity type.
    ///
    /// # Errors
    /// Returns [`DefinitionError::DuplicateEntity`] when the entity type
    /// already has a fetcher.
    pub fn register(mut self, fetcher: EntityFetcher<C>) -> Result<Self, DefinitionError> {
        let entity = fetcher.entity();
        if self.fetchers.contains_key(&entity) {
            return Err(DefinitionError::DuplicateEntity(entity));
        }
        self.fetchers.insert(entity, fetcher);
        Ok(self)
    }

    pub fn supports(&self, entity: EntityType) -> bool {
        self.fetchers.contains_key(&entity)
    }

    /// Supported entity types in declaration order.
    pub fn supported_entities(&self) -> Vec<EntityType> {
        EntityType::ALL.iter().copied().filter(|entity| self.supports(*entity)).collect()
    }
}

impl<C: ?Sized + Sync> Default for FetcherRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized + Sync> PropertyFetcherFactory<C> for FetcherRegistry<C> {
    fn entity_property_fetcher(&self, entity: EntityType) -> Option<&EntityFetcher<C>> {
        self.fetchers.get(&entity)
    }
}

impl<C: ?Sized + Sync> fmt::Debug for FetcherRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetcherRegistry").field("entities", &self.supported_entities()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use forgeprops_domain::{IdentityError, PropertyBag, RawProperties, WrapperError};

    use super::*;
    use crate::properties::context::FetchContext;
    use crate::properties::ports::PropertyWrapper;

    struct Noop;

    #[async_trait]
    impl PropertyWrapper<()> for Noop {
        async fn fetch(
            &self,
            _ctx: &FetchContext,
            _client: &(),
            _is_org: bool,
            _lookup: &PropertyBag,
        ) -> Result<RawProperties, WrapperError> {
            Ok(RawProperties::new())
        }
    }

    fn fetcher(entity: EntityType) -> EntityFetcher<()> {
        EntityFetcher::builder(entity, |_| Err(IdentityError::MissingRequiredProperty("name".into())))
            .origin(["name"], Arc::new(Noop))
            .build()
            .unwrap()
    }

    #[test]
    fn unsupported_entity_resolves_to_none() {
        let registry = FetcherRegistry::new()
            .register(fetcher(EntityType::Repository))
            .unwrap()
            .register(fetcher(EntityType::Release))
            .unwrap();

        assert!(registry.entity_property_fetcher(EntityType::Repository).is_some());
        assert!(registry.entity_property_fetcher(EntityType::Artifact).is_none());
        assert_eq!(
            registry.supported_entities(),
            vec![EntityType::Repository, EntityType::Release]
        );
    }

    #[test]
    fn registering_an_entity_twice_fails() {
        let err = FetcherRegistry::new()
            .register(fetcher(EntityType::PullRequest))
            .unwrap()
            .register(fetcher(EntityType::PullRequest))
            .unwrap_err();
        assert_eq!(err, DefinitionError::DuplicateEntity(EntityType::PullRequest));
    }
}
