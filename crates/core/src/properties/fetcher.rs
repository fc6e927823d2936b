//! Property origins and per-entity fetchers

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use forgeprops_domain::{EntityType, IdentityError, PropertyBag};

use super::errors::DefinitionError;
use super::ports::{PropertyWrapper, SharedWrapper};

/// Pure name resolver for an entity's property bag.
pub type NameResolver = fn(&PropertyBag) -> Result<String, IdentityError>;

/// A set of keys produced together by one wrapper call.
pub struct PropertyOrigin<C: ?Sized + Sync> {
    keys: Vec<String>,
    wrapper: SharedWrapper<C>,
}

impl<C: ?Sized + Sync> PropertyOrigin<C> {
    pub fn new<I, K>(keys: I, wrapper: SharedWrapper<C>) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self { keys: keys.into_iter().map(Into::into).collect(), wrapper }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub const fn wrapper(&self) -> &SharedWrapper<C> {
        &self.wrapper
    }

    pub fn declares(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }
}

impl<C: ?Sized + Sync> Clone for PropertyOrigin<C> {
    fn clone(&self) -> Self {
        Self { keys: self.keys.clone(), wrapper: Arc::clone(&self.wrapper) }
    }
}

impl<C: ?Sized + Sync> fmt::Debug for PropertyOrigin<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyOrigin").field("keys", &self.keys).finish_non_exhaustive()
    }
}

/// Origins and operational keys for one entity type of one provider.
///
/// Built once through [`EntityFetcher::builder`] and immutable afterwards.
pub struct EntityFetcher<C: ?Sized + Sync> {
    entity: EntityType,
    origins: Vec<PropertyOrigin<C>>,
    operational: Vec<String>,
    name_resolver: NameResolver,
}

impl<C: ?Sized + Sync> EntityFetcher<C> {
    pub fn builder(entity: EntityType, name_resolver: NameResolver) -> EntityFetcherBuilder<C> {
        EntityFetcherBuilder {
            entity,
            origins: Vec::new(),
            operational: Vec::new(),
            name_resolver,
        }
    }

    pub const fn entity(&self) -> EntityType {
        self.entity
    }

    pub fn origins(&self) -> &[PropertyOrigin<C>] {
        &self.origins
    }

    /// The origin declaring `key`, scanning origins in order.
    pub fn origin_for_property(&self, key: &str) -> Option<&PropertyOrigin<C>> {
        self.origins.iter().find(|origin| origin.declares(key))
    }

    pub fn wrapper_for_property(&self, key: &str) -> Option<&SharedWrapper<C>> {
        self.origin_for_property(key).map(PropertyOrigin::wrapper)
    }

    /// One wrapper per origin, in origin order.
    pub fn all_property_wrappers(&self) -> Vec<&SharedWrapper<C>> {
        self.origins.iter().map(PropertyOrigin::wrapper).collect()
    }

    pub fn operational_properties(&self) -> &[String] {
        &self.operational
    }

    pub fn is_operational(&self, key: &str) -> bool {
        self.operational.iter().any(|k| k == key)
    }

    /// Every key any origin declares.
    pub fn declared_keys(&self) -> impl Iterator<Item = &str> {
        self.origins.iter().flat_map(|origin| origin.keys.iter().map(String::as_str))
    }

    /// Display name of the entity, without touching the network.
    ///
    /// # Errors
    /// Returns [`IdentityError::MissingRequiredProperty`] when identity keys
    /// are absent or empty.
    pub fn get_name(&self, props: &PropertyBag) -> Result<String, IdentityError> {
        (self.name_resolver)(props)
    }
}

impl<C: ?Sized + Sync> fmt::Debug for EntityFetcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityFetcher")
            .field("entity", &self.entity)
            .field("origins", &self.origins)
            .field("operational", &self.operational)
            .finish_non_exhaustive()
    }
}

/// Builder that enforces the origin/operational invariants.
pub struct EntityFetcherBuilder<C: ?Sized + Sync> {
    entity: EntityType,
    origins: Vec<PropertyOrigin<C>>,
    operational: Vec<String>,
    name_resolver: NameResolver,
}

impl<C: ?Sized + Sync> EntityFetcherBuilder<C> {
    #[must_use]
    pub fn origin<I, K>(mut self, keys: I, wrapper: Arc<dyn PropertyWrapper<C>>) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.origins.push(PropertyOrigin::new(keys, wrapper));
        self
    }

    #[must_use]
    pub fn operational<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.operational.extend(keys.into_iter().map(Into::into));
        self
    }

    /// # Errors
    /// Returns a [`DefinitionError`] when there are no origins, an origin is
    /// empty, a key is declared twice, or an operational key is not declared
    /// by any origin.
    pub fn build(self) -> Result<EntityFetcher<C>, DefinitionError> {
        let entity = self.entity;
        if self.origins.is_empty() {
            return Err(DefinitionError::NoOrigins { entity });
        }

        let mut seen = HashSet::new();
        for (index, origin) in self.origins.iter().enumerate() {
            if origin.keys.is_empty() {
                return Err(DefinitionError::EmptyOrigin { entity, index });
            }
            for key in &origin.keys {
                if !seen.insert(key.as_str()) {
                    return Err(DefinitionError::DuplicateKey { entity, key: key.clone() });
                }
            }
        }

        if let Some(key) = self.operational.iter().find(|key| !seen.contains(key.as_str())) {
            return Err(DefinitionError::OperationalNotDeclared { entity, key: key.clone() });
        }

        let mut operational = self.operational;
        operational.sort();
        operational.dedup();

        Ok(EntityFetcher {
            entity,
            origins: self.origins,
            operational,
            name_resolver: self.name_resolver,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use forgeprops_domain::{RawProperties, WrapperError};

    use super::*;
    use crate::properties::context::FetchContext;

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

    fn name_of(props: &PropertyBag) -> Result<String, IdentityError> {
        props
            .get_string("name")
            .map_err(|_| IdentityError::MissingRequiredProperty("name".into()))
    }

    fn wrapper() -> SharedWrapper<()> {
        Arc::new(Noop)
    }

    fn repo_fetcher() -> EntityFetcher<()> {
        EntityFetcher::builder(EntityType::Repository, name_of)
            .origin(["name", "repo_id", "is_private", "clone_url", "license"], wrapper())
            .origin(["hook_id", "hook_url"], wrapper())
            .operational(["hook_id", "hook_url"])
            .build()
            .expect("valid fetcher")
    }

    #[test]
    fn every_key_resolves_to_the_wrapper_it_is_grouped_under() {
        let fetcher = repo_fetcher();
        let wrappers = fetcher.all_property_wrappers();

        assert_eq!(wrappers.len(), fetcher.origins().len());
        for (origin, grouped) in fetcher.origins().iter().zip(wrappers) {
            for key in origin.keys() {
                let resolved = fetcher.wrapper_for_property(key).expect("declared key");
                assert!(Arc::ptr_eq(resolved, grouped), "key {key} resolved elsewhere");
            }
        }
    }

    #[test]
    fn five_keys_in_one_origin_batch_into_one_wrapper() {
        let fetcher = EntityFetcher::builder(EntityType::Repository, name_of)
            .origin(["a", "b", "c", "d", "e"], wrapper())
            .build()
            .unwrap();
        assert_eq!(fetcher.all_property_wrappers().len(), 1);
    }

    #[test]
    fn unknown_key_has_no_wrapper() {
        assert!(repo_fetcher().wrapper_for_property("github/unknown").is_none());
    }

    #[test]
    fn operational_properties_are_exposed() {
        let fetcher = repo_fetcher();
        assert_eq!(fetcher.operational_properties(), ["hook_id", "hook_url"]);
        assert!(fetcher.is_operational("hook_id"));
        assert!(!fetcher.is_operational("repo_id"));
    }

    #[test]
    fn build_rejects_duplicate_keys_across_origins() {
        let err = EntityFetcher::builder(EntityType::Release, name_of)
            .origin(["name", "tag"], wrapper())
            .origin(["tag"], wrapper())
            .build()
            .unwrap_err();
        assert_eq!(err, DefinitionError::DuplicateKey { entity: EntityType::Release, key: "tag".into() });
    }

    #[test]
    fn build_rejects_undeclared_operational_key() {
        let err = EntityFetcher::builder(EntityType::Repository, name_of)
            .origin(["name"], wrapper())
            .operational(["hook_id"])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::OperationalNotDeclared {
                entity: EntityType::Repository,
                key: "hook_id".into()
            }
        );
    }

    #[test]
    fn build_rejects_empty_definitions() {
        let err = EntityFetcher::<()>::builder(EntityType::Artifact, name_of).build().unwrap_err();
        assert_eq!(err, DefinitionError::NoOrigins { entity: EntityType::Artifact });

        let err = EntityFetcher::builder(EntityType::Artifact, name_of)
            .origin(Vec::<String>::new(), wrapper())
            .build()
            .unwrap_err();
        assert_eq!(err, DefinitionError::EmptyOrigin { entity: EntityType::Artifact, index: 0 });
    }

    #[test]
    fn get_name_delegates_to_resolver() {
        let fetcher = repo_fetcher();
        let props = PropertyBag::new().with("name", "octo/repo");
        assert_eq!(fetcher.get_name(&props).unwrap(), "octo/repo");
        assert!(fetcher.get_name(&PropertyBag::new()).is_err());
    }
}
