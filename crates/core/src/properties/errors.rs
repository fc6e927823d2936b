//! Construction-time defects in fetcher tables

use forgeprops_domain::EntityType;
use thiserror::Error;

/// A fetcher or registry definition that violates its invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("entity {entity} declares no property origins")]
    NoOrigins { entity: EntityType },

    #[error("origin #{index} of entity {entity} declares no keys")]
    EmptyOrigin { entity: EntityType, index: usize },

    #[error("property {key} is declared by more than one origin of entity {entity}")]
    DuplicateKey { entity: EntityType, key: String },

    #[error("operational property {key} is not produced by any origin of entity {entity}")]
    OperationalNotDeclared { entity: EntityType, key: String },

    #[error("entity {0} registered twice")]
    DuplicateEntity(EntityType),
}
