//! Error types used throughout the engine

use thiserror::Error;

use crate::types::EntityType;

/// Errors raised while constructing or reading a [`crate::Property`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    #[error("property {key} not found")]
    Missing { key: String },

    #[error("property {key} is a {actual}, expected {expected}")]
    TypeMismatch { key: String, expected: &'static str, actual: &'static str },

    #[error("property {key} has unsupported value type {kind}")]
    UnsupportedValue { key: String, kind: &'static str },
}

/// The lookup properties are not enough to identify the target entity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("missing required property: {0}")]
    MissingRequiredProperty(String),
}

/// Failure of a single upstream API call made by a fetch wrapper.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WrapperError {
    /// The upstream signalled that the entity does not exist.
    #[error("entity not found upstream: {0}")]
    NotFound(String),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),

    #[error("fetch cancelled")]
    Cancelled,

    #[error("fetch deadline exceeded")]
    DeadlineExceeded,
}

/// Main error type returned by the property services
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("property fetchers not initialized")]
    NotInitialized,

    #[error("entity {0} not supported")]
    UnsupportedEntity(EntityType),

    #[error("property {key} not supported for entity {entity}")]
    UnsupportedProperty { entity: EntityType, key: String },

    #[error("error fetching {} for entity {}: {}", fetch_target(.key), .entity, .source)]
    WrapperFailed {
        entity: EntityType,
        key: Option<String>,
        #[source]
        source: WrapperError,
    },

    /// A wrapper did not return a key its origin declares. Internal defect.
    #[error("property {key} not produced by its origin for entity {entity}")]
    PropertyNotProduced { entity: EntityType, key: String },

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    InvalidProperty(#[from] PropertyError),
}

impl FetchError {
    /// True when the upstream reported that the entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::WrapperFailed { source: WrapperError::NotFound(_), .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::WrapperFailed {
                source: WrapperError::Cancelled | WrapperError::DeadlineExceeded,
                ..
            }
        )
    }

    /// The underlying wrapper failure, if any.
    pub fn wrapper_error(&self) -> Option<&WrapperError> {
        match self {
            Self::WrapperFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn fetch_target(key: &Option<String>) -> String {
    match key {
        Some(key) => format!("property {key}"),
        None => "properties".to_string(),
    }
}

/// Configuration loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Invalid(String),

    #[error("Config file not found: {0}")]
    NotFound(String),
}

/// Result type alias for property fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;
