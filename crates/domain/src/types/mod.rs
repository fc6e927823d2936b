//! Core data types of the property engine

pub mod bag;
pub mod entity;
pub mod property;
pub mod record;

pub use bag::PropertyBag;
pub use entity::{EntityType, ProviderType};
pub use property::{Property, PropertyValue, RawProperties};
pub use record::{
    ArtifactRecord, EntityRecord, PullRequestRecord, ReleaseRecord, RepositoryRecord,
};
