//! Typed entity records built from a property bag
//!
//! These are the provider-neutral wire shapes downstream converters emit.
//! Required fields are read with the strict accessors and fail explicitly;
//! optional fields fall back to zero values.

use serde::{Deserialize, Serialize};

use super::bag::PropertyBag;
use super::entity::EntityType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub owner: String,
    pub name: String,
    pub repo_id: i64,
    pub hook_id: i64,
    pub hook_url: String,
    pub hook_name: String,
    pub hook_type: String,
    pub hook_uuid: String,
    pub deploy_url: String,
    pub clone_url: String,
    pub default_branch: String,
    pub license: String,
    pub is_private: bool,
    pub is_fork: bool,
    pub properties: PropertyBag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestRecord {
    pub url: String,
    pub commit_sha: String,
    pub number: i64,
    pub repo_owner: String,
    pub repo_name: String,
    pub author_id: i64,
    pub properties: PropertyBag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub artifact_id: i64,
    pub owner: String,
    pub name: String,
    pub artifact_type: String,
    pub visibility: String,
    pub repository: String,
    pub properties: PropertyBag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub name: String,
    pub tag: String,
    pub branch: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub properties: PropertyBag,
}

/// One record per entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum EntityRecord {
    Repository(RepositoryRecord),
    PullRequest(PullRequestRecord),
    Artifact(ArtifactRecord),
    Release(ReleaseRecord),
}

impl EntityRecord {
    pub const fn entity_type(&self) -> EntityType {
        match self {
            Self::Repository(_) => EntityType::Repository,
            Self::PullRequest(_) => EntityType::PullRequest,
            Self::Artifact(_) => EntityType::Artifact,
            Self::Release(_) => EntityType::Release,
        }
    }

    pub const fn properties(&self) -> &PropertyBag {
        match self {
            Self::Repository(r) => &r.properties,
            Self::PullRequest(r) => &r.properties,
            Self::Artifact(r) => &r.properties,
            Self::Release(r) => &r.properties,
        }
    }
}
