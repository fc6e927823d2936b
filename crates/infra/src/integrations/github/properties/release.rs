//! GitHub release properties

use std::sync::Arc;

use async_trait::async_trait;
use forgeprops_core::properties::identity::{name_from_keys, resolve_identity};
use forgeprops_core::{DefinitionError, EntityFetcher, FetchContext, PropertyWrapper};
use forgeprops_domain::constants::{PROPERTY_NAME, PROPERTY_UPSTREAM_ID};
use forgeprops_domain::{EntityType, IdentityError, PropertyBag, RawProperties, WrapperError};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::repository::{REPO_PROPERTY_NAME, REPO_PROPERTY_OWNER};
use crate::integrations::github::client::GitHubClient;
use crate::integrations::{raw_properties, segment};

pub const RELEASE_PROPERTY_ID: &str = "github/release_id";
pub const RELEASE_PROPERTY_TAG: &str = "github/release_tag";
/// Branch or commit the tag was created from
pub const RELEASE_PROPERTY_BRANCH: &str = "github/release_branch";
pub const RELEASE_PROPERTY_TITLE: &str = "github/release_title";

const IDENTITY_KEYS: [&str; 3] = [REPO_PROPERTY_OWNER, REPO_PROPERTY_NAME, RELEASE_PROPERTY_TAG];

const RELEASE_KEYS: [&str; 8] = [
    PROPERTY_NAME,
    PROPERTY_UPSTREAM_ID,
    REPO_PROPERTY_OWNER,
    REPO_PROPERTY_NAME,
    RELEASE_PROPERTY_ID,
    RELEASE_PROPERTY_TAG,
    RELEASE_PROPERTY_BRANCH,
    RELEASE_PROPERTY_TITLE,
];

pub(crate) fn fetcher() -> Result<EntityFetcher<GitHubClient>, DefinitionError> {
    EntityFetcher::builder(EntityType::Release, release_name)
        .origin(RELEASE_KEYS, Arc::new(ReleaseByTagWrapper))
        .build()
}

/// `owner/repo/tag`
pub fn release_name(props: &PropertyBag) -> Result<String, IdentityError> {
    name_from_keys(props, &IDENTITY_KEYS)
}

#[derive(Debug, Deserialize)]
struct Release {
    id: i64,
    tag_name: String,
    #[serde(default)]
    target_commitish: String,
    #[serde(default)]
    name: Option<String>,
}

/// `GET /repos/{owner}/{repo}/releases/tags/{tag}`
#[derive(Debug)]
struct ReleaseByTagWrapper;

#[async_trait]
impl PropertyWrapper<GitHubClient> for ReleaseByTagWrapper {
    async fn fetch(
        &self,
        _ctx: &FetchContext,
        client: &GitHubClient,
        _is_org: bool,
        lookup: &PropertyBag,
    ) -> Result<RawProperties, WrapperError> {
        let mut segments = resolve_identity(lookup, &IDENTITY_KEYS)?;
        let tag = segments.pop().unwrap_or_default();
        let repo = segments.pop().unwrap_or_default();
        let owner = segments.pop().unwrap_or_default();
        debug!(%owner, %repo, %tag, "fetching release");

        let release: Release = client
            .get(&format!(
                "repos/{}/{}/releases/tags/{}",
                segment(&owner),
                segment(&repo),
                segment(&tag)
            ))
            .await?;

        Ok(raw_properties([
            (PROPERTY_NAME, json!(format!("{owner}/{repo}/{}", release.tag_name))),
            (PROPERTY_UPSTREAM_ID, json!(release.id.to_string())),
            (REPO_PROPERTY_OWNER, json!(owner)),
            (REPO_PROPERTY_NAME, json!(repo)),
            (RELEASE_PROPERTY_ID, json!(release.id)),
            (RELEASE_PROPERTY_TAG, json!(release.tag_name)),
            (RELEASE_PROPERTY_BRANCH, json!(release.target_commitish)),
            (RELEASE_PROPERTY_TITLE, json!(release.name.unwrap_or_default())),
        ]))
    }
}
