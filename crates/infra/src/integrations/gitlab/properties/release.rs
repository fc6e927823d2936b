//! GitLab release properties

use std::sync::Arc;

use async_trait::async_trait;
use forgeprops_core::properties::identity::{name_from_keys, resolve_identity};
use forgeprops_core::{DefinitionError, EntityFetcher, FetchContext, PropertyWrapper};
use forgeprops_domain::constants::PROPERTY_NAME;
use forgeprops_domain::{EntityType, IdentityError, PropertyBag, RawProperties, WrapperError};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{
    fetch_project, project_ref, PROJECT_PROPERTY_ID, PROJECT_PROPERTY_NAME,
    PROJECT_PROPERTY_NAMESPACE,
};
use crate::integrations::gitlab::client::GitLabClient;
use crate::integrations::{raw_properties, segment};

pub const RELEASE_PROPERTY_TAG: &str = "gitlab/release_tag";
pub const RELEASE_PROPERTY_NAME: &str = "gitlab/release_name";
/// SHA the release tag points at
pub const RELEASE_PROPERTY_COMMIT: &str = "gitlab/release_commit";

const IDENTITY_KEYS: [&str; 3] =
    [PROJECT_PROPERTY_NAMESPACE, PROJECT_PROPERTY_NAME, RELEASE_PROPERTY_TAG];

const RELEASE_KEYS: [&str; 7] = [
    PROPERTY_NAME,
    PROJECT_PROPERTY_ID,
    PROJECT_PROPERTY_NAMESPACE,
    PROJECT_PROPERTY_NAME,
    RELEASE_PROPERTY_TAG,
    RELEASE_PROPERTY_NAME,
    RELEASE_PROPERTY_COMMIT,
];

pub(crate) fn fetcher() -> Result<EntityFetcher<GitLabClient>, DefinitionError> {
    EntityFetcher::builder(EntityType::Release, release_name)
        .origin(RELEASE_KEYS, Arc::new(ReleaseWrapper))
        .build()
}

/// `namespace/project/tag`
pub fn release_name(props: &PropertyBag) -> Result<String, IdentityError> {
    name_from_keys(props, &IDENTITY_KEYS)
}

#[derive(Debug, Deserialize)]
struct Commit {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    commit: Option<Commit>,
}

/// `GET /projects/{ref}/releases/{tag}`
#[derive(Debug)]
struct ReleaseWrapper;

#[async_trait]
impl PropertyWrapper<GitLabClient> for ReleaseWrapper {
    async fn fetch(
        &self,
        _ctx: &FetchContext,
        client: &GitLabClient,
        _is_org: bool,
        lookup: &PropertyBag,
    ) -> Result<RawProperties, WrapperError> {
        let segments = resolve_identity(lookup, &IDENTITY_KEYS)?;
        let [namespace, project, tag] = segments.as_slice() else {
            return Err(IdentityError::InvalidIdentity("expected namespace, project and tag".into()).into());
        };
        let project_ref = project_ref(lookup, namespace, project);
        debug!(project = %project_ref, %tag, "fetching release");

        let release_path = format!("projects/{project_ref}/releases/{}", segment(tag));
        let (project, release) = tokio::try_join!(
            fetch_project(client, &project_ref),
            client.get::<Release>(&release_path, &[]),
        )?;

        Ok(raw_properties([
            (PROPERTY_NAME, json!(format!("{}/{}", project.path_with_namespace, release.tag_name))),
            (PROJECT_PROPERTY_ID, json!(project.id)),
            (PROJECT_PROPERTY_NAMESPACE, json!(project.namespace.full_path)),
            (PROJECT_PROPERTY_NAME, json!(project.path)),
            (RELEASE_PROPERTY_TAG, json!(release.tag_name)),
            (RELEASE_PROPERTY_NAME, json!(release.name.unwrap_or_default())),
            (RELEASE_PROPERTY_COMMIT, json!(release.commit.map(|c| c.id).unwrap_or_default())),
        ]))
    }
}
