//! GitLab merge request properties

use std::sync::Arc;

use async_trait::async_trait;
use forgeprops_core::properties::identity::{name_from_keys, resolve_identity};
use forgeprops_core::{DefinitionError, EntityFetcher, FetchContext, PropertyWrapper};
use forgeprops_domain::constants::{PROPERTY_NAME, PROPERTY_UPSTREAM_ID};
use forgeprops_domain::{EntityType, IdentityError, PropertyBag, RawProperties, WrapperError};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{
    fetch_project, project_ref, PROJECT_PROPERTY_ID, PROJECT_PROPERTY_NAME,
    PROJECT_PROPERTY_NAMESPACE,
};
use crate::integrations::gitlab::client::GitLabClient;
use crate::integrations::raw_properties;

/// Project-scoped `iid`
pub const MR_PROPERTY_NUMBER: &str = "gitlab/merge_request_number";
/// Numeric id of the author
pub const MR_PROPERTY_AUTHOR: &str = "gitlab/merge_request_author";
pub const MR_PROPERTY_URL: &str = "gitlab/merge_request_url";
pub const MR_PROPERTY_SHA: &str = "gitlab/merge_request_sha";

const IDENTITY_KEYS: [&str; 3] =
    [PROJECT_PROPERTY_NAMESPACE, PROJECT_PROPERTY_NAME, MR_PROPERTY_NUMBER];

const MR_KEYS: [&str; 9] = [
    PROPERTY_NAME,
    PROPERTY_UPSTREAM_ID,
    PROJECT_PROPERTY_ID,
    PROJECT_PROPERTY_NAMESPACE,
    PROJECT_PROPERTY_NAME,
    MR_PROPERTY_NUMBER,
    MR_PROPERTY_AUTHOR,
    MR_PROPERTY_URL,
    MR_PROPERTY_SHA,
];

pub(crate) fn fetcher() -> Result<EntityFetcher<GitLabClient>, DefinitionError> {
    EntityFetcher::builder(EntityType::PullRequest, merge_request_name)
        .origin(MR_KEYS, Arc::new(MergeRequestWrapper))
        .build()
}

/// `namespace/project/iid`
pub fn merge_request_name(props: &PropertyBag) -> Result<String, IdentityError> {
    name_from_keys(props, &IDENTITY_KEYS)
}

#[derive(Debug, Deserialize)]
struct Author {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct MergeRequest {
    id: i64,
    iid: i64,
    #[serde(default)]
    web_url: String,
    #[serde(default)]
    sha: Option<String>,
    author: Author,
}

/// `GET /projects/{ref}/merge_requests/{iid}`, with the project fetched
/// alongside for its namespace and id.
#[derive(Debug)]
struct MergeRequestWrapper;

#[async_trait]
impl PropertyWrapper<GitLabClient> for MergeRequestWrapper {
    async fn fetch(
        &self,
        _ctx: &FetchContext,
        client: &GitLabClient,
        _is_org: bool,
        lookup: &PropertyBag,
    ) -> Result<RawProperties, WrapperError> {
        let segments = resolve_identity(lookup, &IDENTITY_KEYS)?;
        let [namespace, project, iid] = segments.as_slice() else {
            return Err(IdentityError::InvalidIdentity("expected namespace, project and iid".into()).into());
        };
        if iid.parse::<u64>().is_err() {
            return Err(IdentityError::InvalidIdentity(format!("merge request iid {iid:?} is not numeric")).into());
        }
        let project_ref = project_ref(lookup, namespace, project);
        debug!(project = %project_ref, %iid, "fetching merge request");

        let mr_path = format!("projects/{project_ref}/merge_requests/{iid}");
        let (project, mr) = tokio::try_join!(
            fetch_project(client, &project_ref),
            client.get::<MergeRequest>(&mr_path, &[]),
        )?;

        Ok(raw_properties([
            (PROPERTY_NAME, json!(format!("{}/{}", project.path_with_namespace, mr.iid))),
            (PROPERTY_UPSTREAM_ID, json!(mr.id.to_string())),
            (PROJECT_PROPERTY_ID, json!(project.id)),
            (PROJECT_PROPERTY_NAMESPACE, json!(project.namespace.full_path)),
            (PROJECT_PROPERTY_NAME, json!(project.path)),
            (MR_PROPERTY_NUMBER, json!(mr.iid)),
            (MR_PROPERTY_AUTHOR, json!(mr.author.id)),
            (MR_PROPERTY_URL, json!(mr.web_url)),
            (MR_PROPERTY_SHA, json!(mr.sha.unwrap_or_default())),
        ]))
    }
}
