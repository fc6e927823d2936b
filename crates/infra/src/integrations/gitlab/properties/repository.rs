//! GitLab project (repository) properties

use std::sync::Arc;

use async_trait::async_trait;
use forgeprops_core::properties::identity::{name_from_keys, resolve_identity};
use forgeprops_core::{DefinitionError, EntityFetcher, FetchContext, PropertyWrapper};
use forgeprops_domain::constants::{
    PROPERTY_NAME, PROPERTY_UPSTREAM_ID, REPO_PROPERTY_IS_ARCHIVED, REPO_PROPERTY_IS_FORK,
    REPO_PROPERTY_IS_PRIVATE,
};
use forgeprops_domain::{EntityType, IdentityError, PropertyBag, RawProperties, WrapperError};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{
    fetch_project, project_ref, Project, PROJECT_PROPERTY_ID, PROJECT_PROPERTY_NAME,
    PROJECT_PROPERTY_NAMESPACE,
};
use crate::integrations::gitlab::client::GitLabClient;
use crate::integrations::raw_properties;

pub const REPO_PROPERTY_DEFAULT_BRANCH: &str = "gitlab/default_branch";
pub const REPO_PROPERTY_LICENSE: &str = "gitlab/license";
pub const REPO_PROPERTY_CLONE_URL: &str = "gitlab/clone_url";
pub const REPO_PROPERTY_HOOK_ID: &str = "gitlab/hook_id";
pub const REPO_PROPERTY_HOOK_URL: &str = "gitlab/hook_url";

const IDENTITY_KEYS: [&str; 2] = [PROJECT_PROPERTY_NAMESPACE, PROJECT_PROPERTY_NAME];

const PROJECT_KEYS: [&str; 11] = [
    PROPERTY_NAME,
    PROPERTY_UPSTREAM_ID,
    REPO_PROPERTY_IS_PRIVATE,
    REPO_PROPERTY_IS_ARCHIVED,
    REPO_PROPERTY_IS_FORK,
    PROJECT_PROPERTY_ID,
    PROJECT_PROPERTY_NAME,
    PROJECT_PROPERTY_NAMESPACE,
    REPO_PROPERTY_DEFAULT_BRANCH,
    REPO_PROPERTY_LICENSE,
    REPO_PROPERTY_CLONE_URL,
];

const HOOK_KEYS: [&str; 2] = [REPO_PROPERTY_HOOK_ID, REPO_PROPERTY_HOOK_URL];

pub(crate) fn fetcher() -> Result<EntityFetcher<GitLabClient>, DefinitionError> {
    EntityFetcher::builder(EntityType::Repository, repository_name)
        .origin(PROJECT_KEYS, Arc::new(ProjectWrapper))
        .origin(HOOK_KEYS, Arc::new(ProjectHooksWrapper))
        .operational(HOOK_KEYS)
        .build()
}

/// `namespace/project`
pub fn repository_name(props: &PropertyBag) -> Result<String, IdentityError> {
    name_from_keys(props, &IDENTITY_KEYS)
}

/// Project reference from explicit keys or a two-segment `name`.
fn lookup_project(lookup: &PropertyBag) -> Result<String, IdentityError> {
    let segments = resolve_identity(lookup, &IDENTITY_KEYS)?;
    let [namespace, project] = segments.as_slice() else {
        return Err(IdentityError::InvalidIdentity("expected namespace and project".into()));
    };
    Ok(project_ref(lookup, namespace, project))
}

impl Project {
    fn into_raw(self) -> RawProperties {
        let license = self.license.map(|l| l.key).unwrap_or_default();
        raw_properties([
            (PROPERTY_NAME, json!(self.path_with_namespace)),
            (PROPERTY_UPSTREAM_ID, json!(self.id.to_string())),
            (REPO_PROPERTY_IS_PRIVATE, json!(self.visibility != "public")),
            (REPO_PROPERTY_IS_ARCHIVED, json!(self.archived)),
            (REPO_PROPERTY_IS_FORK, json!(self.forked_from_project.is_some())),
            (PROJECT_PROPERTY_ID, json!(self.id)),
            (PROJECT_PROPERTY_NAME, json!(self.path)),
            (PROJECT_PROPERTY_NAMESPACE, json!(self.namespace.full_path)),
            (REPO_PROPERTY_DEFAULT_BRANCH, json!(self.default_branch.unwrap_or_default())),
            (REPO_PROPERTY_LICENSE, json!(license)),
            (REPO_PROPERTY_CLONE_URL, json!(self.http_url_to_repo)),
        ])
    }
}

/// `GET /projects/{ref}?license=true`
#[derive(Debug)]
struct ProjectWrapper;

#[async_trait]
impl PropertyWrapper<GitLabClient> for ProjectWrapper {
    async fn fetch(
        &self,
        _ctx: &FetchContext,
        client: &GitLabClient,
        _is_org: bool,
        lookup: &PropertyBag,
    ) -> Result<RawProperties, WrapperError> {
        let project = lookup_project(lookup)?;
        debug!(%project, "fetching project");
        Ok(fetch_project(client, &project).await?.into_raw())
    }
}

#[derive(Debug, Deserialize)]
struct ProjectHook {
    id: i64,
    url: String,
}

/// `GET /projects/{ref}/hooks`, selecting the hook pointing at our webhook URL.
#[derive(Debug)]
struct ProjectHooksWrapper;

#[async_trait]
impl PropertyWrapper<GitLabClient> for ProjectHooksWrapper {
    async fn fetch(
        &self,
        _ctx: &FetchContext,
        client: &GitLabClient,
        _is_org: bool,
        lookup: &PropertyBag,
    ) -> Result<RawProperties, WrapperError> {
        let project = lookup_project(lookup)?;
        debug!(%project, "fetching project hooks");

        let hooks: Vec<ProjectHook> = client.get(&format!("projects/{project}/hooks"), &[]).await?;
        let (id, url) = hooks
            .into_iter()
            .find(|hook| is_our_hook(client.webhook_url(), &hook.url))
            .map(|hook| (hook.id, hook.url))
            .unwrap_or_default();

        Ok(raw_properties([(REPO_PROPERTY_HOOK_ID, json!(id)), (REPO_PROPERTY_HOOK_URL, json!(url))]))
    }
}

fn is_our_hook(webhook_url: &str, url: &str) -> bool {
    let base = webhook_url.trim_end_matches('/');
    !base.is_empty()
        && url
            .strip_prefix(base)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'))
}
