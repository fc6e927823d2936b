//! GitLab entity fetchers
//!
//! Every entity is scoped to a project. Wrappers address the project by its
//! numeric id when the lookup carries one, and by the encoded
//! `namespace/project` path otherwise.

pub mod merge_request;
pub mod release;
pub mod repository;

use forgeprops_core::{DefinitionError, FetcherRegistry};
use forgeprops_domain::{PropertyBag, WrapperError};
use serde::Deserialize;

use super::client::GitLabClient;
use crate::integrations::segment;

pub const PROJECT_PROPERTY_ID: &str = "gitlab/project_id";
pub const PROJECT_PROPERTY_NAME: &str = "gitlab/project_name";
/// Full namespace path, nested groups included
pub const PROJECT_PROPERTY_NAMESPACE: &str = "gitlab/namespace";

/// Fetcher table for every entity type GitLab supports.
///
/// # Errors
/// Returns a [`DefinitionError`] if a fetcher table is inconsistent.
pub fn property_fetchers() -> Result<FetcherRegistry<GitLabClient>, DefinitionError> {
    FetcherRegistry::new()
        .register(repository::fetcher()?)?
        .register(merge_request::fetcher()?)?
        .register(release::fetcher()?)
}

/// URL segment addressing a project.
pub(crate) fn project_ref(lookup: &PropertyBag, namespace: &str, project: &str) -> String {
    match lookup.get_i64(PROJECT_PROPERTY_ID) {
        Ok(id) if id > 0 => id.to_string(),
        _ => segment(&format!("{namespace}/{project}")),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Namespace {
    pub full_path: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectLicense {
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Project {
    pub id: i64,
    pub path: String,
    pub path_with_namespace: String,
    pub namespace: Namespace,
    #[serde(default)]
    pub visibility: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub forked_from_project: Option<serde_json::Value>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub license: Option<ProjectLicense>,
    #[serde(default)]
    pub http_url_to_repo: String,
}

/// `GET /projects/{ref}?license=true`
pub(crate) async fn fetch_project(
    client: &GitLabClient,
    project: &str,
) -> Result<Project, WrapperError> {
    client.get(&format!("projects/{project}"), &[("license", "true")]).await
}
