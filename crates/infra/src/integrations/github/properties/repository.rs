//! GitHub repository properties

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

use crate::integrations::github::client::GitHubClient;
use crate::integrations::{raw_properties, segment};

/// Numerical GitHub repository id
pub const REPO_PROPERTY_ID: &str = "github/repo_id";
pub const REPO_PROPERTY_NAME: &str = "github/repo_name";
pub const REPO_PROPERTY_OWNER: &str = "github/repo_owner";
pub const REPO_PROPERTY_DEPLOY_URL: &str = "github/deploy_url";
pub const REPO_PROPERTY_CLONE_URL: &str = "github/clone_url";
pub const REPO_PROPERTY_DEFAULT_BRANCH: &str = "github/default_branch";
/// SPDX id of the repository license
pub const REPO_PROPERTY_LICENSE: &str = "github/license";
pub const REPO_PROPERTY_PRIMARY_LANGUAGE: &str = "github/primary_language";

pub const REPO_PROPERTY_HOOK_ID: &str = "github/hook_id";
pub const REPO_PROPERTY_HOOK_URL: &str = "github/hook_url";
pub const REPO_PROPERTY_HOOK_NAME: &str = "github/hook_name";
pub const REPO_PROPERTY_HOOK_TYPE: &str = "github/hook_type";
pub const REPO_PROPERTY_HOOK_UIID: &str = "github/hook_uiid";

const REPO_KEYS: [&str; 13] = [
    PROPERTY_NAME,
    PROPERTY_UPSTREAM_ID,
    REPO_PROPERTY_IS_PRIVATE,
    REPO_PROPERTY_IS_ARCHIVED,
    REPO_PROPERTY_IS_FORK,
    REPO_PROPERTY_ID,
    REPO_PROPERTY_NAME,
    REPO_PROPERTY_OWNER,
    REPO_PROPERTY_DEPLOY_URL,
    REPO_PROPERTY_CLONE_URL,
    REPO_PROPERTY_DEFAULT_BRANCH,
    REPO_PROPERTY_LICENSE,
    REPO_PROPERTY_PRIMARY_LANGUAGE,
];

const HOOK_KEYS: [&str; 5] = [
    REPO_PROPERTY_HOOK_ID,
    REPO_PROPERTY_HOOK_URL,
    REPO_PROPERTY_HOOK_NAME,
    REPO_PROPERTY_HOOK_TYPE,
    REPO_PROPERTY_HOOK_UIID,
];

/// Assigned when this system registered the hook.
const OPERATIONAL_KEYS: [&str; 2] = [REPO_PROPERTY_HOOK_ID, REPO_PROPERTY_HOOK_URL];

pub(crate) fn fetcher() -> Result<EntityFetcher<GitHubClient>, DefinitionError> {
    EntityFetcher::builder(EntityType::Repository, repository_name)
        .origin(REPO_KEYS, Arc::new(RepositoryWrapper))
        .origin(HOOK_KEYS, Arc::new(RepositoryHooksWrapper))
        .operational(OPERATIONAL_KEYS)
        .build()
}

/// `owner/name` from the explicit GitHub keys.
pub fn repository_name(props: &PropertyBag) -> Result<String, IdentityError> {
    name_from_keys(props, &[REPO_PROPERTY_OWNER, REPO_PROPERTY_NAME])
}

/// Owner and name from the lookup, falling back to splitting `name`.
pub(crate) fn owner_and_name(lookup: &PropertyBag) -> Result<(String, String), IdentityError> {
    let mut segments = resolve_identity(lookup, &[REPO_PROPERTY_OWNER, REPO_PROPERTY_NAME])?;
    let name = segments.pop().unwrap_or_default();
    let owner = segments.pop().unwrap_or_default();
    Ok((owner, name))
}

#[derive(Debug, Deserialize)]
struct Owner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct License {
    #[serde(default)]
    spdx_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    id: i64,
    name: String,
    owner: Owner,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    deployments_url: String,
    #[serde(default)]
    clone_url: String,
    #[serde(default)]
    default_branch: String,
    #[serde(default)]
    license: Option<License>,
    #[serde(default)]
    language: Option<String>,
}

impl Repository {
    fn into_raw(self) -> RawProperties {
        let license = self.license.and_then(|l| l.spdx_id).unwrap_or_default();
        raw_properties([
            (PROPERTY_NAME, json!(format!("{}/{}", self.owner.login, self.name))),
            (PROPERTY_UPSTREAM_ID, json!(self.id.to_string())),
            (REPO_PROPERTY_IS_PRIVATE, json!(self.private)),
            (REPO_PROPERTY_IS_ARCHIVED, json!(self.archived)),
            (REPO_PROPERTY_IS_FORK, json!(self.fork)),
            (REPO_PROPERTY_ID, json!(self.id)),
            (REPO_PROPERTY_NAME, json!(self.name)),
            (REPO_PROPERTY_OWNER, json!(self.owner.login)),
            (REPO_PROPERTY_DEPLOY_URL, json!(self.deployments_url)),
            (REPO_PROPERTY_CLONE_URL, json!(self.clone_url)),
            (REPO_PROPERTY_DEFAULT_BRANCH, json!(self.default_branch)),
            (REPO_PROPERTY_LICENSE, json!(license)),
            (REPO_PROPERTY_PRIMARY_LANGUAGE, json!(self.language.unwrap_or_default())),
        ])
    }
}

/// `GET /repos/{owner}/{repo}`
#[derive(Debug)]
struct RepositoryWrapper;

#[async_trait]
impl PropertyWrapper<GitHubClient> for RepositoryWrapper {
    async fn fetch(
        &self,
        _ctx: &FetchContext,
        client: &GitHubClient,
        _is_org: bool,
        lookup: &PropertyBag,
    ) -> Result<RawProperties, WrapperError> {
        let (owner, name) = owner_and_name(lookup)?;
        debug!(%owner, %name, "fetching repository");

        let repo: Repository =
            client.get(&format!("repos/{}/{}", segment(&owner), segment(&name))).await?;
        Ok(repo.into_raw())
    }
}

#[derive(Debug, Deserialize)]
struct HookConfig {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Hook {
    id: i64,
    #[serde(default)]
    url: String,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    hook_type: String,
    config: HookConfig,
}

/// `GET /repos/{owner}/{repo}/hooks`, selecting the hook registered by this
/// system.
#[derive(Debug)]
struct RepositoryHooksWrapper;

#[async_trait]
impl PropertyWrapper<GitHubClient> for RepositoryHooksWrapper {
    async fn fetch(
        &self,
        _ctx: &FetchContext,
        client: &GitHubClient,
        _is_org: bool,
        lookup: &PropertyBag,
    ) -> Result<RawProperties, WrapperError> {
        let (owner, name) = owner_and_name(lookup)?;
        debug!(%owner, %name, "fetching repository hooks");

        let hooks: Vec<Hook> =
            client.get(&format!("repos/{}/{}/hooks", segment(&owner), segment(&name))).await?;

        let ours = hooks.into_iter().find_map(|hook| {
            let uiid = hook_uiid(client.webhook_url(), hook.config.url.as_deref()?)?;
            Some((hook, uiid))
        });

        Ok(match ours {
            Some((hook, uiid)) => raw_properties([
                (REPO_PROPERTY_HOOK_ID, json!(hook.id)),
                (REPO_PROPERTY_HOOK_URL, json!(hook.url)),
                (REPO_PROPERTY_HOOK_NAME, json!(hook.name)),
                (REPO_PROPERTY_HOOK_TYPE, json!(hook.hook_type)),
                (REPO_PROPERTY_HOOK_UIID, json!(uiid)),
            ]),
            None => {
                debug!(%owner, %name, "no hook registered by this system");
                raw_properties([
                    (REPO_PROPERTY_HOOK_ID, json!(0)),
                    (REPO_PROPERTY_HOOK_URL, json!("")),
                    (REPO_PROPERTY_HOOK_NAME, json!("")),
                    (REPO_PROPERTY_HOOK_TYPE, json!("")),
                    (REPO_PROPERTY_HOOK_UIID, json!("")),
                ])
            }
        })
    }
}

/// Identifier appended to our webhook URL when the hook was registered, or
/// `None` if `configured` does not point at our webhook URL.
fn hook_uiid(webhook_url: &str, configured: &str) -> Option<String> {
    let base = webhook_url.trim_end_matches('/');
    if base.is_empty() {
        return None;
    }
    let rest = configured.strip_prefix(base)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }
    Some(rest.trim_matches('/').to_string())
}
