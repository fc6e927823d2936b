//! GitHub pull request properties

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

pub const PULL_PROPERTY_URL: &str = "github/pull_url";
pub const PULL_PROPERTY_NUMBER: &str = "github/pull_number";
/// Head commit SHA
pub const PULL_PROPERTY_SHA: &str = "github/pull_sha";
pub const PULL_PROPERTY_AUTHOR_ID: &str = "github/pull_author_id";
pub const PULL_PROPERTY_AUTHOR_LOGIN: &str = "github/pull_author_login";
pub const PULL_PROPERTY_STATE: &str = "github/pull_state";

const IDENTITY_KEYS: [&str; 3] = [REPO_PROPERTY_OWNER, REPO_PROPERTY_NAME, PULL_PROPERTY_NUMBER];

const PULL_KEYS: [&str; 10] = [
    PROPERTY_NAME,
    PROPERTY_UPSTREAM_ID,
    REPO_PROPERTY_OWNER,
    REPO_PROPERTY_NAME,
    PULL_PROPERTY_URL,
    PULL_PROPERTY_NUMBER,
    PULL_PROPERTY_SHA,
    PULL_PROPERTY_AUTHOR_ID,
    PULL_PROPERTY_AUTHOR_LOGIN,
    PULL_PROPERTY_STATE,
];

pub(crate) fn fetcher() -> Result<EntityFetcher<GitHubClient>, DefinitionError> {
    EntityFetcher::builder(EntityType::PullRequest, pull_request_name)
        .origin(PULL_KEYS, Arc::new(PullRequestWrapper))
        .build()
}

/// `owner/repo/number`
pub fn pull_request_name(props: &PropertyBag) -> Result<String, IdentityError> {
    name_from_keys(props, &IDENTITY_KEYS)
}

#[derive(Debug, Deserialize)]
struct User {
    id: i64,
    login: String,
}

#[derive(Debug, Deserialize)]
struct Head {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    id: i64,
    number: i64,
    #[serde(default)]
    url: String,
    #[serde(default)]
    state: String,
    head: Head,
    user: User,
}

/// `GET /repos/{owner}/{repo}/pulls/{number}`
#[derive(Debug)]
struct PullRequestWrapper;

#[async_trait]
impl PropertyWrapper<GitHubClient> for PullRequestWrapper {
    async fn fetch(
        &self,
        _ctx: &FetchContext,
        client: &GitHubClient,
        _is_org: bool,
        lookup: &PropertyBag,
    ) -> Result<RawProperties, WrapperError> {
        let [owner, repo, number] = identity(lookup)?;
        debug!(%owner, %repo, %number, "fetching pull request");

        let pull: PullRequest = client
            .get(&format!("repos/{}/{}/pulls/{}", segment(&owner), segment(&repo), segment(&number)))
            .await?;

        Ok(raw_properties([
            (PROPERTY_NAME, json!(format!("{owner}/{repo}/{}", pull.number))),
            (PROPERTY_UPSTREAM_ID, json!(pull.id.to_string())),
            (REPO_PROPERTY_OWNER, json!(owner)),
            (REPO_PROPERTY_NAME, json!(repo)),
            (PULL_PROPERTY_URL, json!(pull.url)),
            (PULL_PROPERTY_NUMBER, json!(pull.number)),
            (PULL_PROPERTY_SHA, json!(pull.head.sha)),
            (PULL_PROPERTY_AUTHOR_ID, json!(pull.user.id)),
            (PULL_PROPERTY_AUTHOR_LOGIN, json!(pull.user.login)),
            (PULL_PROPERTY_STATE, json!(pull.state)),
        ]))
    }
}

fn identity(lookup: &PropertyBag) -> Result<[String; 3], IdentityError> {
    let segments = resolve_identity(lookup, &IDENTITY_KEYS)?;
    let [owner, repo, number]: [String; 3] = segments
        .try_into()
        .map_err(|_| IdentityError::InvalidIdentity("expected owner, repo and number".into()))?;
    if number.parse::<u64>().is_err() {
        return Err(IdentityError::InvalidIdentity(format!("pull request number {number:?} is not numeric")));
    }
    Ok([owner, repo, number])
}
