//! GitHub container package (artifact) properties

use std::sync::Arc;

use async_trait::async_trait;
use forgeprops_core::properties::identity::{explicit_identity, name_from_keys, required_string};
use forgeprops_core::{DefinitionError, EntityFetcher, FetchContext, PropertyWrapper};
use forgeprops_domain::constants::{NAME_SEPARATOR, PROPERTY_NAME, PROPERTY_UPSTREAM_ID};
use forgeprops_domain::{EntityType, IdentityError, PropertyBag, RawProperties, WrapperError};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::integrations::github::client::GitHubClient;
use crate::integrations::{raw_properties, segment};

pub const ARTIFACT_PROPERTY_ID: &str = "github/artifact_id";
pub const ARTIFACT_PROPERTY_OWNER: &str = "github/artifact_owner";
pub const ARTIFACT_PROPERTY_NAME: &str = "github/artifact_name";
/// Package ecosystem, `container` for every artifact fetched here
pub const ARTIFACT_PROPERTY_TYPE: &str = "github/artifact_type";
pub const ARTIFACT_PROPERTY_VISIBILITY: &str = "github/artifact_visibility";
/// `owner/repo` of the linked repository, empty when unlinked
pub const ARTIFACT_PROPERTY_REPO: &str = "github/artifact_repo";

const ARTIFACT_KEYS: [&str; 8] = [
    PROPERTY_NAME,
    PROPERTY_UPSTREAM_ID,
    ARTIFACT_PROPERTY_ID,
    ARTIFACT_PROPERTY_OWNER,
    ARTIFACT_PROPERTY_NAME,
    ARTIFACT_PROPERTY_TYPE,
    ARTIFACT_PROPERTY_VISIBILITY,
    ARTIFACT_PROPERTY_REPO,
];

pub(crate) fn fetcher() -> Result<EntityFetcher<GitHubClient>, DefinitionError> {
    EntityFetcher::builder(EntityType::Artifact, artifact_name)
        .origin(ARTIFACT_KEYS, Arc::new(ContainerPackageWrapper))
        .build()
}

/// `owner/package`
pub fn artifact_name(props: &PropertyBag) -> Result<String, IdentityError> {
    name_from_keys(props, &[ARTIFACT_PROPERTY_OWNER, ARTIFACT_PROPERTY_NAME])
}

/// Owner and package name of the lookup. Container package names may nest,
/// so `name` splits on its first separator only.
fn package_identity(lookup: &PropertyBag) -> Result<(String, String), IdentityError> {
    if let Some(mut segments) =
        explicit_identity(lookup, &[ARTIFACT_PROPERTY_OWNER, ARTIFACT_PROPERTY_NAME])
    {
        let name = segments.pop().unwrap_or_default();
        let owner = segments.pop().unwrap_or_default();
        return Ok((owner, name));
    }

    let qualified = required_string(lookup, PROPERTY_NAME).map_err(|_| {
        IdentityError::InvalidIdentity(format!(
            "lookup has neither {ARTIFACT_PROPERTY_OWNER} and {ARTIFACT_PROPERTY_NAME} nor {PROPERTY_NAME}"
        ))
    })?;
    match qualified.split_once(NAME_SEPARATOR) {
        Some((owner, name)) if !owner.trim().is_empty() && !name.trim().is_empty() => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(IdentityError::InvalidIdentity(format!(
            "expected owner{NAME_SEPARATOR}package, got {qualified:?}"
        ))),
    }
}

/// Package path under the owning organization or user.
fn package_path(is_org: bool, owner: &str, name: &str) -> String {
    let scope = if is_org { "orgs" } else { "users" };
    format!("{scope}/{}/packages/container/{}", segment(owner), segment(name))
}

#[derive(Debug, Deserialize)]
struct Owner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct LinkedRepository {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct Package {
    id: i64,
    name: String,
    #[serde(default)]
    package_type: String,
    #[serde(default)]
    visibility: String,
    owner: Owner,
    #[serde(default)]
    repository: Option<LinkedRepository>,
}

/// `GET /orgs/{owner}/packages/container/{name}` for organizations,
/// `GET /users/{owner}/packages/container/{name}` otherwise.
#[derive(Debug)]
struct ContainerPackageWrapper;

#[async_trait]
impl PropertyWrapper<GitHubClient> for ContainerPackageWrapper {
    async fn fetch(
        &self,
        _ctx: &FetchContext,
        client: &GitHubClient,
        is_org: bool,
        lookup: &PropertyBag,
    ) -> Result<RawProperties, WrapperError> {
        let (owner, name) = package_identity(lookup)?;
        debug!(%owner, %name, is_org, "fetching container package");

        let package: Package = client.get(&package_path(is_org, &owner, &name)).await?;
        let repo = package.repository.map(|r| r.full_name).unwrap_or_default();

        Ok(raw_properties([
            (PROPERTY_NAME, json!(format!("{}/{}", package.owner.login, package.name))),
            (PROPERTY_UPSTREAM_ID, json!(package.id.to_string())),
            (ARTIFACT_PROPERTY_ID, json!(package.id)),
            (ARTIFACT_PROPERTY_OWNER, json!(package.owner.login)),
            (ARTIFACT_PROPERTY_NAME, json!(package.name)),
            (ARTIFACT_PROPERTY_TYPE, json!(package.package_type)),
            (ARTIFACT_PROPERTY_VISIBILITY, json!(package.visibility)),
            (ARTIFACT_PROPERTY_REPO, json!(repo)),
        ]))
    }
}
