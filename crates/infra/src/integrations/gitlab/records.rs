//! GitLab property bags to typed entity records

use forgeprops_domain::constants::{REPO_PROPERTY_IS_FORK, REPO_PROPERTY_IS_PRIVATE};
use forgeprops_domain::{
    EntityRecord, EntityType, FetchError, PropertyBag, PullRequestRecord, ReleaseRecord,
    RepositoryRecord, Result,
};

use super::properties::merge_request::{
    MR_PROPERTY_AUTHOR, MR_PROPERTY_NUMBER, MR_PROPERTY_SHA, MR_PROPERTY_URL,
};
use super::properties::release::{RELEASE_PROPERTY_NAME, RELEASE_PROPERTY_TAG};
use super::properties::repository::{
    REPO_PROPERTY_CLONE_URL, REPO_PROPERTY_DEFAULT_BRANCH, REPO_PROPERTY_HOOK_ID,
    REPO_PROPERTY_HOOK_URL, REPO_PROPERTY_LICENSE,
};
use super::properties::{PROJECT_PROPERTY_ID, PROJECT_PROPERTY_NAME, PROJECT_PROPERTY_NAMESPACE};

/// # Errors
/// Returns [`FetchError::InvalidProperty`] when a required key is missing or
/// mistyped, and [`FetchError::UnsupportedEntity`] for artifacts.
pub fn to_record(entity: EntityType, props: PropertyBag) -> Result<EntityRecord> {
    match entity {
        EntityType::Repository => Ok(EntityRecord::Repository(repository(props)?)),
        EntityType::PullRequest => Ok(EntityRecord::PullRequest(merge_request(props)?)),
        EntityType::Release => Ok(EntityRecord::Release(release(props)?)),
        EntityType::Artifact => Err(FetchError::UnsupportedEntity(entity)),
    }
}

fn repository(props: PropertyBag) -> Result<RepositoryRecord> {
    Ok(RepositoryRecord {
        owner: props.get_string(PROJECT_PROPERTY_NAMESPACE)?,
        name: props.get_string(PROJECT_PROPERTY_NAME)?,
        repo_id: props.get_i64(PROJECT_PROPERTY_ID)?,
        hook_id: props.i64_or_default(REPO_PROPERTY_HOOK_ID),
        hook_url: props.string_or_default(REPO_PROPERTY_HOOK_URL),
        hook_name: String::new(),
        hook_type: String::new(),
        hook_uuid: String::new(),
        deploy_url: String::new(),
        clone_url: props.string_or_default(REPO_PROPERTY_CLONE_URL),
        default_branch: props.string_or_default(REPO_PROPERTY_DEFAULT_BRANCH),
        license: props.string_or_default(REPO_PROPERTY_LICENSE),
        is_private: props.bool_or_default(REPO_PROPERTY_IS_PRIVATE),
        is_fork: props.bool_or_default(REPO_PROPERTY_IS_FORK),
        properties: props,
    })
}

fn merge_request(props: PropertyBag) -> Result<PullRequestRecord> {
    Ok(PullRequestRecord {
        url: props.string_or_default(MR_PROPERTY_URL),
        commit_sha: props.string_or_default(MR_PROPERTY_SHA),
        number: props.get_i64(MR_PROPERTY_NUMBER)?,
        repo_owner: props.get_string(PROJECT_PROPERTY_NAMESPACE)?,
        repo_name: props.get_string(PROJECT_PROPERTY_NAME)?,
        author_id: props.i64_or_default(MR_PROPERTY_AUTHOR),
        properties: props,
    })
}

// GitLab releases carry no branch.
fn release(props: PropertyBag) -> Result<ReleaseRecord> {
    Ok(ReleaseRecord {
        name: props.string_or_default(RELEASE_PROPERTY_NAME),
        tag: props.get_string(RELEASE_PROPERTY_TAG)?,
        branch: String::new(),
        repo_owner: props.get_string(PROJECT_PROPERTY_NAMESPACE)?,
        repo_name: props.get_string(PROJECT_PROPERTY_NAME)?,
        properties: props,
    })
}
