//! GitHub property bags to typed entity records

use forgeprops_domain::constants::{REPO_PROPERTY_IS_FORK, REPO_PROPERTY_IS_PRIVATE};
use forgeprops_domain::{
    ArtifactRecord, EntityRecord, EntityType, PropertyBag, PullRequestRecord, ReleaseRecord,
    RepositoryRecord, Result,
};

use super::properties::artifact::{
    ARTIFACT_PROPERTY_ID, ARTIFACT_PROPERTY_NAME, ARTIFACT_PROPERTY_OWNER, ARTIFACT_PROPERTY_REPO,
    ARTIFACT_PROPERTY_TYPE, ARTIFACT_PROPERTY_VISIBILITY,
};
use super::properties::pull_request::{
    PULL_PROPERTY_AUTHOR_ID, PULL_PROPERTY_NUMBER, PULL_PROPERTY_SHA, PULL_PROPERTY_URL,
};
use super::properties::release::{
    RELEASE_PROPERTY_BRANCH, RELEASE_PROPERTY_TAG, RELEASE_PROPERTY_TITLE,
};
use super::properties::repository::{
    REPO_PROPERTY_CLONE_URL, REPO_PROPERTY_DEFAULT_BRANCH, REPO_PROPERTY_DEPLOY_URL,
    REPO_PROPERTY_HOOK_ID, REPO_PROPERTY_HOOK_NAME, REPO_PROPERTY_HOOK_TYPE,
    REPO_PROPERTY_HOOK_UIID, REPO_PROPERTY_HOOK_URL, REPO_PROPERTY_ID, REPO_PROPERTY_LICENSE,
    REPO_PROPERTY_NAME, REPO_PROPERTY_OWNER,
};

/// # Errors
/// Returns `FetchError::InvalidProperty` when a required key is missing or
/// mistyped.
pub fn to_record(entity: EntityType, props: PropertyBag) -> Result<EntityRecord> {
    let record = match entity {
        EntityType::Repository => EntityRecord::Repository(repository(props)?),
        EntityType::PullRequest => EntityRecord::PullRequest(pull_request(props)?),
        EntityType::Artifact => EntityRecord::Artifact(artifact(props)?),
        EntityType::Release => EntityRecord::Release(release(props)?),
    };
    Ok(record)
}

fn repository(props: PropertyBag) -> Result<RepositoryRecord> {
    Ok(RepositoryRecord {
        owner: props.get_string(REPO_PROPERTY_OWNER)?,
        name: props.get_string(REPO_PROPERTY_NAME)?,
        repo_id: props.get_i64(REPO_PROPERTY_ID)?,
        hook_id: props.i64_or_default(REPO_PROPERTY_HOOK_ID),
        hook_url: props.string_or_default(REPO_PROPERTY_HOOK_URL),
        hook_name: props.string_or_default(REPO_PROPERTY_HOOK_NAME),
        hook_type: props.string_or_default(REPO_PROPERTY_HOOK_TYPE),
        hook_uuid: props.string_or_default(REPO_PROPERTY_HOOK_UIID),
        deploy_url: props.string_or_default(REPO_PROPERTY_DEPLOY_URL),
        clone_url: props.string_or_default(REPO_PROPERTY_CLONE_URL),
        default_branch: props.string_or_default(REPO_PROPERTY_DEFAULT_BRANCH),
        license: props.string_or_default(REPO_PROPERTY_LICENSE),
        is_private: props.bool_or_default(REPO_PROPERTY_IS_PRIVATE),
        is_fork: props.bool_or_default(REPO_PROPERTY_IS_FORK),
        properties: props,
    })
}

fn pull_request(props: PropertyBag) -> Result<PullRequestRecord> {
    Ok(PullRequestRecord {
        url: props.string_or_default(PULL_PROPERTY_URL),
        commit_sha: props.string_or_default(PULL_PROPERTY_SHA),
        number: props.get_i64(PULL_PROPERTY_NUMBER)?,
        repo_owner: props.get_string(REPO_PROPERTY_OWNER)?,
        repo_name: props.get_string(REPO_PROPERTY_NAME)?,
        author_id: props.i64_or_default(PULL_PROPERTY_AUTHOR_ID),
        properties: props,
    })
}

fn artifact(props: PropertyBag) -> Result<ArtifactRecord> {
    Ok(ArtifactRecord {
        artifact_id: props.get_i64(ARTIFACT_PROPERTY_ID)?,
        owner: props.get_string(ARTIFACT_PROPERTY_OWNER)?,
        name: props.get_string(ARTIFACT_PROPERTY_NAME)?,
        artifact_type: props.string_or_default(ARTIFACT_PROPERTY_TYPE),
        visibility: props.string_or_default(ARTIFACT_PROPERTY_VISIBILITY),
        repository: props.string_or_default(ARTIFACT_PROPERTY_REPO),
        properties: props,
    })
}

fn release(props: PropertyBag) -> Result<ReleaseRecord> {
    Ok(ReleaseRecord {
        name: props.string_or_default(RELEASE_PROPERTY_TITLE),
        tag: props.get_string(RELEASE_PROPERTY_TAG)?,
        branch: props.string_or_default(RELEASE_PROPERTY_BRANCH),
        repo_owner: props.get_string(REPO_PROPERTY_OWNER)?,
        repo_name: props.get_string(REPO_PROPERTY_NAME)?,
        properties: props,
    })
}
