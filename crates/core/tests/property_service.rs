mod support;

use std::sync::Arc;
use std::time::Duration;

use forgeprops_core::{FetchContext, FetcherRegistry, PropertyFetcherFactory, PropertyService};
use forgeprops_domain::{EntityType, FetchError, IdentityError, PropertyBag, WrapperError};
use serde_json::json;
use support::{repository_fetcher, service_with, FailingWrapper, PendingWrapper, StaticWrapper};

fn upstream_repo() -> Arc<StaticWrapper> {
    StaticWrapper::new([
        ("name", json!("octo/repo")),
        ("repo_id", json!(99)),
        ("is_private", json!(false)),
    ])
}

fn upstream_hooks() -> Arc<StaticWrapper> {
    StaticWrapper::new([("hook_id", json!(0)), ("hook_url", json!(""))])
}

#[tokio::test]
async fn fetch_all_keeps_cached_operational_keys() {
    let service = service_with(repository_fetcher(upstream_repo(), upstream_hooks()));
    let lookup = PropertyBag::new().with("name", "octo/repo");
    let cached = PropertyBag::new()
        .with("hook_id", 42_i64)
        .with("hook_url", "https://x")
        .with("repo_id", 1_i64);

    let merged = service
        .fetch_all_properties(&FetchContext::new(), &lookup, EntityType::Repository, Some(&cached))
        .await
        .expect("fetch succeeds");

    let expected = PropertyBag::new()
        .with("repo_id", 99_i64)
        .with("name", "octo/repo")
        .with("is_private", false)
        .with("hook_id", 42_i64)
        .with("hook_url", "https://x");
    assert_eq!(merged, expected);
}

#[tokio::test]
async fn fetch_all_without_cache_returns_upstream() {
    let repo = upstream_repo();
    let hooks = upstream_hooks();
    let service = service_with(repository_fetcher(repo.clone(), hooks.clone()));

    let props = tokio_test::assert_ok!(
        service
            .fetch_all_properties(&FetchContext::new(), &PropertyBag::new(), EntityType::Repository, None)
            .await
    );

    assert_eq!(props.len(), 5);
    assert_eq!(props.get_i64("hook_id").unwrap(), 0);
    assert_eq!(repo.calls(), 1);
    assert_eq!(hooks.calls(), 1);
}

#[tokio::test]
async fn fetch_all_is_all_or_nothing() {
    let hooks = FailingWrapper::new(WrapperError::Upstream("503 Service Unavailable".into()));
    let service = service_with(repository_fetcher(upstream_repo(), hooks));

    let err = service
        .fetch_all_properties(&FetchContext::new(), &PropertyBag::new(), EntityType::Repository, None)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        FetchError::WrapperFailed {
            entity: EntityType::Repository,
            key: None,
            source: WrapperError::Upstream("503 Service Unavailable".into()),
        }
    );
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn not_found_is_distinguishable() {
    let repo = FailingWrapper::new(WrapperError::NotFound("octo/gone".into()));
    let service = service_with(repository_fetcher(repo, upstream_hooks()));

    let err = service
        .fetch_property(&FetchContext::new(), &PropertyBag::new(), EntityType::Repository, "repo_id")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(
        err.to_string(),
        "error fetching property repo_id for entity repository: entity not found upstream: octo/gone"
    );
}

#[tokio::test]
async fn fetch_property_invokes_only_the_owning_wrapper() {
    let repo = upstream_repo();
    let hooks = upstream_hooks();
    let service = service_with(repository_fetcher(repo.clone(), hooks.clone()));

    let property = service
        .fetch_property(&FetchContext::new(), &PropertyBag::new(), EntityType::Repository, "repo_id")
        .await
        .unwrap();

    assert_eq!(property.key(), "repo_id");
    assert_eq!(property.as_i64().unwrap(), 99);
    assert_eq!(repo.calls(), 1);
    assert_eq!(hooks.calls(), 0);
}

#[tokio::test]
async fn undeclared_key_is_unsupported_and_calls_nothing() {
    let repo = upstream_repo();
    let hooks = upstream_hooks();
    let service = service_with(repository_fetcher(repo.clone(), hooks.clone()));

    let err = service
        .fetch_property(&FetchContext::new(), &PropertyBag::new(), EntityType::Repository, "github/unknown")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        FetchError::UnsupportedProperty { entity: EntityType::Repository, key: "github/unknown".into() }
    );
    assert_eq!(repo.calls() + hooks.calls(), 0);
}

#[tokio::test]
async fn omitted_key_is_property_not_produced() {
    let hooks = StaticWrapper::new([("hook_url", json!("https://x"))]);
    let service = service_with(repository_fetcher(upstream_repo(), hooks));

    let err = service
        .fetch_property(&FetchContext::new(), &PropertyBag::new(), EntityType::Repository, "hook_id")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        FetchError::PropertyNotProduced { entity: EntityType::Repository, key: "hook_id".into() }
    );
}

#[tokio::test]
async fn unsupported_entity_and_uninitialized_service() {
    let service = service_with(repository_fetcher(upstream_repo(), upstream_hooks()));
    let err = service
        .fetch_all_properties(&FetchContext::new(), &PropertyBag::new(), EntityType::Artifact, None)
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::UnsupportedEntity(EntityType::Artifact));
    assert!(service.entity_property_fetcher(EntityType::Artifact).is_none());

    let bare = PropertyService::<()>::uninitialized(Arc::new(()), false);
    let err = bare
        .fetch_property(&FetchContext::new(), &PropertyBag::new(), EntityType::Repository, "name")
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::NotInitialized);
    assert!(bare.entity_property_fetcher(EntityType::Repository).is_none());
}

#[tokio::test]
async fn cancellation_surfaces_as_wrapper_failure() {
    let service = service_with(repository_fetcher(upstream_repo(), Arc::new(PendingWrapper)));
    let ctx = FetchContext::new();
    let token = ctx.cancellation().clone();
    let lookup = PropertyBag::new();

    let fetch = service.fetch_all_properties(&ctx, &lookup, EntityType::Repository, None);
    let cancel = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();
    };
    let (result, ()) = tokio::join!(fetch, cancel);

    let err = result.unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(err.wrapper_error(), Some(&WrapperError::Cancelled));
}

#[tokio::test]
async fn later_origin_wins_on_key_collision() {
    let repo = StaticWrapper::new([
        ("name", json!("octo/repo")),
        ("repo_id", json!(99)),
        ("is_private", json!(false)),
        ("extra", json!("first")),
    ]);
    let hooks =
        StaticWrapper::new([("hook_id", json!(7)), ("hook_url", json!("")), ("extra", json!("second"))]);
    let service = service_with(repository_fetcher(repo, hooks));

    let props = service
        .fetch_all_properties(&FetchContext::new(), &PropertyBag::new(), EntityType::Repository, None)
        .await
        .expect("fetch succeeds");

    assert_eq!(props.get_string("extra").unwrap(), "second");
    assert_eq!(props.get_i64("hook_id").unwrap(), 7);
}

#[tokio::test]
async fn first_failure_drops_pending_origins() {
    let repo = FailingWrapper::new(WrapperError::Upstream("boom".into()));
    let service = service_with(repository_fetcher(repo.clone(), Arc::new(PendingWrapper)));
    let cached = PropertyBag::new().with("hook_id", 42_i64);

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        service.fetch_all_properties(
            &FetchContext::new(),
            &PropertyBag::new(),
            EntityType::Repository,
            Some(&cached),
        ),
    )
    .await
    .expect("failure does not wait for the pending origin");

    let err = result.unwrap_err();
    assert_eq!(err.wrapper_error(), Some(&WrapperError::Upstream("boom".into())));
    assert!(matches!(err, FetchError::WrapperFailed { entity: EntityType::Repository, key: None, .. }));
    assert_eq!(repo.calls(), 1);
}

#[tokio::test]
async fn deadline_surfaces_as_wrapper_failure() {
    let service = service_with(repository_fetcher(upstream_repo(), Arc::new(PendingWrapper)));
    let ctx = FetchContext::new().with_timeout(Duration::from_millis(20));

    let err = service
        .fetch_property(&ctx, &PropertyBag::new(), EntityType::Repository, "hook_id")
        .await
        .unwrap_err();

    assert_eq!(err.wrapper_error(), Some(&WrapperError::DeadlineExceeded));
}

#[tokio::test]
async fn identity_failures_are_reported_as_identity_errors() {
    let repo = FailingWrapper::new(WrapperError::Identity(IdentityError::InvalidIdentity(
        "bad".into(),
    )));
    let service = service_with(repository_fetcher(repo, upstream_hooks()));

    let err = service
        .fetch_property(&FetchContext::new(), &PropertyBag::new(), EntityType::Repository, "name")
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::Identity(IdentityError::InvalidIdentity("bad".into())));
}

#[test]
fn entity_name_needs_no_network() {
    let service = service_with(repository_fetcher(upstream_repo(), upstream_hooks()));

    let props = PropertyBag::new().with("repo_owner", "octo").with("repo_name", "hello");
    assert_eq!(service.get_entity_name(EntityType::Repository, &props).unwrap(), "octo/hello");

    let err = service.get_entity_name(EntityType::Repository, &PropertyBag::new()).unwrap_err();
    assert_eq!(err, FetchError::Identity(IdentityError::MissingRequiredProperty("name".into())));
}

#[test]
fn registry_resolves_only_registered_entities() {
    let registry = FetcherRegistry::new()
        .register(repository_fetcher(upstream_repo(), upstream_hooks()))
        .unwrap();
    assert!(registry.entity_property_fetcher(EntityType::Repository).is_some());
    assert!(registry.entity_property_fetcher(EntityType::Release).is_none());
}
