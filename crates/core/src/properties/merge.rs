//! Operational-property filtering and merge

use forgeprops_domain::PropertyBag;

/// Subset of `cached` restricted to the operational keys.
///
/// An empty operational set yields an empty bag.
pub fn operational_subset(cached: &PropertyBag, operational: &[String]) -> PropertyBag {
    cached.filtered_copy(|key, _| operational.iter().any(|k| k == key))
}

/// Combine freshly fetched properties with the cached operational ones.
///
/// Operational keys present in the cache override the upstream values; every
/// other key comes from `upstream` untouched.
pub fn merge_operational(
    upstream: &PropertyBag,
    cached: Option<&PropertyBag>,
    operational: &[String],
) -> PropertyBag {
    match cached {
        Some(cached) => upstream.merge(&operational_subset(cached, operational)),
        None => upstream.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops() -> Vec<String> {
        vec!["hook_id".to_string(), "hook_url".to_string()]
    }

    #[test]
    fn subset_keeps_only_operational_keys() {
        let cached = PropertyBag::new()
            .with("hook_id", 42_i64)
            .with("hook_url", "https://hooks/1")
            .with("repo_id", 7_i64);

        let subset = operational_subset(&cached, &ops());
        assert_eq!(subset.len(), 2);
        assert!(!subset.contains_key("repo_id"));
    }

    #[test]
    fn subset_of_empty_operational_set_is_empty() {
        let cached = PropertyBag::new().with("hook_id", 42_i64);
        assert!(operational_subset(&cached, &[]).is_empty());
    }

    #[test]
    fn cached_operational_values_override_upstream() {
        let upstream = PropertyBag::new()
            .with("repo_id", 99_i64)
            .with("hook_id", 0_i64)
            .with("hook_url", "");
        let cached = PropertyBag::new()
            .with("repo_id", 1_i64)
            .with("hook_id", 42_i64)
            .with("hook_url", "https://hooks/42");

        let merged = merge_operational(&upstream, Some(&cached), &ops());

        assert_eq!(merged.get_i64("repo_id").unwrap(), 99);
        assert_eq!(merged.get_i64("hook_id").unwrap(), 42);
        assert_eq!(merged.get_string("hook_url").unwrap(), "https://hooks/42");
    }

    #[test]
    fn merge_differs_from_upstream_only_at_operational_keys() {
        let upstream = PropertyBag::new()
            .with("name", "octo/repo")
            .with("is_private", false)
            .with("hook_id", 0_i64);
        let cached = PropertyBag::new()
            .with("name", "stale/name")
            .with("is_private", true)
            .with("hook_id", 5_i64)
            .with("hook_url", "https://hooks/5");

        let merged = merge_operational(&upstream, Some(&cached), &ops());

        for property in merged.iter() {
            let key = property.key();
            if !ops().iter().any(|k| k == key) {
                assert_eq!(upstream.get(key), Some(property), "non-operational key {key} changed");
            }
        }
        for key in upstream.keys() {
            assert!(merged.contains_key(key));
        }
        assert!(merged.contains_key("hook_url"));
    }

    #[test]
    fn missing_cache_returns_upstream() {
        let upstream = PropertyBag::new().with("hook_id", 3_i64);
        assert_eq!(merge_operational(&upstream, None, &ops()), upstream);
        assert_eq!(merge_operational(&upstream, Some(&PropertyBag::new()), &ops()), upstream);
    }
}
