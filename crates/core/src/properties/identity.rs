//! Entity identity resolution from lookup properties
//!
//! Lookups carry either explicit identity keys (`github/repo_owner`,
//! `github/repo_name`) or a qualified `name` such as `owner/repo`. Explicit
//! keys win when every one of them is present and non-empty.

use forgeprops_domain::constants::{NAME_SEPARATOR, PROPERTY_NAME};
use forgeprops_domain::{IdentityError, PropertyBag, PropertyValue};

/// Non-empty identity segment stored under `key`.
///
/// Accepts string and integer values so numeric ids work as path segments.
///
/// # Errors
/// Returns [`IdentityError::MissingRequiredProperty`] when the key is absent
/// or empty, and [`IdentityError::InvalidIdentity`] for other value types.
pub fn required_string(props: &PropertyBag, key: &str) -> Result<String, IdentityError> {
    let value = match props.get(key).map(|p| p.value()) {
        None => return Err(IdentityError::MissingRequiredProperty(key.to_string())),
        Some(PropertyValue::String(s)) => s.clone(),
        Some(PropertyValue::Int64(n)) => n.to_string(),
        Some(other) => {
            return Err(IdentityError::InvalidIdentity(format!(
                "{key} must be a string, got {}",
                other.kind()
            )))
        }
    };

    if value.trim().is_empty() {
        return Err(IdentityError::MissingRequiredProperty(key.to_string()));
    }
    Ok(value)
}

/// Values of `keys` when all are present and non-empty.
pub fn explicit_identity(props: &PropertyBag, keys: &[&str]) -> Option<Vec<String>> {
    keys.iter().map(|key| required_string(props, key).ok()).collect()
}

/// Split a qualified name into exactly `segments` non-empty parts.
///
/// # Errors
/// Returns [`IdentityError::InvalidIdentity`] when the segment count is wrong
/// or a segment is empty.
pub fn split_qualified_name(value: &str, segments: usize) -> Result<Vec<String>, IdentityError> {
    let parts: Vec<&str> = value.split(NAME_SEPARATOR).collect();
    if parts.len() != segments || parts.iter().any(|part| part.trim().is_empty()) {
        return Err(IdentityError::InvalidIdentity(format!(
            "expected {segments} non-empty segments separated by '{NAME_SEPARATOR}', got {value:?}"
        )));
    }
    Ok(parts.into_iter().map(str::to_string).collect())
}

/// Resolve identity segments, preferring `explicit_keys` and falling back to
/// splitting the `name` property into as many segments.
///
/// # Errors
/// Returns [`IdentityError::InvalidIdentity`] when neither form is usable.
pub fn resolve_identity(
    props: &PropertyBag,
    explicit_keys: &[&str],
) -> Result<Vec<String>, IdentityError> {
    if let Some(segments) = explicit_identity(props, explicit_keys) {
        return Ok(segments);
    }

    match required_string(props, PROPERTY_NAME) {
        Ok(name) => split_qualified_name(&name, explicit_keys.len()),
        Err(_) => Err(IdentityError::InvalidIdentity(format!(
            "lookup has neither {} nor {PROPERTY_NAME}",
            explicit_keys.join(" and ")
        ))),
    }
}

/// Qualified name built from identity keys, for pure `get_name` resolvers.
///
/// # Errors
/// Returns [`IdentityError::MissingRequiredProperty`] naming the first key
/// that is absent or empty.
pub fn name_from_keys(props: &PropertyBag, keys: &[&str]) -> Result<String, IdentityError> {
    let segments =
        keys.iter().map(|key| required_string(props, key)).collect::<Result<Vec<_>, _>>()?;
    Ok(qualified_name(&segments))
}

/// Join identity segments back into a qualified name.
pub fn qualified_name<S: AsRef<str>>(segments: &[S]) -> String {
    let separator = NAME_SEPARATOR.to_string();
    segments.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(separator.as_str())
}
