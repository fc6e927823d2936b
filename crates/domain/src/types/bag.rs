//! PropertyBag: the complete set of an entity's known properties

use std::collections::HashMap;
use std::fmt;

use serde::de::{Deserializer, Error as _};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::property::{Property, PropertyValue, RawProperties};
use crate::errors::PropertyError;

/// Unordered map of unique keys to [`Property`].
///
/// `merge` and `filtered_copy` never mutate either input. Serializes as a flat
/// JSON object so persisted snapshots can be round-tripped by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    properties: HashMap<String, Property>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from a raw wrapper map.
    ///
    /// # Errors
    /// Returns [`PropertyError::UnsupportedValue`] for the first entry whose
    /// value has no typed form.
    pub fn from_raw(raw: RawProperties) -> Result<Self, PropertyError> {
        raw.into_iter()
            .map(|(key, value)| Property::from_raw(key, value))
            .collect::<Result<Self, _>>()
    }

    /// Builder-style insert, handy for lookup bags.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(Property::new(key, value));
        self
    }

    /// Insert or replace a property.
    pub fn insert(&mut self, property: Property) -> Option<Property> {
        self.properties.insert(property.key().to_string(), property)
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    fn require(&self, key: &str) -> Result<&Property, PropertyError> {
        self.get(key).ok_or_else(|| PropertyError::Missing { key: key.to_string() })
    }

    pub fn get_string(&self, key: &str) -> Result<String, PropertyError> {
        self.require(key)?.as_string()
    }

    pub fn get_i64(&self, key: &str) -> Result<i64, PropertyError> {
        self.require(key)?.as_i64()
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, PropertyError> {
        self.require(key)?.as_bool()
    }

    pub fn get_f64(&self, key: &str) -> Result<f64, PropertyError> {
        self.require(key)?.as_f64()
    }

    /// Lenient read: empty string when absent or not a string.
    pub fn string_or_default(&self, key: &str) -> String {
        self.get_string(key).unwrap_or_default()
    }

    pub fn i64_or_default(&self, key: &str) -> i64 {
        self.get_i64(key).unwrap_or_default()
    }

    pub fn bool_or_default(&self, key: &str) -> bool {
        self.get_bool(key).unwrap_or_default()
    }

    /// New bag with the entries for which `predicate` holds.
    #[must_use]
    pub fn filtered_copy<F>(&self, predicate: F) -> Self
    where
        F: Fn(&str, &Property) -> bool,
    {
        self.properties
            .iter()
            .filter(|(key, property)| predicate(key, property))
            .map(|(_, property)| property.clone())
            .collect()
    }

    /// New bag equal to `self` with every key of `other` overwritten by
    /// `other`'s value.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for property in other.iter() {
            merged.insert(property.clone());
        }
        merged
    }

    pub fn to_raw(&self) -> RawProperties {
        self.properties
            .iter()
            .map(|(key, property)| (key.clone(), property.value().to_json()))
            .collect()
    }
}

impl FromIterator<Property> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        let mut bag = Self::new();
        for property in iter {
            bag.insert(property);
        }
        bag
    }
}

/// Sorted `key=value` pairs, for log fields.
impl fmt::Display for PropertyBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.properties.keys().collect();
        keys.sort();
        f.write_str("{")?;
        for (idx, key) in keys.into_iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={}", self.properties[key].value())?;
        }
        f.write_str("}")
    }
}

impl Serialize for PropertyBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.properties.iter().map(|(key, property)| (key, property.value())))
    }
}

impl<'de> Deserialize<'de> for PropertyBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawProperties::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(D::Error::custom)
    }
}
