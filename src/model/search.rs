use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Filter fields the search form always offers.
pub const NAME_FIELD: &str = "name";
pub const COLOR_FIELD: &str = "color";
pub const PRICE_MIN_FIELD: &str = "price_min";
pub const PRICE_MAX_FIELD: &str = "price_max";

/// Normalized filter field -> match value mapping sent as query parameters.
///
/// Values are kept as the operator typed them; numeric coercion of
/// `price_min`/`price_max` is left to the service. Keys other than the
/// first-class fields are attribute lookups, where `a.b.c` addresses a nested
/// attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchCriteria {
    fields: BTreeMap<String, String>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any earlier value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The single ad-hoc attribute filter, e.g. `dimensions.width = 10`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvancedFilter {
    pub key: String,
    pub value: String,
}

impl AdvancedFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
