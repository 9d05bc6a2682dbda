//! Turns raw search-form input into [`SearchCriteria`].

use tracing::debug;

use crate::model::{AdvancedFilter, SearchCriteria};

/// Builds the query sent to the search endpoint.
///
/// Pure transform: blank fields are dropped rather than sent as "match empty",
/// and dot-notation keys are passed through untouched for the service to resolve.
pub struct SearchPredicateBuilder;

impl SearchPredicateBuilder {
    /// Assembles criteria from form fields and an optional ad-hoc attribute filter.
    ///
    /// The advanced filter is applied last, so it replaces a form field with the
    /// same key. It is ignored unless both its key and value are filled in.
    pub fn build<I, K, V>(raw_fields: I, advanced: Option<&AdvancedFilter>) -> SearchCriteria
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut criteria = SearchCriteria::new();
        for (key, value) in raw_fields {
            let value = value.into();
            if is_blank(&value) {
                continue;
            }
            criteria.insert(key, value);
        }

        if let Some(filter) = advanced {
            if !is_blank(&filter.key) && !is_blank(&filter.value) {
                criteria.insert(filter.key.trim(), filter.value.clone());
            }
        }

        debug!(?criteria, "Built search criteria");
        criteria
    }

    /// Criteria for a cleared search form.
    pub fn reset() -> SearchCriteria {
        SearchCriteria::new()
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
