//! In-process stand-in for the catalog service.
//!
//! [`InMemoryGateway`] keeps products in a map, assigns sequential numeric ids,
//! and applies the same validation and search rules as the REST service:
//!
//! - `name`: case-insensitive substring match
//! - `price_min` / `price_max`: inclusive bounds
//! - `page` / `page_size`: ignored
//! - any other key: dot-notation path into `attributes`, compared for equality

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use super::{CatalogGateway, RemoteError};
use crate::model::{
    Product, ProductDraft, ProductId, SearchCriteria, NAME_FIELD, PRICE_MAX_FIELD, PRICE_MIN_FIELD,
};

const IGNORED_PARAMS: [&str; 2] = ["page", "page_size"];

#[derive(Default)]
struct Store {
    products: BTreeMap<u64, Product>,
    next_id: u64,
}

/// A fake catalog shared between clones.
#[derive(Clone, Default)]
pub struct InMemoryGateway {
    store: Arc<Mutex<Store>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog pre-populated with drafts, ids assigned in order.
    pub fn with_products(drafts: impl IntoIterator<Item = ProductDraft>) -> Result<Self, RemoteError> {
        let gateway = Self::new();
        for draft in drafts {
            gateway.insert(&draft)?;
        }
        Ok(gateway)
    }

    pub fn len(&self) -> usize {
        self.lock().products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Store> {
        // A panic while holding the lock cannot leave the map half-written.
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn insert(&self, draft: &ProductDraft) -> Result<Product, RemoteError> {
        validate(draft)?;
        let mut store = self.lock();
        store.next_id += 1;
        let id = store.next_id;
        let product = Product::new(id, draft.name.clone(), draft.price, draft.quantity)
            .with_attributes(draft.attributes.clone());
        store.products.insert(id, product.clone());
        debug!(%id, size = store.products.len(), "Created");
        Ok(product)
    }
}

fn validate(draft: &ProductDraft) -> Result<(), RemoteError> {
    let mut problems = Vec::new();
    if draft.name.trim().is_empty() {
        problems.push("name: This field may not be blank.");
    }
    if draft.price <= Decimal::ZERO {
        problems.push("price: Price must be greater than 0");
    }
    if !draft.attributes.is_object() {
        problems.push("attributes: Attributes must be a JSON object");
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(RemoteError::from_status(400, problems.join("; ")))
    }
}

fn not_found(id: &ProductId) -> RemoteError {
    RemoteError::from_status(404, format!("No Product matches id {}", id))
}

fn numeric_id(id: &ProductId) -> Result<u64, RemoteError> {
    match id {
        ProductId::Numeric(id) => Ok(*id),
        ProductId::Text(_) => Err(not_found(id)),
    }
}

fn parse_bound(key: &str, value: &str) -> Result<Decimal, RemoteError> {
    Decimal::from_str(value.trim())
        .map_err(|_| RemoteError::from_status(400, format!("{}: A valid number is required.", key)))
}

/// Follows a dot-notation path such as `dimensions.width` into the attributes.
fn lookup<'a>(attributes: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(attributes, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Query values arrive as text; compare them against the JSON value's text form.
fn value_matches(found: &Value, expected: &str) -> bool {
    match found {
        Value::String(s) => s == expected,
        Value::Number(n) => {
            n.to_string() == expected
                || match (n.as_f64(), expected.parse::<f64>()) {
                    (Some(a), Ok(b)) => a == b,
                    _ => false,
                }
        }
        Value::Bool(b) => b.to_string() == expected.to_ascii_lowercase(),
        Value::Null => expected == "null",
        _ => false,
    }
}

#[async_trait]
impl CatalogGateway for InMemoryGateway {
    async fn list_all(&self) -> Result<Vec<Product>, RemoteError> {
        Ok(self.lock().products.values().cloned().collect())
    }

    async fn get(&self, id: &ProductId) -> Result<Product, RemoteError> {
        let key = numeric_id(id)?;
        self.lock().products.get(&key).cloned().ok_or_else(|| not_found(id))
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Product>, RemoteError> {
        let name = criteria.get(NAME_FIELD).map(str::to_lowercase);
        let min = criteria
            .get(PRICE_MIN_FIELD)
            .filter(|v| !v.is_empty())
            .map(|v| parse_bound(PRICE_MIN_FIELD, v))
            .transpose()?;
        let max = criteria
            .get(PRICE_MAX_FIELD)
            .filter(|v| !v.is_empty())
            .map(|v| parse_bound(PRICE_MAX_FIELD, v))
            .transpose()?;
        let attribute_filters: Vec<(&str, &str)> = criteria
            .iter()
            .filter(|(key, _)| {
                ![NAME_FIELD, PRICE_MIN_FIELD, PRICE_MAX_FIELD].contains(key)
                    && !IGNORED_PARAMS.contains(key)
            })
            .collect();

        let store = self.lock();
        let matches = store
            .products
            .values()
            .filter(|p| name.as_ref().map_or(true, |n| p.name.to_lowercase().contains(n.as_str())))
            .filter(|p| min.map_or(true, |min| p.price >= min))
            .filter(|p| max.map_or(true, |max| p.price <= max))
            .filter(|p| {
                attribute_filters.iter().all(|(path, expected)| {
                    lookup(&p.attributes, path).is_some_and(|found| value_matches(found, expected))
                })
            })
            .cloned()
            .collect::<Vec<_>>();
        debug!(?criteria, count = matches.len(), "Search");
        Ok(matches)
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, RemoteError> {
        self.insert(draft)
    }

    async fn update(&self, id: &ProductId, draft: &ProductDraft) -> Result<Product, RemoteError> {
        let key = numeric_id(id)?;
        validate(draft)?;
        let mut store = self.lock();
        let product = store.products.get_mut(&key).ok_or_else(|| not_found(id))?;
        product.name = draft.name.clone();
        product.price = draft.price;
        product.quantity = draft.quantity;
        product.attributes = draft.attributes.clone();
        debug!(%id, "Updated");
        Ok(product.clone())
    }

    async fn delete(&self, id: &ProductId) -> Result<(), RemoteError> {
        let key = numeric_id(id)?;
        let mut store = self.lock();
        store.products.remove(&key).ok_or_else(|| not_found(id))?;
        debug!(%id, size = store.products.len(), "Deleted");
        Ok(())
    }
}
