use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier assigned by the catalog service.
///
/// The service owns the identifier space, so the client keeps whatever form it
/// was given (a JSON integer or a string) and only ever renders it back into
/// request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Numeric(id) => write!(f, "{}", id),
            ProductId::Text(id) => f.write_str(id),
        }
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId::Numeric(id)
    }
}

/// Typed ids become `Numeric` only when they print back identically, so
/// `"007"` or `"+7"` stay as the text the operator entered.
impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        match id.parse::<u64>() {
            Ok(numeric) if numeric.to_string() == id => ProductId::Numeric(numeric),
            _ => ProductId::Text(id.to_string()),
        }
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        ProductId::from(id.as_str())
    }
}

/// A catalog record: fixed scalar fields plus a free-form attribute map.
///
/// `attributes` is normally a JSON object, but records read from the service
/// are passed through untouched even when it is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default = "empty_attributes")]
    pub attributes: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Creates a product as the service would return it.
    ///
    /// # Arguments
    /// * `id` - Identifier assigned by the service
    /// * `name` - Product name
    /// * `price` - Unit price
    /// * `quantity` - Units in stock
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
            attributes: empty_attributes(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_attributes(mut self, attributes: Value) -> Self {
        self.attributes = attributes;
        self
    }

    /// The draft that would recreate this record's editable fields.
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            price: self.price,
            quantity: self.quantity,
            attributes: self.attributes.clone(),
        }
    }
}

/// Payload for create and update requests; a [`Product`] without its `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default = "empty_attributes")]
    pub attributes: Value,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
            attributes: empty_attributes(),
        }
    }

    pub fn with_attributes(mut self, attributes: Value) -> Self {
        self.attributes = attributes;
        self
    }
}

pub(crate) fn empty_attributes() -> Value {
    Value::Object(Map::new())
}
