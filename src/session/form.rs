//! The editable product form and its submission checks.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::codec::{AttributeDraft, ParseError};
use crate::model::{Product, ProductDraft};

/// Form input that cannot be submitted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    EmptyName,

    #[error("Price must be a number, got {0:?}")]
    InvalidPrice(String),

    #[error("Price cannot be negative")]
    NegativePrice,

    #[error("Quantity must be a whole number of zero or more, got {0:?}")]
    InvalidQuantity(String),

    #[error("Invalid JSON in attributes field: {0}")]
    InvalidAttributes(#[from] ParseError),

    #[error("Attributes must be a JSON object")]
    AttributesNotObject,
}

/// Text buffers behind the create/edit form.
///
/// Every field is kept exactly as typed; nothing is parsed until
/// [`validate`](Self::validate) runs at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub quantity: String,
    pub attributes: AttributeDraft,
}

impl ProductForm {
    /// A blank form for a new product.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            price: String::new(),
            quantity: String::new(),
            attributes: AttributeDraft::new(),
        }
    }

    /// A form prefilled from an existing product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            quantity: product.quantity.to_string(),
            attributes: AttributeDraft::from_value(product.attributes.clone()),
        }
    }

    /// Checks every field and builds the request payload.
    ///
    /// Attribute text is committed into the draft buffer only when it parses,
    /// so a rejected submission keeps the last good attributes.
    pub fn validate(&mut self) -> Result<ProductDraft, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let price_text = self.price.trim();
        let price = Decimal::from_str(price_text)
            .or_else(|_| Decimal::from_scientific(price_text))
            .map_err(|_| ValidationError::InvalidPrice(self.price.clone()))?;
        if price.is_sign_negative() && !price.is_zero() {
            return Err(ValidationError::NegativePrice);
        }

        let quantity = self
            .quantity
            .trim()
            .parse::<u32>()
            .map_err(|_| ValidationError::InvalidQuantity(self.quantity.clone()))?;

        let attributes = self.attributes.commit()?.clone();
        if !attributes.is_object() {
            return Err(ValidationError::AttributesNotObject);
        }

        Ok(ProductDraft {
            name: name.to_string(),
            price,
            quantity,
            attributes,
        })
    }
}

impl Default for ProductForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filled(name: &str, price: &str, quantity: &str, attributes: &str) -> ProductForm {
        let mut form = ProductForm::new();
        form.name = name.to_string();
        form.price = price.to_string();
        form.quantity = quantity.to_string();
        form.attributes.set_text(attributes);
        form
    }

    #[test]
    fn test_valid_form_builds_draft() {
        let mut form = filled(" Cap ", "9.99", "5", r#"{"color": "red"}"#);

        let draft = form.validate().unwrap();
        assert_eq!(draft.name, "Cap");
        assert_eq!(draft.price, Decimal::new(999, 2));
        assert_eq!(draft.quantity, 5);
        assert_eq!(draft.attributes, json!({"color": "red"}));
    }

    #[test]
    fn test_blank_attributes_become_empty_object() {
        let mut form = filled("Cap", "0", "0", "");
        assert_eq!(form.validate().unwrap().attributes, json!({}));
    }

    #[test]
    fn test_rejections() {
        assert_eq!(filled("  ", "1", "1", "{}").validate(), Err(ValidationError::EmptyName));
        assert_eq!(
            filled("Cap", "abc", "1", "{}").validate(),
            Err(ValidationError::InvalidPrice("abc".to_string()))
        );
        assert_eq!(filled("Cap", "-0.01", "1", "{}").validate(), Err(ValidationError::NegativePrice));
        assert_eq!(
            filled("Cap", "1", "2.5", "{}").validate(),
            Err(ValidationError::InvalidQuantity("2.5".to_string()))
        );
        assert_eq!(
            filled("Cap", "1", "-1", "{}").validate(),
            Err(ValidationError::InvalidQuantity("-1".to_string()))
        );
        assert_eq!(filled("Cap", "1", "1", "[1]").validate(), Err(ValidationError::AttributesNotObject));
    }

    #[test]
    fn test_malformed_attributes_keep_last_good_value() {
        let product = Product::new(3u64, "Cap", Decimal::new(999, 2), 5)
            .with_attributes(json!({"color": "red"}));
        let mut form = ProductForm::from_product(&product);
        form.attributes.set_text(r#"{"a":1,"#);

        assert!(matches!(form.validate(), Err(ValidationError::InvalidAttributes(_))));
        assert_eq!(form.attributes.accepted(), &json!({"color": "red"}));
    }

    #[test]
    fn test_prefill_from_product() {
        let product = Product::new(3u64, "Cap", Decimal::new(999, 2), 5)
            .with_attributes(json!({"color": "red"}));

        let mut form = ProductForm::from_product(&product);
        assert_eq!(form.price, "9.99");
        assert_eq!(form.quantity, "5");
        assert_eq!(form.attributes.text(), "{\n  \"color\": \"red\"\n}");
        assert_eq!(form.validate().unwrap(), product.to_draft());
    }
}
