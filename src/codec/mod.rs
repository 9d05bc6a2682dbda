//! Conversion of the free-form attribute map between editable text and structured JSON.
//!
//! The operator edits attributes as text. [`AttributePayloadCodec`] turns that text
//! into a [`serde_json::Value`] (and back), and [`AttributeDraft`] is the edit buffer
//! that keeps the last accepted value intact while the text is being changed.
//!
//! Key order is insertion order: `serde_json` is built with `preserve_order`, so
//! parsing and re-serializing a document never reshuffles its keys.

use serde_json::Value;
use thiserror::Error;

use crate::model::empty_attributes;

/// The attribute text is not well-formed JSON.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid attribute JSON at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        ParseError {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        }
    }
}

/// Stateless text <-> JSON conversions for product attributes.
pub struct AttributePayloadCodec;

impl AttributePayloadCodec {
    /// Renders attributes as pretty-printed JSON with two-space indentation.
    pub fn serialize(attributes: &Value) -> String {
        // Serializing a `Value` into a String cannot fail.
        serde_json::to_string_pretty(attributes).unwrap_or_else(|_| attributes.to_string())
    }

    /// Parses attribute text. Blank text is an empty map.
    ///
    /// Any top-level JSON value is accepted; callers decide whether a non-object
    /// is acceptable for their use.
    pub fn parse(text: &str) -> Result<Value, ParseError> {
        if text.trim().is_empty() {
            return Ok(empty_attributes());
        }
        Ok(serde_json::from_str(text)?)
    }

    /// Normalizes attribute text through parse then serialize.
    pub fn format(text: &str) -> Result<String, ParseError> {
        Self::parse(text).map(|value| Self::serialize(&value))
    }
}

/// Edit buffer for attribute text.
///
/// The text is authoritative while editing and may be invalid at any point.
/// The structured value only moves forward on a successful [`commit`](Self::commit),
/// so a failed parse never loses the last good value.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDraft {
    text: String,
    accepted: Value,
}

impl AttributeDraft {
    /// Starts an empty buffer (`{}`).
    pub fn new() -> Self {
        Self::from_value(empty_attributes())
    }

    /// Starts a buffer prefilled from existing attributes.
    pub fn from_value(value: Value) -> Self {
        Self {
            text: AttributePayloadCodec::serialize(&value),
            accepted: value,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// The last successfully committed value.
    pub fn accepted(&self) -> &Value {
        &self.accepted
    }

    /// Parses the current text and, on success, makes it the accepted value.
    pub fn commit(&mut self) -> Result<&Value, ParseError> {
        let value = AttributePayloadCodec::parse(&self.text)?;
        self.accepted = value;
        Ok(&self.accepted)
    }

    /// Rewrites the text in normalized form. The text is left as-is on failure.
    pub fn format(&mut self) -> Result<(), ParseError> {
        let formatted = AttributePayloadCodec::format(&self.text)?;
        self.text = formatted;
        Ok(())
    }
}

impl Default for AttributeDraft {
    fn default() -> Self {
        Self::new()
    }
}
