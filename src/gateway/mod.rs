//! The only channel to the remote catalog service.
//!
//! [`CatalogGateway`] maps each catalog operation to exactly one round trip.
//! Implementations never retry, cache, or touch the data they return.
//!
//! - [`HttpCatalogGateway`] talks to the real REST service.
//! - [`mock::MockGateway`] replays scripted responses for tests.
//! - [`memory::InMemoryGateway`] is a stateful fake catalog with the service's search rules.

pub mod error;
pub mod http;
pub mod memory;
pub mod mock;

pub use error::*;
pub use http::HttpCatalogGateway;
pub use memory::InMemoryGateway;

use async_trait::async_trait;
use serde::Deserialize;

use crate::model::{Product, ProductDraft, ProductId, SearchCriteria};

/// Remote catalog operations.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// `GET /products/`
    async fn list_all(&self) -> Result<Vec<Product>, RemoteError>;

    /// `GET /products/{id}/`
    async fn get(&self, id: &ProductId) -> Result<Product, RemoteError>;

    /// `GET /products/search/` with the criteria as query parameters.
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Product>, RemoteError>;

    /// `POST /products/`
    async fn create(&self, draft: &ProductDraft) -> Result<Product, RemoteError>;

    /// `PATCH /products/{id}/`
    async fn update(&self, id: &ProductId, draft: &ProductDraft) -> Result<Product, RemoteError>;

    /// `DELETE /products/{id}/`
    async fn delete(&self, id: &ProductId) -> Result<(), RemoteError>;
}

/// List responses come either bare or wrapped in a `results` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProductListing {
    Bare(Vec<Product>),
    Envelope { results: Vec<Product> },
}

impl ProductListing {
    pub(crate) fn into_products(self) -> Vec<Product> {
        match self {
            ProductListing::Bare(products) => products,
            ProductListing::Envelope { results } => results,
        }
    }
}
