//! REST implementation of [`CatalogGateway`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::{CatalogGateway, ProductListing, RemoteError};
use crate::config::ConsoleConfig;
use crate::model::{Product, ProductDraft, ProductId, SearchCriteria};

/// Catalog gateway over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpCatalogGateway {
    client: Client,
    base_url: String,
}

impl HttpCatalogGateway {
    pub fn new(config: &ConsoleConfig) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "Sending request");
        self.client.request(method, url)
    }

    async fn send(request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Request failed before a response");
            RemoteError::Network(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = RemoteError::from_status(status.as_u16(), body);
        warn!(status = status.as_u16(), kind = ?err.kind(), "Request rejected");
        Err(err)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(error = %e, "Response does not match the catalog contract");
            RemoteError::InvalidResponse(e.to_string())
        })
    }
}

/// Ids are opaque, so the segment is percent-encoded (`a/b` must not become two segments).
fn product_path(id: &ProductId) -> String {
    format!("/products/{}/", urlencoding::encode(&id.to_string()))
}

#[async_trait]
impl CatalogGateway for HttpCatalogGateway {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Product>, RemoteError> {
        let response = Self::send(self.request(Method::GET, "/products/")).await?;
        let listing: ProductListing = Self::read_json(response).await?;
        Ok(listing.into_products())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &ProductId) -> Result<Product, RemoteError> {
        let response = Self::send(self.request(Method::GET, &product_path(id))).await?;
        Self::read_json(response).await
    }

    #[instrument(skip(self))]
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Product>, RemoteError> {
        let request = self.request(Method::GET, "/products/search/").query(criteria);
        let response = Self::send(request).await?;
        let listing: ProductListing = Self::read_json(response).await?;
        Ok(listing.into_products())
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn create(&self, draft: &ProductDraft) -> Result<Product, RemoteError> {
        let request = self.request(Method::POST, "/products/").json(draft);
        let response = Self::send(request).await?;
        Self::read_json(response).await
    }

    #[instrument(skip(self, draft))]
    async fn update(&self, id: &ProductId, draft: &ProductDraft) -> Result<Product, RemoteError> {
        let request = self.request(Method::PATCH, &product_path(id)).json(draft);
        let response = Self::send(request).await?;
        Self::read_json(response).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &ProductId) -> Result<(), RemoteError> {
        Self::send(self.request(Method::DELETE, &product_path(id))).await?;
        Ok(())
    }
}
