#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Catalog Console
//!
//! > **A client-side console for a remote product catalog.**
//!
//! This crate holds the state machine behind a catalog management UI: browse the
//! product list, search it by name, color, price range and arbitrary attribute
//! paths, then create, edit and delete products through the catalog's REST service.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### The Server Owns the Truth
//!
//! The console never patches its list locally. Every successful mutation is
//! followed by a fresh fetch, and the visible list is always exactly what the
//! service returned last. A failed call leaves the session as it was.
//!
//! ### One Writer
//!
//! The [`CatalogSessionController`](session::CatalogSessionController) takes
//! `&mut self` for every transition, and the runtime puts it behind a single
//! actor task. Two commands can never interleave, so a stale reload can never
//! overwrite a newer one.
//!
//! ## 🚀 Core Concepts
//!
//! ### Gateways: One Trait, Three Backends
//! Everything remote goes through [`CatalogGateway`](gateway::CatalogGateway).
//! -   **[`HttpCatalogGateway`](gateway::HttpCatalogGateway)**: the real service over `reqwest`.
//! -   **[`MockGateway`](gateway::mock::MockGateway)**: scripted responses with call recording, for unit tests.
//! -   **[`InMemoryGateway`](gateway::InMemoryGateway)**: a stateful fake with the service's search and validation rules.
//!
//! ### Attribute Payloads
//! Product attributes are free-form JSON edited as text. The
//! [`AttributeDraft`](codec::AttributeDraft) keeps the operator's text and the last
//! value that parsed, so a typo never loses the previous good payload.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Each layer has its own error type: [`ParseError`](codec::ParseError) for payload text,
//! [`ValidationError`](session::ValidationError) for forms,
//! [`RemoteError`](gateway::RemoteError) for the service, all folded into
//! [`SessionError`](session::SessionError) with `#[from]`.
//!
//! ### 2. Observability
//! We use `tracing` everywhere with structured fields. Gateways log each request at
//! `debug`, the controller logs settled transitions at `info` and failures at `warn`.
//! See [`runtime::tracing`] for the subscriber setup.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`], [`codec`], [`search`])
//! - **Role**: Products, drafts and search criteria, the attribute text codec, and the
//!   builder that turns raw search fields into criteria.
//! - **Key items**: [`Product`](model::Product), [`SearchCriteria`](model::SearchCriteria),
//!   [`SearchPredicateBuilder`](search::SearchPredicateBuilder).
//!
//! ### 2. The Wire ([`gateway`], [`config`])
//! - **Role**: The REST contract and where to find the service.
//! - **Key items**: [`CatalogGateway`](gateway::CatalogGateway), [`ConsoleConfig`](config::ConsoleConfig).
//!
//! ### 3. The State Machine ([`session`])
//! - **Role**: Browsing and editing modes, forms, confirmation, and every transition between them.
//! - **Key items**: [`CatalogSessionController`](session::CatalogSessionController),
//!   [`ProductForm`](session::ProductForm).
//!
//! ### 4. The Runtime ([`runtime`])
//! - **Role**: Runs the controller in its own task and hands out cloneable handles.
//! - **Key items**: [`CatalogConsole`](runtime::CatalogConsole), [`SessionHandle`](runtime::SessionHandle).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # List the catalog at the default address
//! RUST_LOG=info cargo run -- list
//!
//! # Search a different deployment
//! CATALOG_API_URL=http://catalog.internal:8000 cargo run -- search --color red --price-max 20
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod codec;
pub mod config;
pub mod gateway;
pub mod model;
pub mod runtime;
pub mod search;
pub mod session;
