//! # Catalog Session Controller
//!
//! The state machine behind the console. It owns the only copy of the visible
//! product list, the active search and the editing target, and it is the only
//! caller of the [`CatalogGateway`].
//!
//! ## Consistency
//!
//! The visible list is never patched locally. Every successful mutation is
//! followed by a full reload, and the new state is committed only once that
//! reload returns, so the list always equals some complete response from the
//! service. A failed call commits nothing except clearing `loading`.
//!
//! ## Sequencing
//!
//! Transitions take `&mut self`, so at most one is ever in flight. Two loads can
//! therefore never complete out of order. [`SessionActor`](crate::runtime::SessionActor)
//! relies on this to serve commands from many callers one at a time.
//!
//! ## Observing state
//!
//! Every change is published on a `watch` channel (see [`subscribe`](CatalogSessionController::subscribe)),
//! including `loading = true` before a call goes out.

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::confirm::Confirm;
use super::error::SessionError;
use super::form::ProductForm;
use super::state::{ActiveSearch, EditTarget, SessionMode, SessionState};
use crate::gateway::{CatalogGateway, RemoteError};
use crate::model::{Product, ProductDraft, ProductId, SearchCriteria};

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The operator declined the confirmation prompt; nothing was sent.
    Declined,
}

pub struct CatalogSessionController<G: CatalogGateway> {
    gateway: G,
    confirm: Box<dyn Confirm>,
    state: SessionState,
    notify: watch::Sender<SessionState>,
}

impl<G: CatalogGateway> CatalogSessionController<G> {
    pub fn new(gateway: G, confirm: impl Confirm + 'static) -> Self {
        let state = SessionState::default();
        let (notify, _) = watch::channel(state.clone());
        Self {
            gateway,
            confirm: Box::new(confirm),
            state,
            notify,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> SessionMode {
        self.state.mode()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Receives a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.notify.subscribe()
    }

    fn publish(&self) {
        self.notify.send_replace(self.state.clone());
    }

    fn set_loading(&mut self, loading: bool) {
        self.state.loading = loading;
        self.publish();
    }

    fn require_mode(&self, operation: &'static str, expected: SessionMode) -> Result<(), SessionError> {
        if self.mode() == expected {
            Ok(())
        } else {
            Err(self.invalid(operation))
        }
    }

    // =========================================================================
    // Browsing
    // =========================================================================

    /// Replaces the visible list with the full catalog and clears any search.
    #[instrument(skip(self))]
    pub async fn load_all(&mut self) -> Result<(), SessionError> {
        self.set_loading(true);
        let outcome = self.gateway.list_all().await;
        self.state.loading = false;

        match outcome {
            Ok(products) => {
                self.show_all(products);
                info!(count = self.state.visible_products.len(), "Loaded catalog");
                Ok(())
            }
            Err(e) => {
                self.publish();
                warn!(error = %e, kind = ?e.kind(), "Load failed");
                Err(e.into())
            }
        }
    }

    /// Replaces the visible list with the search results and records the search.
    ///
    /// Empty criteria are still sent to the search endpoint; whether that
    /// matches everything is up to the service.
    #[instrument(skip(self))]
    pub async fn run_search(&mut self, criteria: SearchCriteria) -> Result<usize, SessionError> {
        self.set_loading(true);
        let outcome = self.gateway.search(&criteria).await;
        self.state.loading = false;

        match outcome {
            Ok(products) => {
                let count = products.len();
                self.state.visible_products = products;
                self.state.active_search = Some(ActiveSearch { criteria, count });
                self.publish();
                info!(count, "Search settled");
                Ok(count)
            }
            Err(e) => {
                self.publish();
                warn!(error = %e, kind = ?e.kind(), "Search failed");
                Err(e.into())
            }
        }
    }

    fn show_all(&mut self, products: Vec<Product>) {
        self.state.visible_products = products;
        self.state.active_search = None;
        self.publish();
    }

    /// Deletes a product after the operator confirms.
    ///
    /// Declining is a no-op. On success the catalog is reloaded. If the delete
    /// went through but the reload failed, the deleted product is still dropped
    /// from the visible list so nothing keeps pointing at it.
    #[instrument(skip(self))]
    pub async fn request_delete(&mut self, id: &ProductId) -> Result<DeleteOutcome, SessionError> {
        self.require_mode("delete", SessionMode::Browsing)?;

        if !self.confirm.confirm(&format!("Delete product {}?", id)) {
            debug!(%id, "Delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        self.set_loading(true);
        if let Err(e) = self.gateway.delete(id).await {
            self.set_loading(false);
            warn!(%id, error = %e, kind = ?e.kind(), "Delete failed");
            return Err(e.into());
        }

        let reload = self.gateway.list_all().await;
        self.state.loading = false;
        match reload {
            Ok(products) => {
                self.show_all(products);
                info!(%id, "Deleted");
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => {
                self.state.visible_products.retain(|p| &p.id != id);
                if let Some(search) = self.state.active_search.as_mut() {
                    search.count = self.state.visible_products.len();
                }
                self.publish();
                warn!(%id, error = %e, "Deleted but reload failed");
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Opens a blank form for a new product.
    pub fn begin_create(&mut self) -> Result<ProductForm, SessionError> {
        self.require_mode("begin create", SessionMode::Browsing)?;
        self.state.editing = Some(EditTarget::New);
        self.publish();
        debug!("Editing new product");
        Ok(ProductForm::new())
    }

    /// Opens a form prefilled from `product`.
    pub fn begin_edit(&mut self, product: Product) -> Result<ProductForm, SessionError> {
        self.require_mode("begin edit", SessionMode::Browsing)?;
        let form = ProductForm::from_product(&product);
        debug!(id = %product.id, "Editing product");
        self.state.editing = Some(EditTarget::Existing(product));
        self.publish();
        Ok(form)
    }

    /// Fetches the product fresh from the service and opens a form prefilled from it.
    ///
    /// A failed fetch leaves the session browsing.
    #[instrument(skip(self))]
    pub async fn begin_edit_by_id(&mut self, id: &ProductId) -> Result<ProductForm, SessionError> {
        self.require_mode("begin edit", SessionMode::Browsing)?;

        self.set_loading(true);
        let fetched = self.gateway.get(id).await;
        self.state.loading = false;

        match fetched {
            Ok(product) => self.begin_edit(product),
            Err(e) => {
                self.publish();
                warn!(%id, error = %e, kind = ?e.kind(), "Fetch for edit failed");
                Err(e.into())
            }
        }
    }

    /// Closes the form without sending anything.
    pub fn cancel_edit(&mut self) {
        if self.state.editing.take().is_some() {
            debug!("Edit cancelled");
            self.publish();
        }
    }

    /// Creates the product, reloads the catalog, and closes the form.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn submit_create(&mut self, draft: ProductDraft) -> Result<Product, SessionError> {
        if self.state.editing != Some(EditTarget::New) {
            return Err(self.invalid("submit create"));
        }

        self.set_loading(true);
        let outcome = async {
            let created = self.gateway.create(&draft).await?;
            let products = self.gateway.list_all().await?;
            Ok::<_, RemoteError>((created, products))
        }
        .await;
        self.settle_submit(outcome, "Created")
    }

    /// Updates the product being edited, reloads the catalog, and closes the form.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn submit_update(&mut self, draft: ProductDraft) -> Result<Product, SessionError> {
        let id = match &self.state.editing {
            Some(EditTarget::Existing(product)) => product.id.clone(),
            _ => return Err(self.invalid("submit update")),
        };

        self.set_loading(true);
        let outcome = async {
            let updated = self.gateway.update(&id, &draft).await?;
            let products = self.gateway.list_all().await?;
            Ok::<_, RemoteError>((updated, products))
        }
        .await;
        self.settle_submit(outcome, "Updated")
    }

    /// Validates the form and submits it as a create or an update, depending
    /// on what is being edited. Validation failures send nothing.
    pub async fn submit_form(&mut self, form: &mut ProductForm) -> Result<Product, SessionError> {
        let creating = match &self.state.editing {
            Some(EditTarget::New) => true,
            Some(EditTarget::Existing(_)) => false,
            None => return Err(self.invalid("submit")),
        };

        let draft = form.validate().inspect_err(|e| debug!(error = %e, "Form rejected"))?;
        if creating {
            self.submit_create(draft).await
        } else {
            self.submit_update(draft).await
        }
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        let mode = self.mode();
        warn!(operation, ?mode, "Rejected transition");
        SessionError::InvalidTransition { operation, mode }
    }

    fn settle_submit(
        &mut self,
        outcome: Result<(Product, Vec<Product>), RemoteError>,
        action: &'static str,
    ) -> Result<Product, SessionError> {
        self.state.loading = false;
        match outcome {
            Ok((product, products)) => {
                self.state.visible_products = products;
                self.state.active_search = None;
                self.state.editing = None;
                self.publish();
                info!(id = %product.id, action, "Submit settled");
                Ok(product)
            }
            Err(e) => {
                self.publish();
                warn!(error = %e, kind = ?e.kind(), action, "Submit failed");
                Err(e.into())
            }
        }
    }
}
