//! # Session Actor
//!
//! Runs a [`CatalogSessionController`] in its own Tokio task and feeds it
//! commands from an `mpsc` channel.
//!
//! ## Concurrency Model
//!
//! Any number of [`SessionHandle`] clones can send commands, but the actor
//! handles them one at a time in arrival order. That is what keeps the
//! controller single-writer: a second submit queues behind the first instead
//! of racing it, and a reload can never be overtaken by an older one.
//!
//! Each command carries a `oneshot` sender for its reply, the same
//! request/response shape for every operation.

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, instrument};

use crate::gateway::CatalogGateway;
use crate::model::{Product, ProductDraft, ProductId, SearchCriteria};
use crate::session::{CatalogSessionController, DeleteOutcome, ProductForm, SessionError, SessionState};

/// Type alias for the one-shot reply channel.
pub type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

/// Messages accepted by the session actor; one per controller transition.
#[derive(Debug)]
pub enum SessionCommand {
    LoadAll {
        respond_to: Reply<()>,
    },
    RunSearch {
        criteria: SearchCriteria,
        respond_to: Reply<usize>,
    },
    BeginCreate {
        respond_to: Reply<ProductForm>,
    },
    BeginEdit {
        product: Product,
        respond_to: Reply<ProductForm>,
    },
    BeginEditById {
        id: ProductId,
        respond_to: Reply<ProductForm>,
    },
    CancelEdit {
        respond_to: Reply<()>,
    },
    SubmitCreate {
        draft: ProductDraft,
        respond_to: Reply<Product>,
    },
    SubmitUpdate {
        draft: ProductDraft,
        respond_to: Reply<Product>,
    },
    /// The form is sent back with the reply so the caller keeps its edit buffer.
    SubmitForm {
        form: ProductForm,
        respond_to: oneshot::Sender<(ProductForm, Result<Product, SessionError>)>,
    },
    RequestDelete {
        id: ProductId,
        respond_to: Reply<DeleteOutcome>,
    },
    Snapshot {
        respond_to: Reply<SessionState>,
    },
}

/// The server half: owns the controller and the receiving end of the channel.
pub struct SessionActor<G: CatalogGateway> {
    receiver: mpsc::Receiver<SessionCommand>,
    controller: CatalogSessionController<G>,
}

impl<G: CatalogGateway> SessionActor<G> {
    pub fn new(buffer_size: usize, controller: CatalogSessionController<G>) -> (Self, SessionHandle) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let handle = SessionHandle::new(sender, controller.subscribe());
        (Self { receiver, controller }, handle)
    }

    /// Processes commands until every handle is dropped.
    pub async fn run(mut self) {
        info!("Session started");

        while let Some(command) = self.receiver.recv().await {
            match command {
                SessionCommand::LoadAll { respond_to } => {
                    debug!("LoadAll");
                    let _ = respond_to.send(self.controller.load_all().await);
                }
                SessionCommand::RunSearch { criteria, respond_to } => {
                    debug!(?criteria, "RunSearch");
                    let _ = respond_to.send(self.controller.run_search(criteria).await);
                }
                SessionCommand::BeginCreate { respond_to } => {
                    debug!("BeginCreate");
                    let _ = respond_to.send(self.controller.begin_create());
                }
                SessionCommand::BeginEdit { product, respond_to } => {
                    debug!(id = %product.id, "BeginEdit");
                    let _ = respond_to.send(self.controller.begin_edit(product));
                }
                SessionCommand::BeginEditById { id, respond_to } => {
                    debug!(%id, "BeginEditById");
                    let _ = respond_to.send(self.controller.begin_edit_by_id(&id).await);
                }
                SessionCommand::CancelEdit { respond_to } => {
                    debug!("CancelEdit");
                    self.controller.cancel_edit();
                    let _ = respond_to.send(Ok(()));
                }
                SessionCommand::SubmitCreate { draft, respond_to } => {
                    debug!(?draft, "SubmitCreate");
                    let _ = respond_to.send(self.controller.submit_create(draft).await);
                }
                SessionCommand::SubmitUpdate { draft, respond_to } => {
                    debug!(?draft, "SubmitUpdate");
                    let _ = respond_to.send(self.controller.submit_update(draft).await);
                }
                SessionCommand::SubmitForm { mut form, respond_to } => {
                    debug!("SubmitForm");
                    let result = self.controller.submit_form(&mut form).await;
                    let _ = respond_to.send((form, result));
                }
                SessionCommand::RequestDelete { id, respond_to } => {
                    debug!(%id, "RequestDelete");
                    let _ = respond_to.send(self.controller.request_delete(&id).await);
                }
                SessionCommand::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.controller.state().clone()));
                }
            }
        }

        info!(
            visible = self.controller.state().visible_products.len(),
            "Session shutdown"
        );
    }
}

/// The client half: a cloneable handle for sending commands to the session.
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionCommand>,
    updates: watch::Receiver<SessionState>,
}

impl SessionHandle {
    pub fn new(sender: mpsc::Sender<SessionCommand>, updates: watch::Receiver<SessionState>) -> Self {
        Self { sender, updates }
    }

    async fn call<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(command(respond_to))
            .await
            .map_err(|_| SessionError::ActorClosed)?;
        response.await.map_err(|_| SessionError::ActorDropped)?
    }

    /// A receiver that sees every published state change.
    pub fn updates(&self) -> watch::Receiver<SessionState> {
        self.updates.clone()
    }

    /// The state after all previously sent commands have settled.
    pub async fn snapshot(&self) -> Result<SessionState, SessionError> {
        self.call(|respond_to| SessionCommand::Snapshot { respond_to }).await
    }

    #[instrument(skip(self))]
    pub async fn load_all(&self) -> Result<(), SessionError> {
        self.call(|respond_to| SessionCommand::LoadAll { respond_to }).await
    }

    #[instrument(skip(self))]
    pub async fn run_search(&self, criteria: SearchCriteria) -> Result<usize, SessionError> {
        self.call(|respond_to| SessionCommand::RunSearch { criteria, respond_to }).await
    }

    pub async fn begin_create(&self) -> Result<ProductForm, SessionError> {
        self.call(|respond_to| SessionCommand::BeginCreate { respond_to }).await
    }

    pub async fn begin_edit(&self, product: Product) -> Result<ProductForm, SessionError> {
        self.call(|respond_to| SessionCommand::BeginEdit { product, respond_to }).await
    }

    #[instrument(skip(self))]
    pub async fn begin_edit_by_id(&self, id: ProductId) -> Result<ProductForm, SessionError> {
        self.call(|respond_to| SessionCommand::BeginEditById { id, respond_to }).await
    }

    pub async fn cancel_edit(&self) -> Result<(), SessionError> {
        self.call(|respond_to| SessionCommand::CancelEdit { respond_to }).await
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn submit_create(&self, draft: ProductDraft) -> Result<Product, SessionError> {
        self.call(|respond_to| SessionCommand::SubmitCreate { draft, respond_to }).await
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn submit_update(&self, draft: ProductDraft) -> Result<Product, SessionError> {
        self.call(|respond_to| SessionCommand::SubmitUpdate { draft, respond_to }).await
    }

    /// Submits the form. On failure the caller gets its form back, with the
    /// attribute buffer still holding the last accepted value.
    #[instrument(skip(self, form))]
    pub async fn submit_form(&self, form: ProductForm) -> (ProductForm, Result<Product, SessionError>) {
        let (respond_to, response) = oneshot::channel();
        let fallback = form.clone();
        if self
            .sender
            .send(SessionCommand::SubmitForm { form, respond_to })
            .await
            .is_err()
        {
            return (fallback, Err(SessionError::ActorClosed));
        }
        match response.await {
            Ok(reply) => reply,
            Err(_) => (fallback, Err(SessionError::ActorDropped)),
        }
    }

    #[instrument(skip(self))]
    pub async fn request_delete(&self, id: ProductId) -> Result<DeleteOutcome, SessionError> {
        self.call(|respond_to| SessionCommand::RequestDelete { id, respond_to }).await
    }
}
