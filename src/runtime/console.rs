use tracing::{error, info};

use super::actor::{SessionActor, SessionHandle};
use crate::config::ConsoleConfig;
use crate::gateway::{CatalogGateway, HttpCatalogGateway, RemoteError};
use crate::session::{CatalogSessionController, Confirm, SessionError};

/// Command buffer for the session actor.
const SESSION_BUFFER: usize = 32;

/// The running console: a session actor and the handle used to drive it.
///
/// `CatalogConsole` is responsible for:
/// - **Lifecycle Management**: Starting the session task and stopping it cleanly
/// - **Dependency Wiring**: Handing the gateway and confirmation gate to the controller
///
/// # Example
///
/// ```ignore
/// let console = CatalogConsole::connect(&ConsoleConfig::from_env()?, AlwaysConfirm)?;
///
/// console.session.load_all().await?;
/// let state = console.session.snapshot().await?;
///
/// console.shutdown().await?;
/// ```
pub struct CatalogConsole {
    /// Handle for sending commands to the session actor
    pub session: SessionHandle,

    /// Task handle for the running actor (used for graceful shutdown)
    handle: tokio::task::JoinHandle<()>,
}

impl CatalogConsole {
    /// Starts a console over any gateway.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new<G>(gateway: G, confirm: impl Confirm + 'static) -> Self
    where
        G: CatalogGateway + 'static,
    {
        let controller = CatalogSessionController::new(gateway, confirm);
        let (actor, session) = SessionActor::new(SESSION_BUFFER, controller);
        let handle = tokio::spawn(actor.run());

        Self { session, handle }
    }

    /// Starts a console against the REST service described by `config`.
    pub fn connect(config: &ConsoleConfig, confirm: impl Confirm + 'static) -> Result<Self, RemoteError> {
        let gateway = HttpCatalogGateway::new(config)?;
        info!(base_url = gateway.base_url(), "Connecting to catalog");
        Ok(Self::new(gateway, confirm))
    }

    /// Gracefully shuts down the console.
    ///
    /// Dropping this console's handle closes the command channel once no other
    /// clones remain; the actor drains what is queued, then exits.
    pub async fn shutdown(self) -> Result<(), SessionError> {
        info!("Shutting down console...");
        drop(self.session);

        if let Err(e) = self.handle.await {
            error!("Session task failed: {:?}", e);
            return Err(SessionError::ActorFailed(e.to_string()));
        }

        info!("Console shutdown complete.");
        Ok(())
    }
}
