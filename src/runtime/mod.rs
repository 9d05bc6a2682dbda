//! Runtime orchestration and lifecycle management.
//!
//! This module contains the infrastructure for running the console:
//!
//! - **Session actor**: the task that owns the controller and serializes commands
//! - **Console lifecycle**: starting, wiring and shutting down that task
//! - **Observability setup**: initializing tracing and logging
//!
//! # Main Components
//!
//! - [`CatalogConsole`] - Starts the session actor and shuts it down
//! - [`SessionHandle`] - Cloneable async client for the session
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod actor;
pub mod console;
pub mod tracing;

pub use self::actor::*;
pub use self::console::*;
pub use self::tracing::*;
