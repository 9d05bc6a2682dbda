//! The console's session: visible state, the edit form, and the transitions between them.

mod confirm;
pub mod controller;
pub mod error;
pub mod form;
mod state;

pub use confirm::*;
pub use controller::*;
pub use error::*;
pub use form::*;
pub use state::*;
