//! The state owned by the session controller.

use crate::model::{Product, SearchCriteria};

/// Whether a form is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Browsing,
    Editing,
}

/// What the open form is editing.
#[derive(Debug, Clone, PartialEq)]
pub enum EditTarget {
    /// A product that does not exist yet.
    New,
    /// An existing product, as it was when editing began.
    Existing(Product),
}

/// The search that produced the visible list.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSearch {
    pub criteria: SearchCriteria,
    pub count: usize,
}

/// Snapshot of everything a UI renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Exactly what the service most recently returned in full.
    pub visible_products: Vec<Product>,
    pub active_search: Option<ActiveSearch>,
    pub loading: bool,
    pub editing: Option<EditTarget>,
}

impl SessionState {
    pub fn mode(&self) -> SessionMode {
        match self.editing {
            Some(_) => SessionMode::Editing,
            None => SessionMode::Browsing,
        }
    }
}
