//! Plain data carried between the console layers: products, drafts and search criteria.

pub mod product;
pub mod search;

pub use product::*;
pub use search::*;
