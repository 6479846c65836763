//! Card system: values, definitions and the catalog.
//!
//! ## Key Types
//!
//! - `CardValue`: Identifier of a pair group
//! - `CardDefinition`: Static card data (value + display name)
//! - `CardCatalog`: The pool boards are drawn from

pub mod definition;
pub mod registry;

pub use definition::{CardDefinition, CardValue};
pub use registry::CardCatalog;
