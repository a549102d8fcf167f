//! Domain types for the item service.
//!
//! This layer has no knowledge of HTTP or SQL.

mod item;

pub use item::{validate, Item, ItemChanges, ValidationErrors, NAME_BLANK};
