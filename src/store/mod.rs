//! # Item Store
//!
//! Durable CRUD persistence and validation for [`Item`] records.
//!
//! The HTTP layer only sees the [`ItemStore`] trait; [`SqliteItemStore`] is the
//! production implementation. Handles are constructed explicitly at process
//! start and passed into the service, so tests can open an isolated
//! `:memory:` instance per case:
//!
//! ```rust
//! use interview_api::domain::ItemChanges;
//! use interview_api::store::{ItemStore, SqliteItemStore};
//!
//! let store = SqliteItemStore::open_in_memory().unwrap();
//! let item = store.create(&ItemChanges::new("Widget", None)).unwrap();
//! assert_eq!(store.find_by_id(item.id).unwrap(), Some(item));
//! ```
//!
//! Every mutating operation touches exactly one row and runs as one atomic
//! unit against the table; there are no retries.

mod error;
mod schema;
mod sqlite;

pub use error::StoreError;
pub use schema::SchemaMode;
pub use sqlite::SqliteItemStore;

use crate::domain::{Item, ItemChanges};

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Offset/limit window over the primary-key ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    /// `None` means unbounded
    pub limit: Option<u64>,
}

impl Page {
    pub fn new(skip: u64, limit: Option<u64>) -> Self {
        Self { skip, limit }
    }
}

/// CRUD contract for item persistence.
///
/// "Not found" on reads is `Ok(None)`, never an error. Mutations report it as
/// [`StoreError::NotFound`] so the caller can tell it apart from validation
/// failures.
pub trait ItemStore: Send + Sync {
    /// Items in ascending primary-key order, windowed by `page`.
    fn list(&self, page: Page) -> StoreResult<Vec<Item>>;

    /// Every item in insertion order.
    fn list_all(&self) -> StoreResult<Vec<Item>> {
        self.list(Page::default())
    }

    fn find_by_id(&self, id: i64) -> StoreResult<Option<Item>>;

    /// Validate and insert a new active item.
    fn create(&self, changes: &ItemChanges) -> StoreResult<Item>;

    /// Replace `name` and `description` of an existing item.
    ///
    /// Lookup happens before validation: a missing id is reported as
    /// `NotFound` even when `changes` is invalid. On any failure the stored
    /// row is left untouched.
    fn update(&self, id: i64, changes: &ItemChanges) -> StoreResult<Item>;

    /// Permanently remove an item.
    fn destroy(&self, id: i64) -> StoreResult<()>;

    fn count(&self) -> StoreResult<usize>;
}
