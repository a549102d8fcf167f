//! SQLite-backed [`ItemStore`].

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

use super::schema::{self, SchemaMode};
use super::{ItemStore, Page, StoreError, StoreResult};
use crate::domain::{validate, Item, ItemChanges};

const SELECT_ITEM: &str =
    "SELECT id, name, description, active, created_at, updated_at FROM items";

/// SQLite implementation of the item store.
///
/// A single connection is shared behind a mutex, so every operation is one
/// critical section and writes to the same row are serialized.
pub struct SqliteItemStore {
    conn: Mutex<Connection>,
}

impl SqliteItemStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>, mode: SchemaMode) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        info!(path = %path.display(), mode = ?mode, "opening item store");
        Self::from_connection(conn, mode)
    }

    /// Open a private in-memory database with the schema applied.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, SchemaMode::Migrate)
    }

    pub fn from_connection(conn: Connection, mode: SchemaMode) -> StoreResult<Self> {
        schema::prepare(&conn, mode)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Unavailable)
    }
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        active: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn fetch(conn: &Connection, id: i64) -> StoreResult<Option<Item>> {
    let item = conn
        .query_row(&format!("{SELECT_ITEM} WHERE id = ?1"), params![id], row_to_item)
        .optional()?;
    Ok(item)
}

impl ItemStore for SqliteItemStore {
    fn list(&self, page: Page) -> StoreResult<Vec<Item>> {
        let conn = self.lock()?;
        // SQLite treats a negative LIMIT as "no limit".
        let limit = page
            .limit
            .map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
        let offset = i64::try_from(page.skip).unwrap_or(i64::MAX);

        let mut stmt = conn.prepare(&format!(
            "{SELECT_ITEM} ORDER BY id ASC LIMIT ?1 OFFSET ?2"
        ))?;
        let items = stmt
            .query_map(params![limit, offset], row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = items.len(), skip = page.skip, limit = ?page.limit, "items listed");
        Ok(items)
    }

    fn find_by_id(&self, id: i64) -> StoreResult<Option<Item>> {
        let conn = self.lock()?;
        fetch(&conn, id)
    }

    fn create(&self, changes: &ItemChanges) -> StoreResult<Item> {
        let name = validate(changes)?;
        let conn = self.lock()?;
        let now = Utc::now();
        conn.execute(
            "INSERT INTO items (name, description, active, created_at, updated_at)
             VALUES (?1, ?2, 1, ?3, ?3)",
            params![name, changes.description, now],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, "item created");
        fetch(&conn, id)?.ok_or(StoreError::NotFound)
    }

    fn update(&self, id: i64, changes: &ItemChanges) -> StoreResult<Item> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        if fetch(&tx, id)?.is_none() {
            return Err(StoreError::NotFound);
        }
        let name = validate(changes)?;
        tx.execute(
            "UPDATE items SET name = ?1, description = ?2, updated_at = ?3 WHERE id = ?4",
            params![name, changes.description, Utc::now(), id],
        )?;
        let item = fetch(&tx, id)?.ok_or(StoreError::NotFound)?;
        tx.commit()?;
        debug!(id, "item updated");
        Ok(item)
    }

    fn destroy(&self, id: i64) -> StoreResult<()> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM items WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        debug!(id, "item destroyed");
        Ok(())
    }

    fn count(&self) -> StoreResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NAME_BLANK;

    fn store() -> SqliteItemStore {
        SqliteItemStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_sets_defaults() {
        let store = store();
        let item = store
            .create(&ItemChanges::new("Test Item", Some("d".into())))
            .unwrap();
        assert!(item.id > 0);
        assert_eq!(item.name, "Test Item");
        assert_eq!(item.description.as_deref(), Some("d"));
        assert!(item.active);
        assert_eq!(item.created_at, item.updated_at);
    }

    #[test]
    fn test_create_then_find_round_trips() {
        let store = store();
        let created = store.create(&ItemChanges::new("Find me", None)).unwrap();
        let found = store.find_by_id(created.id).unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[test]
    fn test_create_blank_name_writes_nothing() {
        let store = store();
        let err = store.create(&ItemChanges::new("  ", None)).unwrap_err();
        match err {
            StoreError::Validation(errors) => assert_eq!(errors.messages(), [NAME_BLANK]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_list_all_in_insertion_order() {
        let store = store();
        store.create(&ItemChanges::new("Item 1", None)).unwrap();
        store.create(&ItemChanges::new("Item 2", None)).unwrap();
        let names: Vec<_> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, ["Item 1", "Item 2"]);
    }

    #[test]
    fn test_list_with_page_window() {
        let store = store();
        for n in 1..=5 {
            store.create(&ItemChanges::new(format!("Item {n}"), None)).unwrap();
        }
        let names: Vec<_> = store
            .list(Page::new(1, Some(2)))
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, ["Item 2", "Item 3"]);
        assert_eq!(store.list(Page::new(10, None)).unwrap().len(), 0);
    }

    #[test]
    fn test_find_missing_is_none() {
        assert_eq!(store().find_by_id(999).unwrap(), None);
    }

    #[test]
    fn test_update_replaces_name_and_description() {
        let store = store();
        let created = store
            .create(&ItemChanges::new("Original", Some("Original description".into())))
            .unwrap();
        std::thread::sleep(Duration::from_millis(5));
        let updated = store
            .update(created.id, &ItemChanges::new("Updated", None))
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Updated");
        assert_eq!(updated.description, None);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
        assert!(updated.active);
    }

    #[test]
    fn test_update_invalid_leaves_row_unchanged() {
        let store = store();
        let created = store.create(&ItemChanges::new("Keep", Some("me".into()))).unwrap();
        let err = store
            .update(created.id, &ItemChanges::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.find_by_id(created.id).unwrap(), Some(created));
    }

    #[test]
    fn test_update_missing_reports_not_found_before_validation() {
        let err = store().update(999, &ItemChanges::default()).unwrap_err();
        assert_eq!(err, StoreError::NotFound);
    }

    #[test]
    fn test_destroy_removes_exactly_one() {
        let store = store();
        let keep = store.create(&ItemChanges::new("keep", None)).unwrap();
        let gone = store.create(&ItemChanges::new("gone", None)).unwrap();
        store.destroy(gone.id).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.find_by_id(gone.id).unwrap(), None);
        assert!(store.find_by_id(keep.id).unwrap().is_some());
        assert_eq!(store.destroy(gone.id).unwrap_err(), StoreError::NotFound);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let store = store();
        let first = store.create(&ItemChanges::new("a", None)).unwrap();
        store.destroy(first.id).unwrap();
        let second = store.create(&ItemChanges::new("b", None)).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_file_backed_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.db");
        let id = {
            let store = SqliteItemStore::open(&path, SchemaMode::Migrate).unwrap();
            store.create(&ItemChanges::new("durable", None)).unwrap().id
        };
        let store = SqliteItemStore::open(&path, SchemaMode::Verify).unwrap();
        assert_eq!(store.find_by_id(id).unwrap().unwrap().name, "durable");
    }

    #[test]
    fn test_verify_mode_rejects_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let result = SqliteItemStore::open(dir.path().join("empty.db"), SchemaMode::Verify);
        assert!(matches!(result, Err(StoreError::Database(_))));
    }
}
