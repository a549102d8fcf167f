//! Schema bootstrap for the `items` table.

use rusqlite::Connection;
use tracing::{debug, info};

use super::{StoreError, StoreResult};

/// How [`SqliteItemStore`](super::SqliteItemStore) treats the schema when opening.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaMode {
    /// Create the table and index when they are missing
    #[default]
    Migrate,
    /// Require an existing schema and fail otherwise
    Verify,
}

const CREATE_ITEMS: &str = "CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    active BOOLEAN NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

const CREATE_NAME_INDEX: &str = "CREATE INDEX IF NOT EXISTS index_items_on_name ON items(name)";

/// Columns the store reads and writes; `Verify` checks all of them.
const REQUIRED_COLUMNS: [&str; 6] = [
    "id",
    "name",
    "description",
    "active",
    "created_at",
    "updated_at",
];

pub(super) fn prepare(conn: &Connection, mode: SchemaMode) -> StoreResult<()> {
    match mode {
        SchemaMode::Migrate => run_migrations(conn),
        SchemaMode::Verify => verify(conn),
    }
}

fn run_migrations(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(&format!("{CREATE_ITEMS};\n{CREATE_NAME_INDEX};"))?;
    info!("items schema ready");
    Ok(())
}

fn verify(conn: &Connection) -> StoreResult<()> {
    let columns = table_columns(conn, "items")?;
    if columns.is_empty() {
        return Err(StoreError::Database(
            "schema missing: table `items` does not exist".to_string(),
        ));
    }
    for column in REQUIRED_COLUMNS {
        if !columns.iter().any(|c| c == column) {
            return Err(StoreError::Database(format!(
                "schema missing: column `items.{column}` does not exist"
            )));
        }
    }
    debug!(columns = ?columns, "items schema verified");
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}
