//! Shadow storage: the `<index>_shadow (data BLOB)` table created next to
//! every vector index for the ANN engine's private use.

use crate::error::DbResult;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

/// Suffix appended to the index name to form the shadow table name.
pub const SHADOW_SUFFIX: &str = "_shadow";

/// Name of the shadow table for `index_name`.
pub fn shadow_table_name(index_name: &str) -> String {
    format!("{}{}", index_name, SHADOW_SUFFIX)
}

/// Quote an SQL identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Create the shadow table for `index_name` if it does not exist yet.
///
/// Returns the shadow table name.
pub fn create_shadow_table(conn: &Connection, index_name: &str) -> DbResult<String> {
    let table = shadow_table_name(index_name);
    debug!("Creating shadow table {}", table);
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {} (data BLOB)",
        quote_identifier(&table)
    ))?;
    Ok(table)
}

/// Whether a table called `name` exists.
pub fn table_exists(conn: &Connection, name: &str) -> DbResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}
