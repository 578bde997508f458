//! Flat (exact) ANN engine.
//!
//! Stores each vector as one row of the index's shadow table, keyed by the
//! indexed row's rowid, and answers searches with a linear scan. It is meant
//! for tests and small tables where a graph index is not worth building.

use super::meta::{check_index_compatibility, IndexCompatibility, IndexMeta};
use super::{AnnEngine, DistanceMetric};
use crate::error::{DbError, DbResult};
use crate::shadow::{create_shadow_table, quote_identifier, shadow_table_name, table_exists};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};
use sqlvec_core::{cosine_distance, ElementType, Vector};
use tracing::{debug, trace};

/// Table holding one JSON [`IndexMeta`] per index.
pub const META_TABLE: &str = "sqlvec_index_meta";

/// An index opened by [`FlatEngine`].
#[derive(Debug)]
pub struct FlatIndex {
    name: String,
    shadow_table: String,
    meta: IndexMeta,
}

impl FlatIndex {
    /// Index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored metadata.
    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    fn check_query(&self, v: &Vector<'_>) -> DbResult<()> {
        if v.element_type() != self.meta.element_type {
            return Err(DbError::index_incompatible(
                &self.name,
                format!(
                    "element type mismatch: expected '{}', got '{}'",
                    self.meta.element_type,
                    v.element_type()
                ),
            ));
        }
        if v.dims() != self.meta.dimension {
            return Err(DbError::DimensionMismatch {
                expected: self.meta.dimension,
                actual: v.dims(),
            });
        }
        Ok(())
    }
}

/// Linear-scan engine over a SQLite connection.
pub struct FlatEngine<'c> {
    conn: &'c Connection,
}

impl<'c> FlatEngine<'c> {
    /// Bind the engine to `conn`, creating its metadata table if needed.
    pub fn new(conn: &'c Connection) -> DbResult<Self> {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (name TEXT PRIMARY KEY, meta TEXT NOT NULL)",
            META_TABLE
        ))?;
        Ok(Self { conn })
    }

    /// Raw metadata JSON for `name`.
    fn load_meta_json(&self, name: &str) -> DbResult<Option<String>> {
        let json = self
            .conn
            .query_row(
                &format!("SELECT meta FROM {} WHERE name = ?1", META_TABLE),
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(json)
    }

    /// Metadata for `name`, if the index exists.
    pub fn index_meta(&self, name: &str) -> DbResult<Option<IndexMeta>> {
        match self.load_meta_json(name)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Number of vectors stored in an open index.
    pub fn len(&self, handle: &FlatIndex) -> DbResult<usize> {
        let count: i64 = self.conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {}",
                quote_identifier(&handle.shadow_table)
            ),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl AnnEngine for FlatEngine<'_> {
    type Handle = FlatIndex;

    fn create_index(&self, name: &str, dims: usize, metric: DistanceMetric) -> DbResult<()> {
        let requested = IndexMeta::new(ElementType::Float32, dims, metric);
        let stored = self.load_meta_json(name)?;

        match check_index_compatibility(stored.as_deref(), &requested) {
            IndexCompatibility::Compatible => {
                debug!("Index {} already exists, reusing", name);
            }
            IndexCompatibility::NotFound => {
                debug!("Creating flat index {} (dims={}, metric={})", name, dims, metric);
                create_shadow_table(self.conn, name)?;
                self.conn.execute(
                    &format!("INSERT INTO {} (name, meta) VALUES (?1, ?2)", META_TABLE),
                    params![name, serde_json::to_string(&requested)?],
                )?;
            }
            incompatible => {
                let reason = incompatible.reason().unwrap_or_default();
                return Err(DbError::index_incompatible(name, reason));
            }
        }
        Ok(())
    }

    fn open_index(&self, name: &str) -> DbResult<FlatIndex> {
        let meta = match self.load_meta_json(name)? {
            Some(json) => serde_json::from_str::<IndexMeta>(&json).map_err(|e| {
                DbError::index_incompatible(name, format!("index corrupted: {}", e))
            })?,
            None => {
                return Err(DbError::IndexNotFound {
                    name: name.to_string(),
                })
            }
        };

        let shadow_table = shadow_table_name(name);
        if !table_exists(self.conn, &shadow_table)? {
            return Err(DbError::index_incompatible(
                name,
                format!("shadow table '{}' is missing", shadow_table),
            ));
        }

        debug!("Opened flat index {} (dims={})", name, meta.dimension);
        Ok(FlatIndex {
            name: name.to_string(),
            shadow_table,
            meta,
        })
    }

    fn close_index(&self, handle: FlatIndex) {
        trace!("Closing flat index {}", handle.name);
    }

    fn element_type(&self, handle: &FlatIndex) -> ElementType {
        handle.meta.element_type
    }

    fn insert(&self, handle: &mut FlatIndex, vector: &Vector<'_>, rowid: i64) -> DbResult<()> {
        handle.check_query(vector)?;
        trace!("Inserting rowid {} into {}", rowid, handle.name);
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {} (rowid, data) VALUES (?1, ?2)",
                quote_identifier(&handle.shadow_table)
            ),
            params![rowid, vector.as_bytes()],
        )?;
        Ok(())
    }

    fn search(&self, handle: &FlatIndex, query: &Vector<'_>, k: usize) -> DbResult<Vec<i64>> {
        handle.check_query(query)?;
        trace!("Searching {}, k={}", handle.name, k);
        if k == 0 {
            return Ok(Vec::new());
        }

        let element_type = handle.meta.element_type;
        let expected_len = element_type.data_size(handle.meta.dimension);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT rowid, data FROM {}",
            quote_identifier(&handle.shadow_table)
        ))?;
        let mut rows = stmt.query([])?;

        let mut scored: Vec<(f32, i64)> = Vec::new();
        while let Some(row) = rows.next()? {
            let rowid: i64 = row.get(0)?;
            let bytes = match row.get_ref(1)? {
                ValueRef::Blob(bytes) if bytes.len() == expected_len => bytes,
                _ => {
                    debug!("Skipping malformed row {} in {}", rowid, handle.shadow_table);
                    continue;
                }
            };
            let stored = Vector::wrap_borrowed(element_type, bytes);
            scored.push((cosine_distance(query, &stored), rowid));
        }

        // Nearest first, ties by rowid
        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        scored.truncate(k);

        trace!("Found {} results", scored.len());
        Ok(scored.into_iter().map(|(_, rowid)| rowid).collect())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_of(values: &[f32]) -> Vector<'static> {
        Vector::from_f32_slice(ElementType::Float32, values).unwrap()
    }

    #[test]
    fn test_create_and_open() {
        let conn = Connection::open_in_memory().unwrap();
        let engine = FlatEngine::new(&conn).unwrap();

        engine.create_index("idx", 3, DistanceMetric::Cosine).unwrap();
        let handle = engine.open_index("idx").unwrap();
        assert_eq!(handle.name(), "idx");
        assert_eq!(handle.meta().dimension, 3);
        assert_eq!(engine.len(&handle).unwrap(), 0);
        assert_eq!(engine.element_type(&handle), ElementType::Float32);
        engine.close_index(handle);
    }

    #[test]
    fn test_create_twice() {
        let conn = Connection::open_in_memory().unwrap();
        let engine = FlatEngine::new(&conn).unwrap();

        engine.create_index("idx", 3, DistanceMetric::Cosine).unwrap();
        engine.create_index("idx", 3, DistanceMetric::Cosine).unwrap();
        let err = engine
            .create_index("idx", 4, DistanceMetric::Cosine)
            .unwrap_err();
        assert!(matches!(err, DbError::IndexIncompatible { .. }));
    }

    #[test]
    fn test_open_missing() {
        let conn = Connection::open_in_memory().unwrap();
        let engine = FlatEngine::new(&conn).unwrap();
        let err = engine.open_index("nope").unwrap_err();
        assert!(matches!(err, DbError::IndexNotFound { .. }));
    }

    #[test]
    fn test_insert_and_search() {
        let conn = Connection::open_in_memory().unwrap();
        let engine = FlatEngine::new(&conn).unwrap();
        engine.create_index("idx", 2, DistanceMetric::Cosine).unwrap();
        let mut handle = engine.open_index("idx").unwrap();

        engine.insert(&mut handle, &vec_of(&[1.0, 0.0]), 10).unwrap();
        engine.insert(&mut handle, &vec_of(&[0.0, 1.0]), 20).unwrap();
        engine.insert(&mut handle, &vec_of(&[1.0, 1.0]), 30).unwrap();
        assert_eq!(engine.len(&handle).unwrap(), 3);

        let ids = engine.search(&handle, &vec_of(&[1.0, 0.1]), 2).unwrap();
        assert_eq!(ids, vec![10, 30]);

        let all = engine.search(&handle, &vec_of(&[0.0, 1.0]), 10).unwrap();
        assert_eq!(all, vec![20, 30, 10]);

        assert!(engine.search(&handle, &vec_of(&[1.0, 0.0]), 0).unwrap().is_empty());
    }

    #[test]
    fn test_insert_replaces_rowid() {
        let conn = Connection::open_in_memory().unwrap();
        let engine = FlatEngine::new(&conn).unwrap();
        engine.create_index("idx", 2, DistanceMetric::Cosine).unwrap();
        let mut handle = engine.open_index("idx").unwrap();

        engine.insert(&mut handle, &vec_of(&[1.0, 0.0]), 1).unwrap();
        engine.insert(&mut handle, &vec_of(&[0.0, 1.0]), 1).unwrap();
        assert_eq!(engine.len(&handle).unwrap(), 1);
        let ids = engine.search(&handle, &vec_of(&[0.0, 1.0]), 1).unwrap();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_ties_broken_by_rowid() {
        let conn = Connection::open_in_memory().unwrap();
        let engine = FlatEngine::new(&conn).unwrap();
        engine.create_index("idx", 2, DistanceMetric::Cosine).unwrap();
        let mut handle = engine.open_index("idx").unwrap();

        for rowid in [7, 3, 5] {
            engine.insert(&mut handle, &vec_of(&[2.0, 2.0]), rowid).unwrap();
        }
        let ids = engine.search(&handle, &vec_of(&[1.0, 1.0]), 3).unwrap();
        assert_eq!(ids, vec![3, 5, 7]);
    }

    #[test]
    fn test_search_large_magnitudes() {
        let conn = Connection::open_in_memory().unwrap();
        let engine = FlatEngine::new(&conn).unwrap();
        engine.create_index("idx", 2, DistanceMetric::Cosine).unwrap();
        let mut handle = engine.open_index("idx").unwrap();

        engine.insert(&mut handle, &vec_of(&[1e30, 2e30]), 1).unwrap();
        engine.insert(&mut handle, &vec_of(&[1e30, 1e30]), 2).unwrap();
        engine.insert(&mut handle, &vec_of(&[-1e30, 0.0]), 3).unwrap();

        let ids = engine.search(&handle, &vec_of(&[1e30, 1e30]), 3).unwrap();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_dimension_checked() {
        let conn = Connection::open_in_memory().unwrap();
        let engine = FlatEngine::new(&conn).unwrap();
        engine.create_index("idx", 3, DistanceMetric::Cosine).unwrap();
        let mut handle = engine.open_index("idx").unwrap();

        let err = engine
            .insert(&mut handle, &vec_of(&[1.0, 2.0]), 1)
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
        assert!(engine.search(&handle, &vec_of(&[1.0]), 1).is_err());
    }

    #[test]
    fn test_open_without_shadow_table() {
        let conn = Connection::open_in_memory().unwrap();
        let engine = FlatEngine::new(&conn).unwrap();
        engine.create_index("idx", 3, DistanceMetric::Cosine).unwrap();
        conn.execute_batch("DROP TABLE idx_shadow").unwrap();
        let err = engine.open_index("idx").unwrap_err();
        assert!(matches!(err, DbError::IndexIncompatible { .. }));
    }
}
