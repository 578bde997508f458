//! Cursor over an open vector index.

use crate::engine::AnnEngine;
use crate::error::{DbError, DbResult};
use sqlvec_core::codec::parse_blob;
use sqlvec_core::{ElementType, SqlValue, Vector};
use tracing::{debug, trace};

/// Binds one open engine handle to a relational cursor.
///
/// The handle is owned by the cursor alone. It is released by [`close`] or,
/// if the cursor is dropped without being closed, by `Drop`.
///
/// [`close`]: VectorIndexCursor::close
pub struct VectorIndexCursor<'e, E: AnnEngine> {
    engine: &'e E,
    index_name: String,
    element_type: ElementType,
    handle: Option<E::Handle>,
}

impl<'e, E: AnnEngine> VectorIndexCursor<'e, E> {
    /// Open `index_name` on `engine`.
    ///
    /// On failure the engine's error is returned and no handle is held.
    pub fn open(engine: &'e E, index_name: &str) -> DbResult<Self> {
        let handle = engine.open_index(index_name)?;
        let element_type = engine.element_type(&handle);
        debug!("Opened cursor on {} ({})", index_name, element_type);
        Ok(Self {
            engine,
            index_name: index_name.to_string(),
            element_type,
            handle: Some(handle),
        })
    }

    /// Index this cursor is bound to.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Element type used to decode stored blobs.
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    fn handle(&self) -> DbResult<&E::Handle> {
        self.handle
            .as_ref()
            .ok_or_else(|| DbError::internal("cursor has no open index handle"))
    }

    /// Insert one `(vector blob, rowid)` record.
    ///
    /// The blob is borrowed for the duration of the call.
    ///
    /// # Errors
    ///
    /// A record that is not exactly a blob followed by an integer is an
    /// internal error: the host always hands over that shape.
    pub fn insert(&mut self, record: &[SqlValue<'_>]) -> DbResult<()> {
        let (bytes, rowid) = match record {
            [SqlValue::Blob(bytes), SqlValue::Integer(rowid)] => (*bytes, *rowid),
            [first, second] => {
                return Err(DbError::internal(format!(
                    "index record must be (blob, integer), got ({}, {})",
                    first.type_name(),
                    second.type_name()
                )))
            }
            _ => {
                return Err(DbError::internal(format!(
                    "index record must have 2 fields, got {}",
                    record.len()
                )))
            }
        };

        let vector = parse_blob(self.element_type, bytes)?;
        trace!("Cursor insert rowid {} into {}", rowid, self.index_name);

        let handle = self
            .handle
            .as_mut()
            .ok_or_else(|| DbError::internal("cursor has no open index handle"))?;
        self.engine.insert(handle, &vector, rowid)
    }

    /// Up to `k` row ids nearest to `query`.
    pub fn search(&self, query: &Vector<'_>, k: usize) -> DbResult<Vec<i64>> {
        self.engine.search(self.handle()?, query, k)
    }

    /// Release the engine handle.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("Closing cursor on {}", self.index_name);
            self.engine.close_index(handle);
        }
    }
}

impl<E: AnnEngine> Drop for VectorIndexCursor<'_, E> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::test_support::RecordingEngine;

    fn blob(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    #[test]
    fn test_insert_forwards_borrowed_vector() {
        let engine = RecordingEngine::default();
        let mut cursor = VectorIndexCursor::open(&engine, "idx").unwrap();
        assert_eq!(cursor.index_name(), "idx");
        assert_eq!(cursor.element_type(), ElementType::Float32);
        assert_eq!(engine.element_type_queries.get(), 1);

        let bytes = blob(&[1.0, 2.0, 3.0]);
        cursor
            .insert(&[SqlValue::Blob(&bytes), SqlValue::Integer(42)])
            .unwrap();
        cursor.close();

        assert_eq!(*engine.rows.borrow(), vec![(42, vec![1.0, 2.0, 3.0])]);
        assert_eq!(engine.opened.get(), 1);
        assert_eq!(engine.closed.get(), 1);
    }

    #[test]
    fn test_insert_rejects_bad_shape() {
        let engine = RecordingEngine::default();
        let mut cursor = VectorIndexCursor::open(&engine, "idx").unwrap();

        let err = cursor
            .insert(&[SqlValue::Text("[1]"), SqlValue::Integer(1)])
            .unwrap_err();
        assert!(matches!(err, DbError::Internal { .. }));

        let err = cursor.insert(&[SqlValue::Integer(1)]).unwrap_err();
        assert!(matches!(err, DbError::Internal { .. }));
        assert!(engine.rows.borrow().is_empty());
    }

    #[test]
    fn test_insert_rejects_ragged_blob() {
        let engine = RecordingEngine::default();
        let mut cursor = VectorIndexCursor::open(&engine, "idx").unwrap();
        let err = cursor
            .insert(&[SqlValue::Blob(&[1, 2, 3]), SqlValue::Integer(1)])
            .unwrap_err();
        assert!(matches!(err, DbError::Vector(_)));
    }

    #[test]
    fn test_drop_releases_handle() {
        let engine = RecordingEngine::default();
        {
            let _cursor = VectorIndexCursor::open(&engine, "idx").unwrap();
        }
        assert_eq!(engine.closed.get(), 1);
    }

    #[test]
    fn test_failed_open_holds_nothing() {
        let engine = RecordingEngine {
            fail_open: true,
            ..Default::default()
        };
        let err = VectorIndexCursor::open(&engine, "idx").err().unwrap();
        assert!(matches!(err, DbError::IndexNotFound { .. }));
        assert_eq!(engine.closed.get(), 0);
    }

    #[test]
    fn test_search_through_cursor() {
        let engine = RecordingEngine::default();
        let mut cursor = VectorIndexCursor::open(&engine, "idx").unwrap();
        for rowid in 1..=3 {
            let bytes = blob(&[rowid as f32]);
            cursor
                .insert(&[SqlValue::Blob(&bytes), SqlValue::Integer(rowid)])
                .unwrap();
        }
        let query = Vector::from_f32_slice(ElementType::Float32, &[1.0]).unwrap();
        assert_eq!(cursor.search(&query, 2).unwrap(), vec![1, 2]);
    }
}
