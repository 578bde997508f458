//! In-memory engine that records every call, for index layer tests.

use crate::engine::{AnnEngine, DistanceMetric};
use crate::error::{DbError, DbResult};
use sqlvec_core::{ElementType, Vector};
use std::cell::{Cell, RefCell};

#[derive(Default)]
pub(crate) struct RecordingEngine {
    pub created: RefCell<Vec<(String, usize, DistanceMetric)>>,
    pub opened: Cell<usize>,
    pub closed: Cell<usize>,
    pub element_type_queries: Cell<usize>,
    pub fail_create: bool,
    pub fail_open: bool,
    pub rows: RefCell<Vec<(i64, Vec<f32>)>>,
}

impl AnnEngine for RecordingEngine {
    type Handle = String;

    fn create_index(&self, name: &str, dims: usize, metric: DistanceMetric) -> DbResult<()> {
        if self.fail_create {
            return Err(DbError::engine("no space left for index"));
        }
        self.created
            .borrow_mut()
            .push((name.to_string(), dims, metric));
        Ok(())
    }

    fn open_index(&self, name: &str) -> DbResult<String> {
        if self.fail_open {
            return Err(DbError::IndexNotFound {
                name: name.to_string(),
            });
        }
        self.opened.set(self.opened.get() + 1);
        Ok(name.to_string())
    }

    fn close_index(&self, _handle: String) {
        self.closed.set(self.closed.get() + 1);
    }

    fn element_type(&self, _handle: &String) -> ElementType {
        self.element_type_queries
            .set(self.element_type_queries.get() + 1);
        ElementType::Float32
    }

    fn insert(&self, _handle: &mut String, vector: &Vector<'_>, rowid: i64) -> DbResult<()> {
        assert!(vector.is_borrowed());
        self.rows.borrow_mut().push((rowid, vector.to_f32_vec()));
        Ok(())
    }

    fn search(&self, _handle: &String, _query: &Vector<'_>, k: usize) -> DbResult<Vec<i64>> {
        Ok(self.rows.borrow().iter().take(k).map(|(id, _)| *id).collect())
    }
}
