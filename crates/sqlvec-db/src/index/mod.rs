//! Vector index integration.
//!
//! Maps relational index operations onto an [`AnnEngine`]:
//!
//! - [`create_vector_index`]: validate the definition, create shadow storage,
//!   ask the engine to create its index
//! - [`VectorIndexCursor`]: one open engine handle, used for inserts and
//!   searches and released when the cursor is closed or dropped
//! - [`populate_index`]: feed the rows already in the table through a cursor

mod cursor;
#[cfg(test)]
mod test_support;

pub use cursor::VectorIndexCursor;

use crate::engine::{AnnEngine, DistanceMetric};
use crate::error::{DbError, DbResult};
use crate::shadow::{create_shadow_table, quote_identifier};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use sqlvec_core::{ElementType, SqlValue, MAX_DIMS};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

// ============================================================================
// IndexStrategy
// ============================================================================

/// Indexing strategy named in the index definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStrategy {
    /// `diskann_cosine_ops`
    DiskAnnCosine,
}

impl IndexStrategy {
    /// Token used in index definitions.
    pub fn token(&self) -> &'static str {
        match self {
            IndexStrategy::DiskAnnCosine => "diskann_cosine_ops",
        }
    }

    /// Distance metric the strategy indexes for.
    pub fn metric(&self) -> DistanceMetric {
        match self {
            IndexStrategy::DiskAnnCosine => DistanceMetric::Cosine,
        }
    }

    /// Default strategy for indexing under `metric`.
    pub fn for_metric(metric: DistanceMetric) -> Self {
        match metric {
            DistanceMetric::Cosine => IndexStrategy::DiskAnnCosine,
        }
    }

    /// Look up a strategy by token, ignoring ASCII case.
    pub fn from_token(token: &str) -> Option<Self> {
        [IndexStrategy::DiskAnnCosine]
            .into_iter()
            .find(|s| s.token().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for IndexStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

// ============================================================================
// VectorColumnType
// ============================================================================

/// A vector column declaration such as `FLOAT32(128)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorColumnType {
    pub element_type: ElementType,
    pub dims: usize,
}

impl FromStr for VectorColumnType {
    type Err = DbError;

    fn from_str(decl: &str) -> Result<Self, Self::Err> {
        let invalid = || DbError::schema(format!("Invalid vector type: {}", decl));
        let decl_trimmed = decl.trim();

        for &element_type in ElementType::all() {
            let prefix = element_type.type_name();
            let Some(head) = decl_trimmed.get(..prefix.len() + 1) else {
                continue;
            };
            if !head.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
                || !head.ends_with('(')
            {
                continue;
            }

            let rest = &decl_trimmed[prefix.len() + 1..];
            let (digits, tail) = rest.split_once(')').ok_or_else(invalid)?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            if !tail.trim().is_empty() {
                return Err(invalid());
            }
            let dims: usize = digits.parse().map_err(|_| invalid())?;
            if dims == 0 || dims > MAX_DIMS {
                return Err(invalid());
            }
            return Ok(Self { element_type, dims });
        }

        Err(invalid())
    }
}

/// Dimension count of a `FLOAT32(<dims>)` declaration, if valid.
pub fn parse_vector_dims(decl: &str) -> Option<usize> {
    decl.parse::<VectorColumnType>().ok().map(|t| t.dims)
}

// ============================================================================
// IndexDefinition
// ============================================================================

/// A column covered by an index, with its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    pub name: String,
    pub declared_type: String,
}

/// An index definition as handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    /// Index name.
    pub name: String,

    /// Indexed table.
    pub table: String,

    /// Indexed columns, in order.
    pub columns: Vec<IndexColumn>,

    /// Strategy tokens from the `USING` clause.
    pub using: Vec<String>,
}

impl IndexDefinition {
    /// Create an empty definition.
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            columns: Vec::new(),
            using: Vec::new(),
        }
    }

    /// Add a column.
    pub fn with_column(mut self, name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        self.columns.push(IndexColumn {
            name: name.into(),
            declared_type: declared_type.into(),
        });
        self
    }

    /// Add a strategy token.
    pub fn with_using(mut self, token: impl Into<String>) -> Self {
        self.using.push(token.into());
        self
    }

    /// Build a definition, reading the declared column types from the schema.
    ///
    /// # Errors
    ///
    /// Returns a schema error if the table or a column does not exist.
    pub fn from_table(
        conn: &Connection,
        name: &str,
        table: &str,
        columns: &[&str],
        using: &[&str],
    ) -> DbResult<Self> {
        let mut stmt = conn.prepare("SELECT name, type FROM pragma_table_info(?1)")?;
        let declared: Vec<(String, String)> = stmt
            .query_map([table], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<_, _>>()?;
        if declared.is_empty() {
            return Err(DbError::schema(format!("no such table: {}", table)));
        }

        let mut def = Self::new(name, table);
        for column in columns {
            let (col_name, col_type) = declared
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(column))
                .ok_or_else(|| {
                    DbError::schema(format!("no such column: {}.{}", table, column))
                })?;
            def = def.with_column(col_name.clone(), col_type.clone());
        }
        for token in using {
            def = def.with_using(*token);
        }
        Ok(def)
    }

    /// Check the definition and resolve what the engine needs.
    ///
    /// # Errors
    ///
    /// Returns a schema error for a missing or unknown strategy, more than
    /// one strategy or column, or a column type that is not a vector type.
    pub fn validate(&self) -> DbResult<VectorIndexInfo> {
        let strategy = match self.using.as_slice() {
            [token] => IndexStrategy::from_token(token)
                .ok_or_else(|| DbError::schema(format!("Unknown indexing method: {}", token)))?,
            [] => return Err(DbError::schema("Vector index requires an indexing method")),
            [_, extra, ..] => {
                return Err(DbError::schema(format!(
                    "Only one indexing method is supported, found extra: {}",
                    extra
                )))
            }
        };

        let [column] = self.columns.as_slice() else {
            return Err(DbError::schema(
                "Only single column vector indexes are supported",
            ));
        };

        let column_type: VectorColumnType = column.declared_type.parse()?;

        Ok(VectorIndexInfo {
            name: self.name.clone(),
            table: self.table.clone(),
            column: column.name.clone(),
            element_type: column_type.element_type,
            dims: column_type.dims,
            strategy,
        })
    }
}

/// A validated vector index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorIndexInfo {
    pub name: String,
    pub table: String,
    pub column: String,
    pub element_type: ElementType,
    pub dims: usize,
    pub strategy: IndexStrategy,
}

impl VectorIndexInfo {
    /// Distance metric passed to the engine.
    pub fn metric(&self) -> DistanceMetric {
        self.strategy.metric()
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Create a vector index.
///
/// Validates `def`, creates the shadow table and asks `engine` to create
/// its index. Engine errors are returned unchanged.
pub fn create_vector_index<E: AnnEngine>(
    conn: &Connection,
    engine: &E,
    def: &IndexDefinition,
) -> DbResult<VectorIndexInfo> {
    let info = def.validate()?;
    debug!(
        "Creating vector index {} on {}({}) dims={}",
        info.name, info.table, info.column, info.dims
    );

    with_savepoint(conn, || {
        create_shadow_table(conn, &info.name)?;
        engine.create_index(&info.name, info.dims, info.metric())
    })?;

    info!("Created vector index {}", info.name);
    Ok(info)
}

/// Run `f` inside a savepoint, rolling back everything it wrote on error.
///
/// Savepoints nest, so this also works inside a caller's transaction.
fn with_savepoint<T>(conn: &Connection, f: impl FnOnce() -> DbResult<T>) -> DbResult<T> {
    conn.execute_batch("SAVEPOINT sqlvec_create_index")?;
    match f() {
        Ok(value) => {
            conn.execute_batch("RELEASE sqlvec_create_index")?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = conn.execute_batch(
                "ROLLBACK TO sqlvec_create_index; RELEASE sqlvec_create_index",
            ) {
                warn!("Failed to roll back index creation: {}", rollback);
            }
            Err(e)
        }
    }
}

/// Insert every existing row of the indexed table through `cursor`.
///
/// `NULL` values are skipped. Returns the number of rows inserted.
///
/// # Errors
///
/// Returns a schema error naming the rowid if a value is not a blob.
pub fn populate_index<E: AnnEngine>(
    conn: &Connection,
    cursor: &mut VectorIndexCursor<'_, E>,
    info: &VectorIndexInfo,
) -> DbResult<usize> {
    let mut stmt = conn.prepare(&format!(
        "SELECT rowid, {} FROM {}",
        quote_identifier(&info.column),
        quote_identifier(&info.table)
    ))?;
    let mut rows = stmt.query([])?;

    let mut inserted = 0;
    while let Some(row) = rows.next()? {
        let rowid: i64 = row.get(0)?;
        match row.get_ref(1)? {
            ValueRef::Null => continue,
            ValueRef::Blob(bytes) => {
                cursor.insert(&[SqlValue::Blob(bytes), SqlValue::Integer(rowid)])?;
                inserted += 1;
            }
            other => {
                return Err(DbError::schema(format!(
                    "row {} of {}: expected a vector blob in column {}, found {}",
                    rowid,
                    info.table,
                    info.column,
                    other.data_type()
                )))
            }
        }
    }

    debug!("Populated {} with {} rows", info.name, inserted);
    Ok(inserted)
}

// ============================================================================
// Tests
// ============================================================================
