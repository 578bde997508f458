//! # sqlvec-db
//!
//! SQLite binding for the sqlvec vector extension.
//!
//! `sqlvec-core` knows nothing about databases. This crate connects it to
//! SQLite through `rusqlite`:
//!
//! ```text
//! sqlvec-cli → sqlvec-db → sqlvec-core
//!                  │
//!                  └─ rusqlite (functions, shadow tables, flat engine)
//! ```
//!
//! ## Modules
//!
//! - `functions`: registers `vector`, `vector_extract`, `vector_distance_cos`
//! - `index`: index definitions, creation, cursors, backfill
//! - `engine`: the [`AnnEngine`] contract and the linear-scan [`FlatEngine`]
//! - `shadow`: `<index>_shadow` tables
//! - `config`: [`SqlvecConfig`]
//!
//! ## Usage
//!
//! ```
//! use rusqlite::Connection;
//! use sqlvec_db::{register_vector_functions, FlatEngine, IndexDefinition, VectorIndexCursor};
//!
//! let conn = Connection::open_in_memory()?;
//! register_vector_functions(&conn)?;
//! conn.execute_batch("CREATE TABLE docs (embedding FLOAT32(2))")?;
//!
//! let engine = FlatEngine::new(&conn)?;
//! let def = IndexDefinition::from_table(&conn, "docs_idx", "docs", &["embedding"], &["diskann_cosine_ops"])?;
//! sqlvec_db::create_vector_index(&conn, &engine, &def)?;
//!
//! let cursor = VectorIndexCursor::open(&engine, "docs_idx")?;
//! cursor.close();
//! # Ok::<(), sqlvec_db::DbError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod functions;
pub mod index;
pub mod shadow;

pub use config::SqlvecConfig;
pub use engine::{AnnEngine, DistanceMetric, FlatEngine, FlatIndex, IndexMeta};
pub use error::{DbError, DbResult};
pub use functions::register_vector_functions;
pub use index::{
    create_vector_index, parse_vector_dims, populate_index, IndexDefinition, IndexStrategy,
    VectorColumnType, VectorIndexCursor, VectorIndexInfo,
};
pub use shadow::{create_shadow_table, shadow_table_name};
