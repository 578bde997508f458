//! # sqlvec-core
//!
//! Vector value, codec and distance kernel for the sqlvec SQL extension.
//!
//! This crate has no database dependency. It defines what a vector is, how it
//! is written as text (`[1,2,3]`) and as a blob (raw native-order elements),
//! how two vectors are compared, and the three scalar functions a host
//! engine exposes. `sqlvec-db` binds all of this to SQLite.
//!
//! ## Modules
//!
//! - [`vector`]: [`Vector`], [`ElementType`], [`MAX_DIMS`]
//! - [`codec`]: text/blob parsing and rendering
//! - [`distance`]: cosine distance
//! - [`function`]: `vector`, `vector_extract`, `vector_distance_cos`
//! - [`value`]: [`SqlValue`], the borrowed host value
//! - [`error`]: [`VectorError`]
//!
//! ## Example
//!
//! ```
//! use sqlvec_core::{function, SqlValue};
//!
//! let blob = function::vector(&[SqlValue::Text("[1, 2, 3]")]).unwrap();
//! let text = function::vector_extract(&[SqlValue::Blob(&blob)]).unwrap();
//! assert_eq!(text, "[1,2,3]");
//! ```

pub mod codec;
pub mod distance;
pub mod error;
pub mod function;
pub mod value;
pub mod vector;

pub use distance::{checked_cosine_distance, cosine_distance};
pub use error::{VectorError, VectorResult};
pub use function::{FunctionOutput, VectorFunction};
pub use value::SqlValue;
pub use vector::{ElementType, OwnedVector, Vector, MAX_DIMS};
