//! # CLI UI Module
//!
//! Output formatting for the sqlvec CLI.
//!
//! - `style`: message prefixes (`[ok]`, `[err]`)
//! - `format`: rendering of SQL values
//! - `table`: query result tables with comfy-table

pub mod format;
pub mod style;
pub mod table;

pub use style::MessageType;
