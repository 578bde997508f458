//! Conversions between text literals, binary blobs and [`Vector`] values.
//!
//! - [`parse_text`] / [`render`]: `[1,2.5,3]` literals
//! - [`parse_blob`] / [`serialize_to_blob`] / [`to_blob`]: raw element bytes
//! - [`parse_value`]: dispatch on the runtime type of a host value

mod blob;
mod text;

pub use blob::{parse_blob, serialize_to_blob, to_blob};
pub use text::{parse_text, MAX_TOKEN_LEN};

use crate::error::{VectorError, VectorResult};
use crate::value::SqlValue;
use crate::vector::{ElementType, Vector};

/// Parse a host value into a vector.
///
/// Blobs are borrowed, text literals are parsed into a fresh scratch
/// vector. Every other storage class is rejected.
pub fn parse_value<'a>(value: SqlValue<'a>, element_type: ElementType) -> VectorResult<Vector<'a>> {
    match value {
        SqlValue::Null => Err(VectorError::invalid_input("NULL")),
        SqlValue::Blob(bytes) => parse_blob(element_type, bytes),
        SqlValue::Text(text) => {
            let mut v = Vector::scratch(element_type)?;
            parse_text(text, &mut v)?;
            Ok(v)
        }
        SqlValue::Integer(_) | SqlValue::Real(_) => {
            Err(VectorError::invalid_input("not a text or blob type"))
        }
    }
}

/// Render a vector as a text literal.
///
/// Integral elements print as integers, all others in `%.6e` notation, with
/// no whitespace: `[1,2.500000e+00]`.
pub fn render(v: &Vector<'_>) -> String {
    let mut out = String::with_capacity(2 + v.dims() * 8);
    out.push('[');
    v.element_type().kernel().render_into(v.as_bytes(), &mut out);
    out.push(']');
    out
}

// ============================================================================
// Tests
// ============================================================================
