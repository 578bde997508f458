//! Distance kernel.

use crate::error::{VectorError, VectorResult};
use crate::vector::Vector;

/// Cosine distance, `1 - a·b / (|a| |b|)`, in `[0, 2]`.
///
/// Both vectors must share element type and dimension; use
/// [`checked_cosine_distance`] when that has not been established yet.
/// If either vector has zero norm the distance is `1.0`.
pub fn cosine_distance(a: &Vector<'_>, b: &Vector<'_>) -> f32 {
    debug_assert_eq!(a.element_type(), b.element_type());
    debug_assert_eq!(a.dims(), b.dims());
    a.element_type()
        .kernel()
        .distance_cos(a.as_bytes(), b.as_bytes())
}

/// Cosine distance after validating that the operands are comparable.
///
/// # Errors
///
/// Returns [`VectorError::DimensionMismatch`] if the dimensions differ.
pub fn checked_cosine_distance(a: &Vector<'_>, b: &Vector<'_>) -> VectorResult<f32> {
    if a.element_type() != b.element_type() {
        return Err(VectorError::invalid_input(format!(
            "cannot compare {} with {}",
            a.element_type(),
            b.element_type()
        )));
    }
    if a.dims() != b.dims() {
        return Err(VectorError::DimensionMismatch {
            left: a.dims(),
            right: b.dims(),
        });
    }
    Ok(cosine_distance(a, b))
}
