//! Scalar function adapters exposed to the host engine.
//!
//! | SQL | adapter | result |
//! |---|---|---|
//! | `vector(X)` | [`vector`] | blob |
//! | `vector_extract(X)` | [`vector_extract`] | text |
//! | `vector_distance_cos(X, Y)` | [`vector_distance_cos`] | real |
//!
//! Each argument may be a text literal or a blob. Text is parsed into a
//! scratch vector owned by the call; it is dropped on every return path.

use crate::codec::{parse_value, render, to_blob};
use crate::distance::checked_cosine_distance;
use crate::error::{VectorError, VectorResult};
use crate::value::SqlValue;
use crate::vector::ElementType;

/// The element type used by the SQL functions.
const FUNCTION_ELEMENT_TYPE: ElementType = ElementType::Float32;

// ============================================================================
// VectorFunction
// ============================================================================

/// The SQL functions provided by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorFunction {
    /// `vector(X)`: canonical binary encoding.
    Vector,
    /// `vector_extract(X)`: canonical text encoding.
    Extract,
    /// `vector_distance_cos(X, Y)`: cosine distance.
    DistanceCos,
}

impl VectorFunction {
    /// Every function, in registration order.
    pub const ALL: [VectorFunction; 3] = [
        VectorFunction::DistanceCos,
        VectorFunction::Vector,
        VectorFunction::Extract,
    ];

    /// SQL name.
    pub fn name(&self) -> &'static str {
        match self {
            VectorFunction::Vector => "vector",
            VectorFunction::Extract => "vector_extract",
            VectorFunction::DistanceCos => "vector_distance_cos",
        }
    }

    /// Number of arguments.
    pub fn arity(&self) -> usize {
        match self {
            VectorFunction::Vector | VectorFunction::Extract => 1,
            VectorFunction::DistanceCos => 2,
        }
    }

    /// Run the function over `args`.
    pub fn call(&self, args: &[SqlValue<'_>]) -> VectorResult<FunctionOutput> {
        match self {
            VectorFunction::Vector => vector(args).map(FunctionOutput::Blob),
            VectorFunction::Extract => vector_extract(args).map(FunctionOutput::Text),
            VectorFunction::DistanceCos => vector_distance_cos(args).map(FunctionOutput::Real),
        }
    }
}

/// Result value of a vector function.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionOutput {
    Blob(Vec<u8>),
    Text(String),
    Real(f64),
}

fn check_arity(function: VectorFunction, args: &[SqlValue<'_>]) -> VectorResult<()> {
    if args.len() < function.arity() {
        return Err(VectorError::Arity {
            function: function.name(),
            expected: function.arity(),
            actual: args.len(),
        });
    }
    Ok(())
}

// ============================================================================
// Adapters
// ============================================================================

/// `vector(X)`: parse `X` and return its binary encoding.
pub fn vector(args: &[SqlValue<'_>]) -> VectorResult<Vec<u8>> {
    check_arity(VectorFunction::Vector, args)?;
    let v = parse_value(args[0], FUNCTION_ELEMENT_TYPE)?;
    Ok(to_blob(&v))
}

/// `vector_extract(X)`: parse `X` and return its text encoding.
pub fn vector_extract(args: &[SqlValue<'_>]) -> VectorResult<String> {
    check_arity(VectorFunction::Extract, args)?;
    let v = parse_value(args[0], FUNCTION_ELEMENT_TYPE)?;
    Ok(render(&v))
}

/// `vector_distance_cos(X, Y)`: cosine distance between two vectors.
pub fn vector_distance_cos(args: &[SqlValue<'_>]) -> VectorResult<f64> {
    check_arity(VectorFunction::DistanceCos, args)?;
    let a = parse_value(args[0], FUNCTION_ELEMENT_TYPE)?;
    let b = parse_value(args[1], FUNCTION_ELEMENT_TYPE)?;
    checked_cosine_distance(&a, &b).map(f64::from)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_from_text() {
        let blob = vector(&[SqlValue::Text("[1,2,3]")]).unwrap();
        let expected: Vec<u8> = [1.0f32, 2.0, 3.0]
            .iter()
            .flat_map(|v| v.to_ne_bytes())
            .collect();
        assert_eq!(blob, expected);
    }

    #[test]
    fn test_vector_from_blob_is_identity() {
        let blob = vector(&[SqlValue::Text("[0.5,-4]")]).unwrap();
        assert_eq!(vector(&[SqlValue::Blob(&blob)]).unwrap(), blob);
    }

    #[test]
    fn test_extract_from_blob() {
        let blob = vector(&[SqlValue::Text("[1,2,3]")]).unwrap();
        assert_eq!(vector_extract(&[SqlValue::Blob(&blob)]).unwrap(), "[1,2,3]");
    }

    #[test]
    fn test_extract_from_text() {
        assert_eq!(
            vector_extract(&[SqlValue::Text("[1.5,2.25]")]).unwrap(),
            "[1.500000e+00,2.250000e+00]"
        );
    }

    #[test]
    fn test_parse_error_message_is_verbatim() {
        let err = vector(&[SqlValue::Text("[1,2")]).unwrap_err();
        assert_eq!(err.to_string(), "malformed vector, doesn't end with ']'");

        let err = vector_extract(&[SqlValue::Null]).unwrap_err();
        assert_eq!(err.to_string(), "invalid vector: NULL");
    }

    #[test]
    fn test_distance_mixed_inputs() {
        let blob = vector(&[SqlValue::Text("[1,0]")]).unwrap();
        let d = vector_distance_cos(&[SqlValue::Blob(&blob), SqlValue::Text("[0,1]")]).unwrap();
        assert!((d - 1.0).abs() < 1e-6);
        let d = vector_distance_cos(&[SqlValue::Text("[1,1]"), SqlValue::Text("[2,2]")]).unwrap();
        assert!(d.abs() < 1e-6);
    }

    #[test]
    fn test_distance_dimension_mismatch() {
        let err =
            vector_distance_cos(&[SqlValue::Text("[1,2]"), SqlValue::Text("[1,2,3]")]).unwrap_err();
        assert!(matches!(err, VectorError::DimensionMismatch { .. }));
        assert_eq!(err.to_string(), "vectors must have the same length");
    }

    #[test]
    fn test_distance_second_argument_error() {
        let err =
            vector_distance_cos(&[SqlValue::Text("[1,2]"), SqlValue::Integer(3)]).unwrap_err();
        assert_eq!(err.to_string(), "invalid vector: not a text or blob type");
    }

    #[test]
    fn test_arity() {
        let err = vector(&[]).unwrap_err();
        assert!(matches!(err, VectorError::Arity { expected: 1, actual: 0, .. }));

        let err = vector_distance_cos(&[SqlValue::Text("[1]")]).unwrap_err();
        assert!(matches!(err, VectorError::Arity { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_function_dispatch() {
        assert_eq!(VectorFunction::Extract.name(), "vector_extract");
        assert_eq!(VectorFunction::DistanceCos.arity(), 2);
        let out = VectorFunction::Extract
            .call(&[SqlValue::Text("[ 4 ]")])
            .unwrap();
        assert_eq!(out, FunctionOutput::Text("[4]".to_string()));
    }
}
