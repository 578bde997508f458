//! Text literal parser: `[1, 2.5, -3e2]`.

use crate::error::{VectorError, VectorResult};
use crate::vector::{Vector, MAX_DIMS};
use tracing::trace;

/// Longest accepted character run for a single element.
pub const MAX_TOKEN_LEN: usize = 1024;

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

fn is_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b',' || b == b']'
}

fn missing_close() -> VectorError {
    VectorError::syntax("malformed vector, doesn't end with ']'")
}

/// Parse a text literal into `out`, returning the number of elements.
///
/// `out` must be an owned vector with room for [`MAX_DIMS`] elements (see
/// [`Vector::scratch`]); on success it is shrunk to the parsed length. On
/// failure its contents are unspecified and it must not be used.
///
/// # Errors
///
/// - [`VectorError::ParseSyntax`] for a missing `[` or `]`, an element that
///   is not a finite number, or stray characters between elements
/// - [`VectorError::TokenTooLong`] if one element exceeds [`MAX_TOKEN_LEN`]
/// - [`VectorError::DimensionOverflow`] past [`MAX_DIMS`] elements
pub fn parse_text(input: &str, out: &mut Vector<'_>) -> VectorResult<usize> {
    debug_assert!(!out.is_borrowed(), "parse target must be an owned vector");
    let kernel = out.element_type().kernel();
    let size = kernel.size();
    let capacity = out.dims().min(MAX_DIMS);
    let bytes = input.as_bytes();

    let mut pos = skip_whitespace(bytes, 0);
    if bytes.get(pos) != Some(&b'[') {
        return Err(VectorError::syntax(
            "invalid vector: doesn't start with '['",
        ));
    }
    pos = skip_whitespace(bytes, pos + 1);

    let mut count = 0usize;
    if bytes.get(pos) == Some(&b']') {
        pos += 1;
    } else {
        let dst = out.bytes_mut();
        loop {
            if pos >= bytes.len() {
                return Err(missing_close());
            }

            let start = pos;
            while pos < bytes.len() && !is_delimiter(bytes[pos]) {
                pos += 1;
                if pos - start > MAX_TOKEN_LEN {
                    let end = start + MAX_TOKEN_LEN;
                    return Err(VectorError::TokenTooLong {
                        fragment: String::from_utf8_lossy(&bytes[start..end]).into_owned(),
                    });
                }
            }
            // Delimiters are ASCII, so both ends sit on char boundaries.
            let token = &input[start..pos];
            if token.is_empty() {
                return Err(VectorError::syntax(format!(
                    "invalid vector: expected a number at offset {}",
                    start
                )));
            }
            if count >= capacity {
                return Err(VectorError::DimensionOverflow { max: MAX_DIMS });
            }
            let slot = &mut dst[count * size..(count + 1) * size];
            if !kernel.parse_into(token, slot) {
                return Err(VectorError::syntax(format!("invalid number: {}", token)));
            }
            count += 1;

            pos = skip_whitespace(bytes, pos);
            match bytes.get(pos) {
                Some(b',') => pos = skip_whitespace(bytes, pos + 1),
                Some(b']') => {
                    pos += 1;
                    break;
                }
                None => return Err(missing_close()),
                Some(_) => {
                    return Err(VectorError::syntax(format!(
                        "invalid vector: unexpected character at offset {}",
                        pos
                    )))
                }
            }
        }
    }

    if skip_whitespace(bytes, pos) != bytes.len() {
        return Err(VectorError::syntax(
            "invalid vector: unexpected characters after ']'",
        ));
    }

    out.truncate(count);
    trace!(dims = count, "parsed vector literal");
    Ok(count)
}

// ============================================================================
// Tests
// ============================================================================
