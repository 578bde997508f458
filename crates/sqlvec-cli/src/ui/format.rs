//! Formatting of SQL values for terminal output.

use rusqlite::types::ValueRef;
use std::fmt::Write;

/// Format a blob as an SQL hex literal: `X'0000803f'`.
pub fn format_blob(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 3);
    out.push_str("X'");
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out.push('\'');
    out
}

/// Format a column value for display.
///
/// Text that is not valid UTF-8 is shown lossily.
pub fn format_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(r) => r.to_string(),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Blob(bytes) => format_blob(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_blob() {
        assert_eq!(format_blob(&[]), "X''");
        assert_eq!(format_blob(&1.0f32.to_le_bytes()), "X'0000803f'");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(ValueRef::Null), "NULL");
        assert_eq!(format_value(ValueRef::Integer(-4)), "-4");
        assert_eq!(format_value(ValueRef::Real(0.5)), "0.5");
        assert_eq!(format_value(ValueRef::Text(b"[1,2]")), "[1,2]");
        assert_eq!(format_value(ValueRef::Blob(&[0xab])), "X'ab'");
    }
}
