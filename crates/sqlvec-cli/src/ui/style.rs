//! Message prefixes for CLI output.
//!
//! | Prefix | Meaning |
//! |--------|---------|
//! | `[ok]` | Success |
//! | `[err]` | Error |

/// Message severity for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// Operation completed
    Ok,
    /// Operation failed
    Err,
}

impl MessageType {
    /// Returns the prefix text for this message type.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Ok => "[ok]",
            Self::Err => "[err]",
        }
    }
}

/// Format a message with a type prefix.
pub fn message(msg_type: MessageType, text: &str) -> String {
    format!("{} {}", msg_type.prefix(), text)
}
