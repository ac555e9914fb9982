//! Error codes for the Flowgrid diagnostic system.
//!
//! - `E1xx` - Record structure errors
//! - `W1xx` - Record warnings

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Missing description.
    ///
    /// A record has a node id but no description field.
    E100,

    /// Invalid node identifier.
    ///
    /// The first field of a record contains characters other than
    /// alphanumerics and `_`.
    E101,

    /// Invalid edge.
    ///
    /// An edge field is neither `target` nor `[label] -> target`.
    E102,

    /// Unterminated branch label.
    ///
    /// An edge field opens a `[` label that is never closed.
    E103,

    /// Duplicate record.
    ///
    /// The same node id is defined by more than one record; the later
    /// description wins.
    W100,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::W100 => "W100",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
