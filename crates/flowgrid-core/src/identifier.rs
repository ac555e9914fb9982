//! Node identifiers.
//!
//! This module provides the [`NodeId`] type. Identifiers order
//! lexicographically by their text, which is the tie-break used everywhere a
//! deterministic node order is needed (root seeding, sibling columns).

use std::{borrow::Borrow, fmt};

/// Identifier of a flowchart node.
///
/// # Examples
///
/// ```
/// use flowgrid_core::identifier::NodeId;
///
/// let start = NodeId::new("Start");
/// let check = NodeId::new("D1");
///
/// assert_eq!(start, "Start");
/// assert!(check < start);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a `NodeId` from its textual name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the identifier starts with `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.0.starts_with(prefix)
    }
}

/// Returns `true` if `c` may appear in a node identifier.
///
/// Identifiers are made of Unicode alphanumerics and `_`.
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Returns `true` if `text` is a complete, non-empty identifier.
///
/// # Examples
///
/// ```
/// use flowgrid_core::identifier::is_identifier;
///
/// assert!(is_identifier("step_2"));
/// assert!(!is_identifier("step-2"));
/// assert!(!is_identifier(""));
/// ```
pub fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_identifier_char)
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut ids = vec![NodeId::new("b"), NodeId::new("B10"), NodeId::new("B2")];
        ids.sort();

        assert_eq!(ids, vec!["B10", "B2", "b"]);
    }

    #[test]
    fn test_has_prefix() {
        let id = NodeId::new("D1");

        assert!(id.has_prefix("D"));
        assert!(!id.has_prefix("X"));
        assert!(!id.has_prefix(""));
    }

    #[test]
    fn test_identifier_chars() {
        assert!(is_identifier("Étape_1"));
        assert!(!is_identifier("a b"));
        assert!(!is_identifier("[yes]"));
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeId::new("Start").to_string(), "Start");
    }
}
