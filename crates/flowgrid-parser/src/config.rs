//! Parser configuration.

use flowgrid_core::flow::DEFAULT_DECISION_PREFIX;

/// Settings that influence how records become a [`Flow`](flowgrid_core::flow::Flow).
#[derive(Debug, Clone)]
pub struct ParseConfig {
    decision_prefix: String,
}

impl ParseConfig {
    /// Creates a config that marks ids starting with `decision_prefix` as decisions.
    pub fn new(decision_prefix: impl Into<String>) -> Self {
        Self {
            decision_prefix: decision_prefix.into(),
        }
    }

    /// Returns the decision prefix.
    pub fn decision_prefix(&self) -> &str {
        &self.decision_prefix
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DECISION_PREFIX)
    }
}
