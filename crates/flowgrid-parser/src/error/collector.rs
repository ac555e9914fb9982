//! Collector for accumulating diagnostics during a parse.

use crate::error::{Diagnostic, ParseError};

/// Accumulates diagnostics so one parse reports every malformed record
/// instead of stopping at the first.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.errors.push(diagnostic);
        } else {
            self.warnings.push(diagnostic);
        }
    }

    /// Finish collection.
    ///
    /// Returns `Err` with every error diagnostic if any error was emitted,
    /// otherwise the collected warnings.
    pub fn finish(self) -> Result<Vec<Diagnostic>, ParseError> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(ParseError::new(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_without_errors() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("repeated"));

        let warnings = collector.finish().unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_collector_with_errors_drops_warnings() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::error("first"));
        collector.emit(Diagnostic::warning("repeated"));
        collector.emit(Diagnostic::error("second"));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
        assert_eq!(err.diagnostics()[1].message(), "second");
    }
}
