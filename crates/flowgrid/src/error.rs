//! Error types for Flowgrid operations.
//!
//! [`FlowgridError`] wraps every failure that stops the pipeline. Outcomes
//! that are not failures, such as a refinement loop that ran out of attempts,
//! are reported through [`RefineOutcome`](crate::refine::RefineOutcome)
//! instead.

use std::io;

use thiserror::Error;

use flowgrid_parser::error::ParseError;

use crate::render::RenderError;

/// The main error type for Flowgrid operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the diagnostics so
/// callers can render snippets for every malformed record.
#[derive(Debug, Error)]
pub enum FlowgridError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl FlowgridError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }

    /// Returns `true` if the renderer could not be invoked at all.
    pub fn is_renderer_unavailable(&self) -> bool {
        matches!(self, Self::Render(err) if err.is_unavailable())
    }
}
