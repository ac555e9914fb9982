//! Error and diagnostic system for the Flowgrid parser.
//!
//! The error system is built around the [`Diagnostic`] type: a single error
//! or warning with an optional [`ErrorCode`], labeled source spans, and help
//! text. Every problem found in one parse is collected and returned together
//! inside a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use flowgrid_parser::error::{Diagnostic, ErrorCode};
//! # use flowgrid_parser::Span;
//!
//! let diag = Diagnostic::error("record `A` has no description")
//!     .with_code(ErrorCode::E100)
//!     .with_label(Span::new(0..1), "expected `A; description`")
//!     .with_help("records have the form `id; description; target; ...`");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
