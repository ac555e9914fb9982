//! Parser for a single edge field.
//!
//! ```text
//! edge   := label? target
//! label  := '[' text ']' ws* '->' ws*
//! target := (alphanumeric | '_')+
//! ```
//!
//! The whole field must be consumed; trailing text is an error.

use winnow::{
    ModalResult, Parser as _,
    ascii::space0,
    combinator::{delimited, opt, terminated},
    token::{take_till, take_while},
};

use flowgrid_core::identifier::is_identifier_char;

/// A parsed edge field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EdgeField<'src> {
    /// Trimmed branch label; `None` when absent or blank.
    pub(crate) label: Option<&'src str>,
    pub(crate) target: &'src str,
}

/// Why an edge field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeFieldError {
    /// A `[` label is never closed.
    UnterminatedLabel,
    /// The field does not follow the edge grammar.
    Invalid,
}

/// Parse a node identifier
fn identifier<'src>(input: &mut &'src str) -> ModalResult<&'src str> {
    take_while(1.., is_identifier_char).parse_next(input)
}

/// Parse the `->` token with optional surrounding spaces
fn arrow(input: &mut &str) -> ModalResult<()> {
    (space0, "->", space0).void().parse_next(input)
}

/// Parse `[label] ->`, returning the raw label text
fn branch_label<'src>(input: &mut &'src str) -> ModalResult<&'src str> {
    terminated(delimited('[', take_till(0.., ']'), ']'), arrow).parse_next(input)
}

fn edge<'src>(input: &mut &'src str) -> ModalResult<EdgeField<'src>> {
    (opt(branch_label), identifier)
        .map(|(label, target)| EdgeField {
            label: label.map(str::trim).filter(|label| !label.is_empty()),
            target,
        })
        .parse_next(input)
}

/// Parse one trimmed edge field.
pub(crate) fn parse_edge_field(text: &str) -> Result<EdgeField<'_>, EdgeFieldError> {
    if text.starts_with('[') && !text.contains(']') {
        return Err(EdgeFieldError::UnterminatedLabel);
    }

    edge.parse(text).map_err(|_| EdgeFieldError::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_target() {
        let edge = parse_edge_field("B").unwrap();

        assert_eq!(edge.target, "B");
        assert_eq!(edge.label, None);
    }

    #[test]
    fn test_labeled_target() {
        let edge = parse_edge_field("[yes]->A").unwrap();

        assert_eq!(edge.target, "A");
        assert_eq!(edge.label, Some("yes"));
    }

    #[test]
    fn test_labeled_target_with_spaces() {
        let edge = parse_edge_field("[ not yet ]  ->  Retry_2").unwrap();

        assert_eq!(edge.target, "Retry_2");
        assert_eq!(edge.label, Some("not yet"));
    }

    #[test]
    fn test_blank_label_is_dropped() {
        let edge = parse_edge_field("[]->A").unwrap();

        assert_eq!(edge.label, None);
    }

    #[test]
    fn test_unterminated_label() {
        assert_eq!(
            parse_edge_field("[yes -> A"),
            Err(EdgeFieldError::UnterminatedLabel)
        );
    }

    #[test]
    fn test_invalid_fields() {
        for field in ["[yes] A", "[yes]->", "-> A", "A B", "A-B", "yes] -> A"] {
            assert_eq!(
                parse_edge_field(field),
                Err(EdgeFieldError::Invalid),
                "field `{field}` should be rejected"
            );
        }
    }
}
