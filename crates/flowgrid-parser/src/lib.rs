//! # Flowgrid Parser
//!
//! Parser for the Flowgrid flow description format. Each non-blank,
//! non-comment line is one record:
//!
//! ```text
//! # comment
//! nodeId; description; [branchLabel ->] targetId; targetId; ...
//! ```
//!
//! ## Usage
//!
//! ```
//! # use flowgrid_parser::{parse, ParseConfig, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "
//!         A; Start; D1
//!         D1; Check; [yes] -> B; [no] -> A
//!         B; End;
//!     ";
//!
//!     let flow = parse(source, ParseConfig::default())?;
//!     assert_eq!(flow.node_count(), 3);
//!     assert_eq!(flow.edge_count(), 3);
//!     Ok(())
//! }
//! ```

pub mod error;

mod config;
mod edge;
mod record;
mod span;

pub use config::ParseConfig;
pub use span::Span;

use std::collections::HashMap;

use log::{debug, trace, warn};

use flowgrid_core::{
    flow::Flow,
    identifier::{NodeId, is_identifier},
};

use edge::EdgeFieldError;
use error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError};

const RECORD_HELP: &str = "records have the form `id; description; target; [label] -> target`";

/// Parse flow description text into a [`Flow`].
///
/// Parsing is a pure function of `source`: nodes appear in first-appearance
/// order and edges in input order, duplicates included. A target id that is
/// never defined by its own record becomes a node without a description.
///
/// # Errors
///
/// Returns a [`ParseError`] holding one diagnostic per malformed record or
/// field when the input contains any of:
/// - a record without a description ([`ErrorCode::E100`])
/// - a node id that is not an identifier ([`ErrorCode::E101`])
/// - an edge field outside the edge grammar ([`ErrorCode::E102`])
/// - an unterminated branch label ([`ErrorCode::E103`])
pub fn parse(source: &str, config: ParseConfig) -> Result<Flow, ParseError> {
    let mut flow = Flow::new(config.decision_prefix());
    let mut collector = DiagnosticCollector::new();
    let mut definitions: HashMap<NodeId, Span> = HashMap::new();

    for record in record::records(source) {
        let mut fields = record.fields.iter();
        let (Some(id_field), Some(description)) = (fields.next(), fields.next()) else {
            let name = record.fields.first().map_or("", |field| field.text);
            collector.emit(
                Diagnostic::error(format!("record `{name}` has no description"))
                    .with_code(ErrorCode::E100)
                    .with_label(record.span, "expected at least an id and a description")
                    .with_help(RECORD_HELP),
            );
            continue;
        };

        if !is_identifier(id_field.text) {
            collector.emit(
                Diagnostic::error(format!("invalid node identifier `{}`", id_field.text))
                    .with_code(ErrorCode::E101)
                    .with_label(id_field.span, "not an identifier")
                    .with_help("identifiers may only contain letters, digits and `_`"),
            );
            continue;
        }

        let id = NodeId::new(id_field.text);
        if let Some(first) = definitions.get(&id) {
            collector.emit(
                Diagnostic::warning(format!("node `{id}` is defined more than once"))
                    .with_code(ErrorCode::W100)
                    .with_label(id_field.span, "defined again here")
                    .with_secondary_label(*first, "first defined here")
                    .with_help("the later description is used"),
            );
        } else {
            definitions.insert(id.clone(), id_field.span);
        }
        flow.define_node(id.clone(), description.text);

        for field in fields {
            match edge::parse_edge_field(field.text) {
                Ok(edge) => {
                    flow.add_edge(id.clone(), edge.target, edge.label.map(str::to_string));
                }
                Err(EdgeFieldError::UnterminatedLabel) => collector.emit(
                    Diagnostic::error(format!("unterminated branch label in `{}`", field.text))
                        .with_code(ErrorCode::E103)
                        .with_label(field.span, "missing `]`"),
                ),
                Err(EdgeFieldError::Invalid) => collector.emit(
                    Diagnostic::error(format!("invalid edge `{}`", field.text))
                        .with_code(ErrorCode::E102)
                        .with_label(field.span, "expected `target` or `[label] -> target`")
                        .with_help(RECORD_HELP),
                ),
            }
        }
    }

    let warnings = collector.finish()?;
    for warning in &warnings {
        warn!(diagnostic:% = warning; "Flow accepted with warning");
    }

    debug!(
        nodes = flow.node_count(),
        edges = flow.edge_count();
        "Flow parsed"
    );
    trace!(flow:?; "Parsed flow");

    Ok(flow)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn parse_default(source: &str) -> Result<Flow, ParseError> {
        parse(source, ParseConfig::default())
    }

    fn codes(err: &ParseError) -> Vec<ErrorCode> {
        err.diagnostics().iter().filter_map(Diagnostic::code).collect()
    }

    #[test]
    fn test_two_node_flow() {
        let flow = parse_default("A;Start;B\nB;End;\n").unwrap();

        assert_eq!(flow.node_count(), 2);
        assert_eq!(flow.node("A").unwrap().description(), Some("Start"));
        assert_eq!(flow.node("B").unwrap().description(), Some("End"));

        let edges = flow.edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source(), "A");
        assert_eq!(edges[0].target(), "B");
        assert_eq!(edges[0].label(), None);
    }

    #[test]
    fn test_decision_with_labeled_edges() {
        let flow = parse_default("D1;Check;[yes]->A;[no]->B").unwrap();

        assert!(flow.node("D1").unwrap().kind().is_decision());
        let labels: Vec<_> = flow.edges().iter().map(|edge| edge.label()).collect();
        assert_eq!(labels, vec![Some("yes"), Some("no")]);
        assert!(flow.edges().iter().all(|edge| edge.source() == "D1"));
    }

    #[test]
    fn test_custom_decision_prefix() {
        let flow = parse("Q1;Ask;A\nD1;Plain;", ParseConfig::new("Q")).unwrap();

        assert!(flow.node("Q1").unwrap().kind().is_decision());
        assert!(!flow.node("D1").unwrap().kind().is_decision());
    }

    #[test]
    fn test_duplicate_edges_are_preserved() {
        let flow = parse_default("A;Start;B;B;[again]->B\nB;End").unwrap();

        assert_eq!(flow.edge_count(), 3);
    }

    #[test]
    fn test_comments_and_blank_lines_are_ignored() {
        let source = "# flow\n\nA; Start; B\n   # note\n\nB; End\n";
        let flow = parse_default(source).unwrap();

        assert_eq!(flow.node_count(), 2);
        assert_eq!(flow.edge_count(), 1);
    }

    #[test]
    fn test_undefined_target_is_tolerated() {
        let flow = parse_default("A;Start;Ghost").unwrap();

        let ghost = flow.node("Ghost").unwrap();
        assert!(ghost.is_implicit());
        assert_eq!(ghost.description(), None);
    }

    #[test]
    fn test_node_order_is_first_appearance() {
        let flow = parse_default("A;Start;C\nB;Middle;C\nC;End").unwrap();

        let ids: Vec<_> = flow.node_ids().map(NodeId::as_str).collect();
        assert_eq!(ids, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_redefinition_keeps_later_description() {
        let flow = parse_default("A;First\nA;Second").unwrap();

        assert_eq!(flow.node_count(), 1);
        assert_eq!(flow.node("A").unwrap().description(), Some("Second"));
    }

    #[test]
    fn test_missing_description_is_an_error() {
        let err = parse_default("A;Start;B\nB\n").unwrap_err();

        assert_eq!(codes(&err), vec![ErrorCode::E100]);
        let label = &err.diagnostics()[0].labels()[0];
        assert_eq!(label.span(), Span::new(10..11));
    }

    #[test]
    fn test_trailing_separator_only_is_missing_description() {
        let err = parse_default("B;").unwrap_err();

        assert_eq!(codes(&err), vec![ErrorCode::E100]);
    }

    #[test]
    fn test_invalid_node_identifier() {
        let err = parse_default("A-1;Start").unwrap_err();

        assert_eq!(codes(&err), vec![ErrorCode::E101]);
    }

    #[test]
    fn test_invalid_edges_are_all_reported() {
        let source = "D1;Check;[yes] A;[no -> B\nA;Start;-> C";
        let err = parse_default(source).unwrap_err();

        assert_eq!(
            codes(&err),
            vec![ErrorCode::E102, ErrorCode::E103, ErrorCode::E102]
        );
        let spans: Vec<_> = err
            .diagnostics()
            .iter()
            .map(|diag| diag.labels()[0].span().slice(source))
            .collect();
        assert_eq!(spans, vec!["[yes] A", "[no -> B", "-> C"]);
    }

    #[test]
    fn test_empty_input_is_an_empty_flow() {
        let flow = parse_default("\n# nothing here\n").unwrap();

        assert_eq!(flow.node_count(), 0);
        assert_eq!(flow.edge_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_edge_count_is_preserved(
            targets in prop::collection::vec((0usize..4, any::<bool>()), 0..12)
        ) {
            let fields: Vec<String> = targets
                .iter()
                .map(|(idx, labeled)| {
                    if *labeled {
                        format!("[b{idx}] -> N{idx}")
                    } else {
                        format!("N{idx}")
                    }
                })
                .collect();
            let source = format!("Root; Start; {}\n", fields.join("; "));

            let flow = parse_default(&source).unwrap();
            prop_assert_eq!(flow.edge_count(), targets.len());
            prop_assert_eq!(flow.node("Root").unwrap().description(), Some("Start"));
        }
    }
}
