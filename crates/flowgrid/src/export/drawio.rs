//! draw.io document model and emitter.
//!
//! A [`DiagramDocument`] is a flat list of [`Cell`]s in the order they are
//! serialized: one vertex per node in node order, then one connector per
//! edge in edge order, each labeled connector followed by its label cell.
//! Serialization wraps the cells in the fixed `mxfile > diagram >
//! mxGraphModel > root` skeleton together with the root cell `0` and the
//! default layer `1`.

use log::{debug, trace};

use flowgrid_core::{
    flow::{Flow, NodeKind},
    geometry::{Point, Size},
};

use crate::{
    FlowgridError,
    export::xml::{XmlWriter, escape_html},
    layout::PositionMap,
};

const DIAGRAM_NAME: &str = "Flow";
const ROOT_CELL: &str = "0";
const LAYER_CELL: &str = "1";
const CONNECTOR_STYLE: &str = "orthogonalEdgeStyle;endArrow=block;html=1;";
const LABEL_STYLE: &str = "edgeLabel;html=1;";
// Relative to the connector: halfway along it, pushed away from the line.
const LABEL_OFFSET: (&str, &str) = ("0.5", "-0.7");

/// Shape drawn for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeStyle {
    /// Rounded rectangle for process steps.
    Rounded,
    /// Diamond for decisions.
    Rhombus,
}

impl ShapeStyle {
    /// Returns the draw.io style string.
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeStyle::Rounded => "rounded=1;whiteSpace=wrap;html=1;",
            ShapeStyle::Rhombus => "rhombus;whiteSpace=wrap;html=1;",
        }
    }
}

impl From<NodeKind> for ShapeStyle {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Process => ShapeStyle::Rounded,
            NodeKind::Decision => ShapeStyle::Rhombus,
        }
    }
}

/// A node box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    id: String,
    value: String,
    style: ShapeStyle,
    position: Point,
    size: Size,
}

impl Vertex {
    /// Returns the cell id, `node-{id}`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the displayed text, unescaped.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the shape style.
    pub fn style(&self) -> ShapeStyle {
        self.style
    }

    /// Returns the top-left corner of the box.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Returns the box size.
    pub fn size(&self) -> Size {
        self.size
    }
}

/// An arrow between two vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    id: String,
    source: String,
    target: String,
}

impl Connector {
    /// Returns the cell id, `edge-{n}`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the id of the source vertex cell.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the id of the target vertex cell.
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// A branch label attached to a connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorLabel {
    id: String,
    connector: String,
    value: String,
}

impl ConnectorLabel {
    /// Returns the cell id, `edge-{n}-label`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the id of the connector cell this label belongs to.
    pub fn connector(&self) -> &str {
        &self.connector
    }

    /// Returns the branch label text, unescaped.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// One cell of a diagram document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Vertex(Vertex),
    Connector(Connector),
    Label(ConnectorLabel),
}

/// A complete draw.io diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramDocument {
    cells: Vec<Cell>,
}

impl DiagramDocument {
    /// Returns all cells in serialization order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns all vertices in node order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.cells.iter().filter_map(|cell| match cell {
            Cell::Vertex(vertex) => Some(vertex),
            _ => None,
        })
    }

    /// Returns all connectors in edge order.
    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.cells.iter().filter_map(|cell| match cell {
            Cell::Connector(connector) => Some(connector),
            _ => None,
        })
    }

    /// Returns all connector labels in edge order.
    pub fn labels(&self) -> impl Iterator<Item = &ConnectorLabel> {
        self.cells.iter().filter_map(|cell| match cell {
            Cell::Label(label) => Some(label),
            _ => None,
        })
    }

    /// Returns the vertex drawn for the node with the given identifier.
    pub fn vertex(&self, node: &str) -> Option<&Vertex> {
        let id = vertex_cell_id(node);
        self.vertices().find(|vertex| vertex.id == id)
    }

    /// Serializes the document as pretty-printed `mxfile` XML.
    ///
    /// The output is a pure function of the document.
    pub fn to_xml(&self) -> String {
        let mut xml = XmlWriter::new();
        xml.open("mxfile", &[("host", "flowgrid")]);
        xml.open("diagram", &[("name", DIAGRAM_NAME)]);
        xml.open("mxGraphModel", &[]);
        xml.open("root", &[]);
        xml.empty("mxCell", &[("id", ROOT_CELL)]);
        xml.empty("mxCell", &[("id", LAYER_CELL), ("parent", ROOT_CELL)]);

        for cell in &self.cells {
            write_cell(&mut xml, cell);
        }

        xml.close("root");
        xml.close("mxGraphModel");
        xml.close("diagram");
        xml.close("mxfile");
        xml.finish()
    }
}

fn write_cell(xml: &mut XmlWriter, cell: &Cell) {
    match cell {
        Cell::Vertex(vertex) => {
            let value = escape_html(&vertex.value);
            xml.open(
                "mxCell",
                &[
                    ("id", vertex.id.as_str()),
                    ("value", value.as_str()),
                    ("style", vertex.style.as_str()),
                    ("vertex", "1"),
                    ("parent", LAYER_CELL),
                ],
            );
            let x = vertex.position.x().to_string();
            let y = vertex.position.y().to_string();
            let width = vertex.size.width().to_string();
            let height = vertex.size.height().to_string();
            xml.empty(
                "mxGeometry",
                &[
                    ("x", x.as_str()),
                    ("y", y.as_str()),
                    ("width", width.as_str()),
                    ("height", height.as_str()),
                    ("as", "geometry"),
                ],
            );
        }
        Cell::Connector(connector) => {
            xml.open(
                "mxCell",
                &[
                    ("id", connector.id.as_str()),
                    ("style", CONNECTOR_STYLE),
                    ("edge", "1"),
                    ("parent", LAYER_CELL),
                    ("source", connector.source.as_str()),
                    ("target", connector.target.as_str()),
                ],
            );
            xml.empty("mxGeometry", &[("relative", "1"), ("as", "geometry")]);
        }
        Cell::Label(label) => {
            let value = escape_html(&label.value);
            xml.open(
                "mxCell",
                &[
                    ("id", label.id.as_str()),
                    ("value", value.as_str()),
                    ("style", LABEL_STYLE),
                    ("vertex", "1"),
                    ("connectable", "0"),
                    ("parent", label.connector.as_str()),
                ],
            );
            xml.empty(
                "mxGeometry",
                &[
                    ("x", LABEL_OFFSET.0),
                    ("y", LABEL_OFFSET.1),
                    ("relative", "1"),
                    ("as", "geometry"),
                ],
            );
        }
    }
    xml.close("mxCell");
}

/// Returns the cell id of the vertex drawn for `node`.
///
/// `-` never occurs in a node identifier, so these ids cannot collide with
/// the root cells or with connector ids.
pub fn vertex_cell_id(node: &str) -> String {
    format!("node-{node}")
}

fn connector_cell_id(ordinal: usize) -> String {
    format!("edge-{ordinal}")
}

/// Builds [`DiagramDocument`]s from positioned flows.
#[derive(Debug, Clone, Copy)]
pub struct DrawioEmitter {
    node_size: Size,
}

impl DrawioEmitter {
    /// Creates an emitter that draws every node with the given box size.
    pub fn new(node_size: Size) -> Self {
        Self { node_size }
    }

    /// Emits the document for `flow` placed at `positions`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowgridError::Layout`] if a node has no position.
    pub fn emit(
        &self,
        flow: &Flow,
        positions: &PositionMap,
    ) -> Result<DiagramDocument, FlowgridError> {
        let mut cells = Vec::with_capacity(flow.node_count() + 2 * flow.edge_count());

        for node in flow.nodes() {
            let position = positions.get(node.id().as_str()).ok_or_else(|| {
                FlowgridError::Layout(format!("node `{}` has no position", node.id()))
            })?;
            cells.push(Cell::Vertex(Vertex {
                id: vertex_cell_id(node.id().as_str()),
                value: node.display_label().to_string(),
                style: node.kind().into(),
                position,
                size: self.node_size,
            }));
        }

        for (ordinal, edge) in (1..).zip(flow.edges()) {
            let id = connector_cell_id(ordinal);
            cells.push(Cell::Connector(Connector {
                id: id.clone(),
                source: vertex_cell_id(edge.source().as_str()),
                target: vertex_cell_id(edge.target().as_str()),
            }));

            if let Some(label) = edge.label().filter(|label| !label.is_empty()) {
                cells.push(Cell::Label(ConnectorLabel {
                    id: format!("{id}-label"),
                    connector: id,
                    value: label.to_string(),
                }));
            }
        }

        let document = DiagramDocument { cells };
        debug!(
            vertices = document.vertices().count(),
            connectors = document.connectors().count(),
            labels = document.labels().count();
            "Diagram document emitted"
        );
        trace!(document:?; "Emitted document");
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{GridPlanner, LayoutParameters, assign_levels};

    fn emit(flow: &Flow) -> DiagramDocument {
        let levels = assign_levels(flow);
        let positions = GridPlanner::new(Point::new(60, 40)).plan(
            flow,
            &levels,
            LayoutParameters::new(250, 120),
        );
        DrawioEmitter::new(Size::new(170, 60))
            .emit(flow, &positions)
            .unwrap()
    }

    fn decision_flow() -> Flow {
        let mut flow = Flow::default();
        flow.define_node("D1", "Check");
        flow.add_edge("D1", "A", Some("yes".to_string()));
        flow.add_edge("D1", "B", Some("no".to_string()));
        flow
    }

    #[test]
    fn test_decision_is_a_rhombus_with_labeled_edges() {
        let document = emit(&decision_flow());

        let check = document.vertex("D1").unwrap();
        assert_eq!(check.style(), ShapeStyle::Rhombus);
        assert_eq!(check.value(), "Check");
        assert_eq!(document.vertex("A").unwrap().style(), ShapeStyle::Rounded);

        let labels: Vec<_> = document.labels().map(ConnectorLabel::value).collect();
        assert_eq!(labels, vec!["yes", "no"]);

        let connectors: Vec<_> = document
            .connectors()
            .map(|c| (c.id(), c.source(), c.target()))
            .collect();
        assert_eq!(
            connectors,
            vec![
                ("edge-1", "node-D1", "node-A"),
                ("edge-2", "node-D1", "node-B")
            ]
        );
    }

    #[test]
    fn test_cell_order() {
        let document = emit(&decision_flow());

        let ids: Vec<&str> = document
            .cells()
            .iter()
            .map(|cell| match cell {
                Cell::Vertex(vertex) => vertex.id(),
                Cell::Connector(connector) => connector.id(),
                Cell::Label(label) => label.id(),
            })
            .collect();
        assert_eq!(
            ids,
            vec![
                "node-D1",
                "node-A",
                "node-B",
                "edge-1",
                "edge-1-label",
                "edge-2",
                "edge-2-label"
            ]
        );
    }

    #[test]
    fn test_implicit_node_shows_identifier() {
        let mut flow = Flow::default();
        flow.define_node("A", "Start");
        flow.add_edge("A", "Ghost", None);

        let document = emit(&flow);
        assert_eq!(document.vertex("Ghost").unwrap().value(), "Ghost");
        assert_eq!(document.labels().count(), 0);
    }

    #[test]
    fn test_duplicate_edges_become_duplicate_connectors() {
        let mut flow = Flow::default();
        flow.add_edge("A", "B", None);
        flow.add_edge("A", "B", None);

        assert_eq!(emit(&flow).connectors().count(), 2);
    }

    #[test]
    fn test_missing_position_is_a_layout_error() {
        let mut flow = Flow::default();
        flow.define_node("A", "Start");

        let err = DrawioEmitter::new(Size::new(170, 60))
            .emit(&flow, &PositionMap::default())
            .unwrap_err();
        assert!(matches!(err, FlowgridError::Layout(_)));
    }

    #[test]
    fn test_xml_structure() {
        let mut flow = Flow::default();
        flow.define_node("A", "Start");
        flow.define_node("B", "End");
        flow.add_edge("A", "B", None);

        let xml = emit(&flow).to_xml();
        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<mxfile host="flowgrid">
  <diagram name="Flow">
    <mxGraphModel>
      <root>
        <mxCell id="0"/>
        <mxCell id="1" parent="0"/>
        <mxCell id="node-A" value="Start" style="rounded=1;whiteSpace=wrap;html=1;" vertex="1" parent="1">
          <mxGeometry x="60" y="40" width="170" height="60" as="geometry"/>
        </mxCell>
        <mxCell id="node-B" value="End" style="rounded=1;whiteSpace=wrap;html=1;" vertex="1" parent="1">
          <mxGeometry x="60" y="160" width="170" height="60" as="geometry"/>
        </mxCell>
        <mxCell id="edge-1" style="orthogonalEdgeStyle;endArrow=block;html=1;" edge="1" parent="1" source="node-A" target="node-B">
          <mxGeometry relative="1" as="geometry"/>
        </mxCell>
      </root>
    </mxGraphModel>
  </diagram>
</mxfile>
"#;
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_xml_is_well_formed() {
        let mut flow = decision_flow();
        flow.define_node("A", "Tom & \"Jerry\" <cartoon>");

        let xml = emit(&flow).to_xml();
        let parsed = roxmltree::Document::parse(&xml).unwrap();

        let root = parsed.root_element();
        assert_eq!(root.tag_name().name(), "mxfile");
        let value = parsed
            .descendants()
            .find(|n| n.attribute("id") == Some("node-A"))
            .and_then(|n| n.attribute("value"));
        // Values are markup in draw.io, so the text arrives HTML-escaped.
        assert_eq!(value, Some("Tom &amp; \"Jerry\" &lt;cartoon&gt;"));

        let label = parsed
            .descendants()
            .find(|n| n.attribute("id") == Some("edge-2-label"))
            .unwrap();
        assert_eq!(label.attribute("parent"), Some("edge-2"));
        assert_eq!(label.attribute("connectable"), Some("0"));
    }

    #[test]
    fn test_xml_is_byte_identical_across_runs() {
        let flow = decision_flow();

        assert_eq!(emit(&flow).to_xml(), emit(&flow).to_xml());
    }
}
