//! Export of laid-out flows.
//!
//! This is the last stage of one attempt: a [`Flow`](flowgrid_core::flow::Flow)
//! and its [`PositionMap`](crate::layout::PositionMap) become a
//! [`DiagramDocument`] that serializes to the draw.io `mxfile` format.
//!
//! # Pipeline Position
//!
//! ```text
//! Flow + PositionMap
//!     ↓ export (this module)
//! DiagramDocument
//!     ↓ to_xml
//! .drawio file
//! ```
//!
//! Documents are built fresh for every attempt and never modified afterward.

pub mod drawio;

mod xml;

pub use drawio::{
    Cell, Connector, ConnectorLabel, DiagramDocument, DrawioEmitter, ShapeStyle, Vertex,
};
