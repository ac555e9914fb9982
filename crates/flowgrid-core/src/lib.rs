//! Flowgrid Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Flowgrid parser
//! and layout pipeline. It includes:
//!
//! - **Identifiers**: Node identifiers with lexicographic ordering ([`identifier::NodeId`])
//! - **Flow**: The parsed flowchart model of nodes and edges ([`flow`] module)
//! - **Geometry**: Integer grid coordinates and sizes ([`geometry`] module)

pub mod flow;
pub mod geometry;
pub mod identifier;
