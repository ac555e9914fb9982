//! Grid placement.
//!
//! Each level becomes one row and each node in a level one column. Columns
//! are ordered by identifier, so positions depend only on the level map and
//! the cell size:
//!
//! ```text
//! x = column * cell_width  + left_margin
//! y = level  * cell_height + top_margin
//! ```
//!
//! A node without a level gets a row of its own below the lowest occupied
//! row, at the left margin. Coordinates saturate instead of overflowing.

use std::collections::BTreeMap;

use log::debug;

use flowgrid_core::{flow::Flow, geometry::Point, identifier::NodeId};

use crate::layout::{LayoutParameters, LevelMap};

/// Position of every node, ordered by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionMap {
    positions: BTreeMap<NodeId, Point>,
}

impl PositionMap {
    /// Returns the top-left corner of the node's box.
    pub fn get(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    /// Returns `(id, position)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, Point)> {
        self.positions.iter().map(|(id, point)| (id, *point))
    }

    /// Returns the number of placed nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if no node is placed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Places leveled nodes on a fixed grid.
#[derive(Debug, Clone, Copy)]
pub struct GridPlanner {
    origin: Point,
}

impl GridPlanner {
    /// Creates a planner whose first cell starts at `origin`.
    pub fn new(origin: Point) -> Self {
        Self { origin }
    }

    /// Computes the position of every node in `flow`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flowgrid::layout::{GridPlanner, LayoutParameters, assign_levels};
    /// # use flowgrid_core::{flow::Flow, geometry::Point};
    /// let mut flow = Flow::default();
    /// flow.define_node("A", "Start");
    /// flow.add_edge("A", "B", None);
    ///
    /// let levels = assign_levels(&flow);
    /// let planner = GridPlanner::new(Point::new(60, 40));
    /// let positions = planner.plan(&flow, &levels, LayoutParameters::new(250, 120));
    ///
    /// assert_eq!(positions.get("A"), Some(Point::new(60, 40)));
    /// assert_eq!(positions.get("B"), Some(Point::new(60, 160)));
    /// ```
    pub fn plan(&self, flow: &Flow, levels: &LevelMap, params: LayoutParameters) -> PositionMap {
        let mut rows: BTreeMap<usize, Vec<&NodeId>> = BTreeMap::new();
        for (id, level) in levels.iter() {
            if flow.node(id.as_str()).is_some() {
                rows.entry(level).or_default().push(id);
            }
        }

        let mut positions = BTreeMap::new();
        for (level, ids) in &rows {
            // LevelMap iterates in identifier order, so each row is already sorted.
            for (column, id) in ids.iter().enumerate() {
                positions.insert((*id).clone(), self.cell(column, *level, params));
            }
        }

        let mut next_row = rows.keys().next_back().map_or(0, |lowest| lowest + 1);
        for id in flow.node_ids() {
            if levels.get(id.as_str()).is_none() {
                debug!(node = id.as_str(), row = next_row; "Node without level placed below grid");
                positions.insert(id.clone(), self.cell(0, next_row, params));
                next_row += 1;
            }
        }

        PositionMap { positions }
    }

    fn cell(&self, column: usize, row: usize, params: LayoutParameters) -> Point {
        let offset = |index: usize, step: u32, margin: u32| {
            u32::try_from(index)
                .unwrap_or(u32::MAX)
                .saturating_mul(step)
                .saturating_add(margin)
        };
        Point::new(
            offset(column, params.cell_width(), self.origin.x()),
            offset(row, params.cell_height(), self.origin.y()),
        )
    }
}
