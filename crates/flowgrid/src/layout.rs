//! Grid layout for flows.
//!
//! Layout runs in two stages. [`level`] assigns every node a hierarchical
//! level, then [`grid`] turns levels into integer positions using the cell
//! size carried by [`LayoutParameters`].
//!
//! # Pipeline Position
//!
//! ```text
//! Flow
//!     ↓ level
//! LevelMap
//!     ↓ grid (+ LayoutParameters)
//! PositionMap
//!     ↓ export
//! DiagramDocument
//! ```

pub mod grid;
pub mod level;

use std::fmt;

use flowgrid_core::geometry::Size;

pub use grid::{GridPlanner, PositionMap};
pub use level::{LevelMap, assign_levels};

/// Spacing values for one layout attempt.
///
/// Parameters are plain values: each attempt receives its own copy, and the
/// refinement loop derives the next attempt's copy with [`grown`](Self::grown).
///
/// # Examples
///
/// ```
/// # use flowgrid::layout::LayoutParameters;
/// # use flowgrid_core::geometry::Size;
/// let params = LayoutParameters::new(250, 120);
/// let next = params.grown(Size::new(40, 30));
///
/// assert_eq!(next.cell_width(), 290);
/// assert_eq!(next.cell_height(), 150);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParameters {
    cell: Size,
}

impl LayoutParameters {
    /// Creates parameters with the given cell size.
    pub fn new(cell_width: u32, cell_height: u32) -> Self {
        Self {
            cell: Size::new(cell_width, cell_height),
        }
    }

    /// Returns the horizontal distance between sibling columns.
    pub fn cell_width(self) -> u32 {
        self.cell.width()
    }

    /// Returns the vertical distance between level rows.
    pub fn cell_height(self) -> u32 {
        self.cell.height()
    }

    /// Returns the cell size.
    pub fn cell_size(self) -> Size {
        self.cell
    }

    /// Returns parameters with the cell enlarged by `step`.
    pub fn grown(self, step: Size) -> Self {
        Self {
            cell: self.cell.grow(step),
        }
    }
}

impl fmt::Display for LayoutParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell {}", self.cell)
    }
}

/// Levels and positions computed for one attempt.
#[derive(Debug, Clone)]
pub struct Layout {
    params: LayoutParameters,
    levels: LevelMap,
    positions: PositionMap,
}

impl Layout {
    /// Creates a layout from its computed parts.
    pub fn new(params: LayoutParameters, levels: LevelMap, positions: PositionMap) -> Self {
        Self {
            params,
            levels,
            positions,
        }
    }

    /// Returns the parameters this layout was computed with.
    pub fn params(&self) -> LayoutParameters {
        self.params
    }

    /// Returns the level of every node.
    pub fn levels(&self) -> &LevelMap {
        &self.levels
    }

    /// Returns the position of every node.
    pub fn positions(&self) -> &PositionMap {
        &self.positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grown_is_strictly_larger() {
        let params = LayoutParameters::new(250, 120);
        let step = Size::new(40, 30);

        let third = params.grown(step).grown(step);
        assert_eq!(third, LayoutParameters::new(330, 180));
        assert!(third.cell_width() > params.cell_width());
        assert!(third.cell_height() > params.cell_height());
    }

    #[test]
    fn test_display() {
        assert_eq!(LayoutParameters::new(290, 150).to_string(), "cell 290x150");
    }
}
