//! Geometric primitives for grid layout.
//!
//! Flowgrid places nodes on an integer grid, so coordinates and sizes are
//! unsigned integers.
//!
//! # Coordinate System
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! The origin is the top-left corner; Y grows downward, matching the diagram
//! document's coordinate space.

use std::fmt;

/// A 2D point on the layout grid.
///
/// # Examples
///
/// ```
/// # use flowgrid_core::geometry::Point;
/// let p = Point::new(60, 40);
/// assert_eq!(p.x(), 60);
/// assert_eq!(p.y(), 40);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    x: u32,
    y: u32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> u32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> u32 {
        self.y
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    width: u32,
    height: u32,
}

impl Size {
    /// Creates a new size
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the width
    pub fn width(self) -> u32 {
        self.width
    }

    /// Returns the height
    pub fn height(self) -> u32 {
        self.height
    }

    /// Returns a size grown by `step` in both dimensions, saturating on overflow.
    pub fn grow(self, step: Size) -> Self {
        Self {
            width: self.width.saturating_add(step.width),
            height: self.height.saturating_add(step.height),
        }
    }

    /// Returns `true` if either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
