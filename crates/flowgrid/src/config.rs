//! Configuration types for Flowgrid.
//!
//! All types implement [`serde::Deserialize`] and every field has a default,
//! so a configuration file only needs to name the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`ParseSettings`] - How records are classified.
//! - [`LayoutConfig`] - Grid cell size, margins and node box size.
//! - [`RefineConfig`] - Attempt budget and spacing growth per retry.
//! - [`RenderConfig`] - External renderer invocation and line scoring.
//!
//! # Example
//!
//! ```
//! # use flowgrid::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.refine().max_attempts(), 5);
//! assert_eq!(config.layout().initial_parameters().cell_width(), 250);
//! assert!(config.validate().is_ok());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use flowgrid_core::{
    flow::DEFAULT_DECISION_PREFIX,
    geometry::{Point, Size},
};
use flowgrid_parser::ParseConfig;

use crate::{FlowgridError, layout::LayoutParameters};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Parse configuration section.
    #[serde(default)]
    parse: ParseSettings,

    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Refinement loop configuration section.
    #[serde(default)]
    refine: RefineConfig,

    /// Renderer configuration section.
    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        parse: ParseSettings,
        layout: LayoutConfig,
        refine: RefineConfig,
        render: RenderConfig,
    ) -> Self {
        Self {
            parse,
            layout,
            refine,
            render,
        }
    }

    /// Returns the parse settings.
    pub fn parse(&self) -> &ParseSettings {
        &self.parse
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the refinement loop configuration.
    pub fn refine(&self) -> &RefineConfig {
        &self.refine
    }

    /// Returns the renderer configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Replaces the refinement loop configuration.
    pub fn with_refine(mut self, refine: RefineConfig) -> Self {
        self.refine = refine;
        self
    }

    /// Replaces the renderer configuration.
    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    /// Checks the values the layout and loop rely on.
    ///
    /// # Errors
    ///
    /// Returns [`FlowgridError::Config`] if the attempt budget is zero, a cell
    /// or node dimension is zero, a growth step is zero (retries must
    /// strictly widen the grid), or `render.max_lines` is zero.
    pub fn validate(&self) -> Result<(), FlowgridError> {
        if self.refine.max_attempts == 0 {
            return Err(FlowgridError::Config(
                "refine.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.layout.initial_parameters().cell_size().is_empty() {
            return Err(FlowgridError::Config(
                "layout.cell_width and layout.cell_height must be positive".to_string(),
            ));
        }
        if self.layout.node_size().is_empty() {
            return Err(FlowgridError::Config(
                "layout.node_width and layout.node_height must be positive".to_string(),
            ));
        }
        if self.refine.growth().is_empty() {
            return Err(FlowgridError::Config(
                "refine.width_step and refine.height_step must be positive".to_string(),
            ));
        }
        if self.render.max_lines == 0 {
            return Err(FlowgridError::Config(
                "render.max_lines must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for turning records into a flow.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParseSettings {
    /// Node ids starting with this prefix are decisions.
    decision_prefix: String,
}

impl Default for ParseSettings {
    fn default() -> Self {
        Self {
            decision_prefix: DEFAULT_DECISION_PREFIX.to_string(),
        }
    }
}

impl ParseSettings {
    /// Creates parse settings with the given decision prefix.
    pub fn new(decision_prefix: impl Into<String>) -> Self {
        Self {
            decision_prefix: decision_prefix.into(),
        }
    }

    /// Returns the decision prefix.
    pub fn decision_prefix(&self) -> &str {
        &self.decision_prefix
    }

    /// Returns the equivalent parser configuration.
    pub fn to_parse_config(&self) -> ParseConfig {
        ParseConfig::new(self.decision_prefix.as_str())
    }
}

/// Grid geometry.
///
/// Defaults: cell 250×120, left margin 60, top margin 40, node box 170×60.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    cell_width: u32,
    cell_height: u32,
    left_margin: u32,
    top_margin: u32,
    node_width: u32,
    node_height: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_width: 250,
            cell_height: 120,
            left_margin: 60,
            top_margin: 40,
            node_width: 170,
            node_height: 60,
        }
    }
}

impl LayoutConfig {
    /// Returns the cell size the first attempt uses.
    pub fn initial_parameters(&self) -> LayoutParameters {
        LayoutParameters::new(self.cell_width, self.cell_height)
    }

    /// Returns the top-left corner of the grid.
    pub fn origin(&self) -> Point {
        Point::new(self.left_margin, self.top_margin)
    }

    /// Returns the fixed size of every node box.
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    /// Sets the initial cell size.
    pub fn with_cell_size(mut self, cell_width: u32, cell_height: u32) -> Self {
        self.cell_width = cell_width;
        self.cell_height = cell_height;
        self
    }
}

/// Refinement loop budget and growth.
///
/// Defaults: 5 attempts, cell grows by 40×30 per retry.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    max_attempts: usize,
    width_step: u32,
    height_step: u32,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            width_step: 40,
            height_step: 30,
        }
    }
}

impl RefineConfig {
    /// Returns the maximum number of attempts (renderer invocations).
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Returns the cell growth applied before each retry.
    pub fn growth(&self) -> Size {
        Size::new(self.width_step, self.height_step)
    }

    /// Sets the maximum number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the per-retry growth.
    pub fn with_growth(mut self, width_step: u32, height_step: u32) -> Self {
        self.width_step = width_step;
        self.height_step = height_step;
        self
    }
}

/// External renderer and line scoring settings.
///
/// Defaults: program `drawio`, image `diagram.png`, no user data dir, and a
/// render is clean when fewer than 5 segments of at least 50px (gaps up to
/// 5px bridged) are detected above an edge threshold of 100.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    program: PathBuf,
    image: PathBuf,
    user_data_dir: Option<PathBuf>,
    max_lines: usize,
    min_line_length: u32,
    max_line_gap: u32,
    edge_threshold: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("drawio"),
            image: PathBuf::from("diagram.png"),
            user_data_dir: None,
            max_lines: 5,
            min_line_length: 50,
            max_line_gap: 5,
            edge_threshold: 100,
        }
    }
}

impl RenderConfig {
    /// Returns the renderer executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns the path the raster image is written to.
    pub fn image(&self) -> &Path {
        &self.image
    }

    /// Returns the renderer's user data directory, if configured.
    pub fn user_data_dir(&self) -> Option<&Path> {
        self.user_data_dir.as_deref()
    }

    /// Returns the segment count at which a render stops being clean.
    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Returns the minimum segment length in pixels.
    pub fn min_line_length(&self) -> u32 {
        self.min_line_length
    }

    /// Returns the largest gap in pixels bridged inside one segment.
    pub fn max_line_gap(&self) -> u32 {
        self.max_line_gap
    }

    /// Returns the gradient magnitude above which a pixel is an edge.
    pub fn edge_threshold(&self) -> u32 {
        self.edge_threshold
    }

    /// Sets the raster image path.
    pub fn with_image(mut self, image: impl Into<PathBuf>) -> Self {
        self.image = image.into();
        self
    }
}
