//! Flowgrid - Grid layout and render-feedback refinement for textual flowcharts.
//!
//! Parses the record-per-line flow format, places nodes on a level grid,
//! emits draw.io documents, and optionally re-renders with wider spacing
//! until an external renderer judges the drawing clean.

pub mod config;
pub mod export;
pub mod layout;
pub mod refine;
pub mod render;

mod error;
mod structure;

pub use flowgrid_core::{flow, geometry, identifier};

pub use error::FlowgridError;

use std::path::Path;

use log::{debug, info, trace};

use config::AppConfig;
use export::{DiagramDocument, DrawioEmitter};
use flow::Flow;
use layout::{GridPlanner, Layout, LayoutParameters};
use refine::RefineReport;
use render::Renderer;

/// Builder for turning flow text into draw.io documents.
///
/// # Examples
///
/// ```
/// use flowgrid::{DiagramBuilder, config::AppConfig};
///
/// let source = "A; Start; B\nB; End;";
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// let flow = builder.parse(source).expect("Failed to parse");
/// let layout = builder.layout(&flow, builder.config().layout().initial_parameters());
/// let document = builder.emit(&flow, &layout).expect("Failed to emit");
///
/// assert!(document.to_xml().contains("node-A"));
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse flow text into a [`Flow`].
    ///
    /// # Errors
    ///
    /// Returns [`FlowgridError::Parse`] with every diagnostic found.
    pub fn parse(&self, source: &str) -> Result<Flow, FlowgridError> {
        debug!("Parsing flow");

        let flow = flowgrid_parser::parse(source, self.config.parse().to_parse_config())
            .map_err(|err| FlowgridError::new_parse_error(err, source))?;

        trace!(flow:?; "Parsed flow");
        Ok(flow)
    }

    /// Compute levels and positions for `flow` with the given cell size.
    pub fn layout(&self, flow: &Flow, params: LayoutParameters) -> Layout {
        let levels = layout::assign_levels(flow);
        debug!(
            nodes = levels.len(),
            max_level = levels.max_level().unwrap_or(0);
            "Levels assigned"
        );

        let planner = GridPlanner::new(self.config.layout().origin());
        let positions = planner.plan(flow, &levels, params);
        debug!(cell:% = params.cell_size(); "Grid planned");

        Layout::new(params, levels, positions)
    }

    /// Emit the draw.io document for a laid-out flow.
    ///
    /// # Errors
    ///
    /// Returns [`FlowgridError::Layout`] if the layout does not cover every
    /// node of `flow`.
    pub fn emit(&self, flow: &Flow, layout: &Layout) -> Result<DiagramDocument, FlowgridError> {
        DrawioEmitter::new(self.config.layout().node_size()).emit(flow, layout.positions())
    }

    /// Run the whole single-attempt pipeline: parse, layout and emit.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`parse`](Self::parse) and [`emit`](Self::emit).
    pub fn build_document(
        &self,
        source: &str,
        params: LayoutParameters,
    ) -> Result<DiagramDocument, FlowgridError> {
        let flow = self.parse(source)?;
        let layout = self.layout(&flow, params);
        self.emit(&flow, &layout)
    }

    /// Refine the layout of `source` until `renderer` reports a clean render.
    ///
    /// Each attempt overwrites `document`. Running out of attempts is not an
    /// error: check [`RefineReport::outcome`].
    ///
    /// # Errors
    ///
    /// Returns [`FlowgridError::Config`] for an invalid configuration,
    /// [`FlowgridError::Parse`] for malformed input, [`FlowgridError::Io`] if
    /// the document cannot be written, and [`FlowgridError::Render`] if the
    /// renderer is unavailable.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowgrid::{DiagramBuilder, refine::RefineOutcome, render::ScriptedRenderer};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let document = dir.path().join("out.drawio");
    /// let mut renderer = ScriptedRenderer::from_verdicts([false, true]);
    ///
    /// let report = DiagramBuilder::default()
    ///     .refine("A; Start; B\nB; End;", &mut renderer, &document)
    ///     .expect("Failed to refine");
    ///
    /// assert_eq!(report.outcome(), RefineOutcome::Clean);
    /// assert_eq!(report.attempts(), 2);
    /// ```
    pub fn refine<R: Renderer>(
        &self,
        source: &str,
        renderer: &mut R,
        document: &Path,
    ) -> Result<RefineReport, FlowgridError> {
        info!(document:? = document; "Refining diagram");
        refine::run(self, source, renderer, document)
    }
}
