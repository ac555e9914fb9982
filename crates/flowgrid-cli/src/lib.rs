//! CLI logic for the Flowgrid layout tool.
//!
//! This module contains the core CLI logic: loading configuration, reading
//! the flow file, and either emitting a single document or running the
//! render-feedback loop.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::Path};

use log::info;

use flowgrid::{
    DiagramBuilder, FlowgridError,
    config::AppConfig,
    refine::RefineOutcome,
    render::{DrawioRenderer, Renderer},
};

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A render was judged clean.
    Clean,
    /// Every attempt was used without a clean render.
    Exhausted,
    /// The document was written without rendering.
    Emitted,
}

impl RunOutcome {
    /// Returns the process exit code for this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            RunOutcome::Clean | RunOutcome::Emitted => 0,
            RunOutcome::Exhausted => 2,
        }
    }
}

impl From<RefineOutcome> for RunOutcome {
    fn from(outcome: RefineOutcome) -> Self {
        match outcome {
            RefineOutcome::Clean => RunOutcome::Clean,
            RefineOutcome::Exhausted => RunOutcome::Exhausted,
        }
    }
}

/// Run the Flowgrid CLI application with the draw.io renderer.
///
/// # Errors
///
/// Returns `FlowgridError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - An unavailable renderer
pub fn run(args: &Args) -> Result<RunOutcome, FlowgridError> {
    let app_config = load_app_config(args)?;
    let mut renderer = DrawioRenderer::from_config(app_config.render());
    execute(args, app_config, &mut renderer)
}

/// Run the Flowgrid CLI application with a caller-provided renderer.
///
/// # Errors
///
/// Same as [`run`].
pub fn run_with_renderer<R: Renderer>(
    args: &Args,
    renderer: &mut R,
) -> Result<RunOutcome, FlowgridError> {
    let app_config = load_app_config(args)?;
    execute(args, app_config, renderer)
}

/// Loads configuration and applies command-line overrides.
fn load_app_config(args: &Args) -> Result<AppConfig, FlowgridError> {
    let mut app_config = config::load_config(args.config.as_ref())?;

    if let Some(max_attempts) = args.max_attempts {
        let refine = app_config.refine().clone().with_max_attempts(max_attempts);
        app_config = app_config.with_refine(refine);
    }
    if let Some(image) = &args.image {
        let render = app_config.render().clone().with_image(image);
        app_config = app_config.with_render(render);
    }

    app_config.validate()?;
    Ok(app_config)
}

fn execute<R: Renderer>(
    args: &Args,
    app_config: AppConfig,
    renderer: &mut R,
) -> Result<RunOutcome, FlowgridError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing flow"
    );

    let source = fs::read_to_string(&args.input)?;
    let builder = DiagramBuilder::new(app_config);
    let output = Path::new(&args.output);

    if args.emit_only {
        let params = builder.config().layout().initial_parameters();
        let document = builder.build_document(&source, params)?;
        fs::write(output, document.to_xml())?;
        info!(output_file = args.output; "Document written without rendering");
        return Ok(RunOutcome::Emitted);
    }

    let report = builder.refine(&source, renderer, output)?;
    info!(
        output_file = args.output,
        attempts = report.attempts(),
        cell:% = report.parameters().cell_size();
        "Refinement finished"
    );

    Ok(report.outcome().into())
}
