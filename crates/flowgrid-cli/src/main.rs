//! Flowgrid CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info, warn};

use flowgrid_cli::{Args, RunOutcome, error_adapter::to_reportables};

/// Exit code when the renderer cannot be started.
const EXIT_RENDERER_UNAVAILABLE: i32 = 3;

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Flowgrid");
    debug!(args:?; "Parsed arguments");

    match flowgrid_cli::run(&args) {
        Ok(outcome) => {
            match outcome {
                RunOutcome::Clean | RunOutcome::Emitted => info!("Completed successfully"),
                RunOutcome::Exhausted => warn!("Completed without a clean render"),
            }
            process::exit(outcome.exit_code());
        }
        Err(err) => {
            let reporter = miette::GraphicalReportHandler::new();

            // Render each diagnostic independently
            for reportable in to_reportables(&err) {
                let mut writer = String::new();
                reporter
                    .render_report(&mut writer, &reportable)
                    .expect("Writing to String buffer is infallible");

                error!("{writer}");
            }

            let code = if err.is_renderer_unavailable() {
                EXIT_RENDERER_UNAVAILABLE
            } else {
                1
            };
            process::exit(code);
        }
    }
}
