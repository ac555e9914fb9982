//! Command-line argument definitions for the Flowgrid CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, the refinement budget and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Flowgrid layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input flow file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output draw.io document
    #[arg(short, long, default_value = "out.drawio")]
    pub output: String,

    /// Path of the rendered PNG (overrides `render.image`)
    #[arg(long)]
    pub image: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Maximum number of render attempts (overrides `refine.max_attempts`)
    #[arg(long)]
    pub max_attempts: Option<usize>,

    /// Write the document once with the initial spacing and skip rendering
    #[arg(long)]
    pub emit_only: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Creates arguments for `input` with every option at its default.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: "out.drawio".to_string(),
            image: None,
            config: None,
            max_attempts: None,
            emit_only: false,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["flowgrid", "flow.txt"]);

        assert_eq!(args.input, "flow.txt");
        assert_eq!(args.output, "out.drawio");
        assert_eq!(args.max_attempts, None);
        assert!(!args.emit_only);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "flowgrid",
            "flow.txt",
            "-o",
            "build/flow.drawio",
            "--image",
            "build/flow.png",
            "--max-attempts",
            "3",
            "--emit-only",
        ]);

        assert_eq!(args.output, "build/flow.drawio");
        assert_eq!(args.image.as_deref(), Some("build/flow.png"));
        assert_eq!(args.max_attempts, Some(3));
        assert!(args.emit_only);
    }
}
