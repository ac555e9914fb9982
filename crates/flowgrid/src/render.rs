//! Rendering and scoring of emitted documents.
//!
//! A [`Renderer`] turns a written document into a [`Verdict`]: is the drawing
//! clean enough to stop refining? The loop in [`crate::refine`] only depends
//! on this trait.
//!
//! # Implementations
//!
//! - [`DrawioRenderer`] - Rasterizes with the draw.io desktop CLI and scores
//!   the PNG with a [`LineScorer`].
//! - [`ScriptedRenderer`] - Replays a fixed sequence of results.

mod drawio;
mod score;
mod scripted;

pub use drawio::DrawioRenderer;
pub use score::LineScorer;
pub use scripted::ScriptedRenderer;

use std::{
    io,
    path::{Path, PathBuf},
    process::ExitStatus,
};

use thiserror::Error;

/// Capability to render a document and judge the result.
pub trait Renderer {
    /// Renders the document at `document` and scores it.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Unavailable`] if the rendering tool cannot be
    /// started at all, and [`RenderError::Failed`] or
    /// [`RenderError::UnreadableImage`] if this particular render failed.
    fn render(&mut self, document: &Path) -> Result<Verdict, RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn render(&mut self, document: &Path) -> Result<Verdict, RenderError> {
        (**self).render(document)
    }
}

/// Outcome of scoring one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    clean: bool,
    line_segments: Option<usize>,
}

impl Verdict {
    /// A clean verdict without a segment count.
    pub fn clean() -> Self {
        Self {
            clean: true,
            line_segments: None,
        }
    }

    /// A verdict that asks for another attempt, without a segment count.
    pub fn not_clean() -> Self {
        Self {
            clean: false,
            line_segments: None,
        }
    }

    /// Judges a segment count: clean when `count` is below `max_lines`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flowgrid::render::Verdict;
    /// assert!(Verdict::from_line_count(4, 5).is_clean());
    /// assert!(!Verdict::from_line_count(5, 5).is_clean());
    /// ```
    pub fn from_line_count(count: usize, max_lines: usize) -> Self {
        Self {
            clean: count < max_lines,
            line_segments: Some(count),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.clean
    }

    /// Returns the number of detected line segments, when known.
    pub fn line_segments(&self) -> Option<usize> {
        self.line_segments
    }
}

/// Errors produced by a [`Renderer`].
#[derive(Debug, Error)]
pub enum RenderError {
    /// The rendering tool could not be started.
    #[error("renderer `{}` is unavailable: {source}", program.display())]
    Unavailable {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The rendering tool ran and reported failure.
    #[error("renderer `{}` failed ({status}): {stderr}", program.display())]
    Failed {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    /// The rendered image is missing or cannot be decoded.
    #[error("cannot read rendered image `{}`: {source}", path.display())]
    UnreadableImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl RenderError {
    /// Returns `true` if no attempt can succeed because the tool is missing.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_from_line_count() {
        let verdict = Verdict::from_line_count(6, 5);

        assert!(!verdict.is_clean());
        assert_eq!(verdict.line_segments(), Some(6));
    }

    #[test]
    fn test_unavailable_is_distinguished() {
        let err = RenderError::Unavailable {
            program: PathBuf::from("drawio"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };

        assert!(err.is_unavailable());
        assert!(err.to_string().contains("drawio"));
    }
}
