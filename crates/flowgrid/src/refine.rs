//! The render-feedback refinement loop.
//!
//! Every attempt runs the full pipeline from source text to a written
//! document, hands the document to a [`Renderer`] and inspects the verdict.
//! An unclean verdict widens the grid and tries again until the attempt
//! budget runs out.
//!
//! # States
//!
//! ```text
//! Attempting(1) ──clean──► Clean(n)
//!      │
//!  not clean, n < max ──► Attempting(n + 1)
//!  not clean, n = max ──► Exhausted(max)
//! ```
//!
//! Spacing grows only on the way to a further attempt, so the parameters in
//! the final [`RefineReport`] are the ones that produced the last document.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{error, info, warn};

use crate::{
    DiagramBuilder, FlowgridError,
    layout::LayoutParameters,
    render::{Renderer, Verdict},
};

/// Position of the loop in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefineState {
    /// About to run the given 1-based attempt.
    Attempting { attempt: usize },
    /// The given attempt produced a clean render.
    Clean { attempt: usize },
    /// Every attempt was used without a clean render.
    Exhausted { attempts: usize },
}

impl RefineState {
    /// The initial state.
    pub fn start() -> Self {
        Self::Attempting { attempt: 1 }
    }

    /// Returns the state after an attempt ended with the given verdict.
    ///
    /// Terminal states are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flowgrid::refine::RefineState;
    /// let state = RefineState::start().next(false, 2);
    /// assert_eq!(state, RefineState::Attempting { attempt: 2 });
    /// assert_eq!(state.next(false, 2), RefineState::Exhausted { attempts: 2 });
    /// ```
    pub fn next(self, clean: bool, max_attempts: usize) -> Self {
        match self {
            Self::Attempting { attempt } if clean => Self::Clean { attempt },
            Self::Attempting { attempt } if attempt < max_attempts => Self::Attempting {
                attempt: attempt + 1,
            },
            Self::Attempting { attempt } => Self::Exhausted { attempts: attempt },
            terminal => terminal,
        }
    }

    /// Returns `true` for [`Clean`](Self::Clean) and [`Exhausted`](Self::Exhausted).
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Attempting { .. })
    }
}

/// How the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefineOutcome {
    /// A render was judged clean.
    Clean,
    /// The attempt budget ran out. The last document is still on disk.
    Exhausted,
}

/// Summary of a finished refinement loop.
#[derive(Debug, Clone)]
pub struct RefineReport {
    outcome: RefineOutcome,
    attempts: usize,
    parameters: LayoutParameters,
    document: PathBuf,
    last_verdict: Verdict,
}

impl RefineReport {
    pub fn outcome(&self) -> RefineOutcome {
        self.outcome
    }

    pub fn is_clean(&self) -> bool {
        self.outcome == RefineOutcome::Clean
    }

    /// Returns the number of attempts made, which equals the renderer calls.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Returns the parameters of the last attempt.
    pub fn parameters(&self) -> LayoutParameters {
        self.parameters
    }

    /// Returns the path of the last written document.
    pub fn document(&self) -> &Path {
        &self.document
    }

    pub fn last_verdict(&self) -> Verdict {
        self.last_verdict
    }
}

/// Runs the loop for `source`, writing each attempt to `document`.
pub(crate) fn run<R: Renderer>(
    builder: &DiagramBuilder,
    source: &str,
    renderer: &mut R,
    document: &Path,
) -> Result<RefineReport, FlowgridError> {
    let config = builder.config();
    config.validate()?;

    let max_attempts = config.refine().max_attempts();
    let growth = config.refine().growth();
    let mut params = config.layout().initial_parameters();
    let mut state = RefineState::start();
    let mut last_verdict = Verdict::not_clean();

    let (outcome, attempts) = loop {
        let attempt = match state {
            RefineState::Attempting { attempt } => attempt,
            RefineState::Clean { attempt } => break (RefineOutcome::Clean, attempt),
            RefineState::Exhausted { attempts } => break (RefineOutcome::Exhausted, attempts),
        };

        info!(
            attempt,
            max_attempts,
            cell_width = params.cell_width(),
            cell_height = params.cell_height();
            "Starting layout attempt"
        );
        let diagram = builder.build_document(source, params)?;
        fs::write(document, diagram.to_xml())?;

        last_verdict = match renderer.render(document) {
            Ok(verdict) => verdict,
            Err(err) if err.is_unavailable() => {
                error!(attempt, err:err; "Renderer unavailable");
                return Err(err.into());
            }
            Err(err) => {
                warn!(attempt, err:err; "Render failed, treating attempt as not clean");
                Verdict::not_clean()
            }
        };

        state = state.next(last_verdict.is_clean(), max_attempts);
        if let RefineState::Attempting { attempt } = state {
            params = params.grown(growth);
            warn!(
                attempt,
                cell_width = params.cell_width(),
                cell_height = params.cell_height();
                "Retrying with more spacing"
            );
        }
    };

    match outcome {
        RefineOutcome::Clean => info!(
            attempt = attempts,
            document:? = document;
            "Clean diagram generated"
        ),
        RefineOutcome::Exhausted => warn!(
            attempts,
            document:? = document;
            "No clean render within the attempt budget, keeping last attempt"
        ),
    }

    Ok(RefineReport {
        outcome,
        attempts,
        parameters: params,
        document: document.to_path_buf(),
        last_verdict,
    })
}
