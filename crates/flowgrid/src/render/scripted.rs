//! Renderer that replays predetermined results.

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
};

use log::debug;

use crate::render::{RenderError, Renderer, Verdict};

/// A [`Renderer`] that returns scripted results in order.
///
/// Once the script is used up every further call returns
/// [`Verdict::not_clean`]. Each call records the document path it received.
///
/// # Examples
///
/// ```
/// # use std::path::Path;
/// # use flowgrid::render::{Renderer, ScriptedRenderer, Verdict};
/// let mut renderer = ScriptedRenderer::from_verdicts([false, true]);
///
/// assert!(!renderer.render(Path::new("a.drawio")).unwrap().is_clean());
/// assert!(renderer.render(Path::new("a.drawio")).unwrap().is_clean());
/// assert_eq!(renderer.calls(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedRenderer {
    script: VecDeque<Result<Verdict, RenderError>>,
    rendered: Vec<PathBuf>,
}

impl ScriptedRenderer {
    /// Creates a renderer that replays `script`.
    pub fn new(script: impl IntoIterator<Item = Result<Verdict, RenderError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            rendered: Vec::new(),
        }
    }

    /// Creates a renderer that replays clean (`true`) and unclean verdicts.
    pub fn from_verdicts(clean: impl IntoIterator<Item = bool>) -> Self {
        Self::new(clean.into_iter().map(|clean| {
            Ok(if clean {
                Verdict::clean()
            } else {
                Verdict::not_clean()
            })
        }))
    }

    /// A renderer whose verdict is never clean.
    pub fn never_clean() -> Self {
        Self::default()
    }

    /// Returns how many times [`Renderer::render`] was called.
    pub fn calls(&self) -> usize {
        self.rendered.len()
    }

    /// Returns the document paths passed to each call.
    pub fn rendered(&self) -> &[PathBuf] {
        &self.rendered
    }
}

impl Renderer for ScriptedRenderer {
    fn render(&mut self, document: &Path) -> Result<Verdict, RenderError> {
        self.rendered.push(document.to_path_buf());
        let result = self.script.pop_front().unwrap_or(Ok(Verdict::not_clean()));
        debug!(call = self.rendered.len(), ok = result.is_ok(); "Scripted render");
        result
    }
}
