//! Rendering through the draw.io desktop CLI.

use std::{
    ffi::OsString,
    fs,
    io,
    path::{Path, PathBuf},
    process::Command,
};

use log::{debug, info, warn};

use crate::{
    config::RenderConfig,
    render::{LineScorer, RenderError, Renderer, Verdict},
};

/// A [`Renderer`] that exports a PNG with draw.io and scores it.
///
/// The tool is invoked as:
///
/// ```text
/// <program> [--user-data-dir=<dir>] -x -f png -o <image> <document>
/// ```
#[derive(Debug, Clone)]
pub struct DrawioRenderer {
    program: PathBuf,
    image: PathBuf,
    user_data_dir: Option<PathBuf>,
    scorer: LineScorer,
}

impl DrawioRenderer {
    /// Creates a renderer that writes the raster image to `image`.
    pub fn new(
        program: impl Into<PathBuf>,
        image: impl Into<PathBuf>,
        scorer: LineScorer,
    ) -> Self {
        Self {
            program: program.into(),
            image: image.into(),
            user_data_dir: None,
            scorer,
        }
    }

    /// Creates a renderer from the `[render]` configuration section.
    pub fn from_config(config: &RenderConfig) -> Self {
        let scorer = LineScorer::from_config(config);
        let renderer = Self::new(config.program(), config.image(), scorer);
        match config.user_data_dir() {
            Some(dir) => renderer.with_user_data_dir(dir),
            None => renderer,
        }
    }

    /// Sets the Electron user data directory passed to draw.io.
    pub fn with_user_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_data_dir = Some(dir.into());
        self
    }

    fn command(&self, document: &Path) -> Command {
        let mut command = Command::new(&self.program);
        if let Some(dir) = &self.user_data_dir {
            let mut arg = OsString::from("--user-data-dir=");
            arg.push(dir);
            command.arg(arg);
        }
        command
            .args(["-x", "-f", "png", "-o"])
            .arg(&self.image)
            .arg(document);
        command
    }

    fn prepare_directories(&self) {
        let dirs = self
            .user_data_dir
            .as_deref()
            .into_iter()
            .chain(self.image.parent().filter(|dir| !dir.as_os_str().is_empty()));
        for dir in dirs {
            if let Err(err) = fs::create_dir_all(dir) {
                warn!(dir:? = dir, err:err; "Cannot create renderer directory");
            }
        }
    }

    /// Removes the image left by a previous attempt.
    fn remove_stale_image(&self) -> Result<(), RenderError> {
        match fs::remove_file(&self.image) {
            Ok(()) => {
                debug!(image:? = self.image; "Removed previous image");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(RenderError::UnreadableImage {
                path: self.image.clone(),
                source: image::ImageError::IoError(err),
            }),
        }
    }
}

impl Renderer for DrawioRenderer {
    fn render(&mut self, document: &Path) -> Result<Verdict, RenderError> {
        self.prepare_directories();
        self.remove_stale_image()?;

        let mut command = self.command(document);
        debug!(command:?; "Invoking draw.io");
        let output = command.output().map_err(|source| RenderError::Unavailable {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(RenderError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let image = image::open(&self.image).map_err(|source| RenderError::UnreadableImage {
            path: self.image.clone(),
            source,
        })?;
        info!(image:? = self.image; "Diagram rasterized");

        Ok(self.scorer.score(&image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(command: &Command) -> Vec<String> {
        command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_command_line() {
        let renderer = DrawioRenderer::new("drawio", "out/diagram.png", LineScorer::default());
        let command = renderer.command(Path::new("out.drawio"));

        assert_eq!(command.get_program(), "drawio");
        assert_eq!(
            args(&command),
            vec!["-x", "-f", "png", "-o", "out/diagram.png", "out.drawio"]
        );
    }

    #[test]
    fn test_command_line_with_user_data_dir() {
        let renderer = DrawioRenderer::new("drawio", "diagram.png", LineScorer::default())
            .with_user_data_dir("/tmp/drawio-cache");
        let command = renderer.command(Path::new("out.drawio"));

        assert_eq!(args(&command)[0], "--user-data-dir=/tmp/drawio-cache");
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = DrawioRenderer::new(
            dir.path().join("no-such-drawio"),
            dir.path().join("diagram.png"),
            LineScorer::default(),
        );

        let err = renderer.render(&dir.path().join("out.drawio")).unwrap_err();
        assert!(err.is_unavailable());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_is_failed() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer =
            DrawioRenderer::new("false", dir.path().join("diagram.png"), LineScorer::default());

        let err = renderer.render(&dir.path().join("out.drawio")).unwrap_err();
        assert!(matches!(err, RenderError::Failed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_image_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer =
            DrawioRenderer::new("true", dir.path().join("diagram.png"), LineScorer::default());

        let err = renderer.render(&dir.path().join("out.drawio")).unwrap_err();
        assert!(matches!(err, RenderError::UnreadableImage { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_previous_image_is_not_scored() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("diagram.png");
        image::GrayImage::from_pixel(50, 50, image::Luma([255]))
            .save(&png)
            .unwrap();
        let mut renderer = DrawioRenderer::new("true", &png, LineScorer::default());

        let err = renderer.render(&dir.path().join("out.drawio")).unwrap_err();
        assert!(matches!(err, RenderError::UnreadableImage { .. }));
        assert!(!png.exists());
    }
}
