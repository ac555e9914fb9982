//! Straight-line detection on rendered images.
//!
//! The scorer marks edge pixels with a Sobel operator and then looks for
//! long horizontal and vertical runs of them. A drawn line produces edge
//! pixels on both of its sides, so a run that overlaps a run found up to two
//! rows (or columns) earlier is treated as the same segment.

use image::{DynamicImage, GrayImage};
use log::{debug, trace};

use crate::{config::RenderConfig, render::Verdict};

/// Rows or columns a segment survives without a continuing run.
const CONTINUATION_WINDOW: u32 = 2;

/// Counts axis-aligned line segments in an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineScorer {
    edge_threshold: u32,
    min_line_length: u32,
    max_line_gap: u32,
    max_lines: usize,
}

impl Default for LineScorer {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

impl LineScorer {
    pub fn new(
        edge_threshold: u32,
        min_line_length: u32,
        max_line_gap: u32,
        max_lines: usize,
    ) -> Self {
        Self {
            edge_threshold,
            min_line_length,
            max_line_gap,
            max_lines,
        }
    }

    /// Creates a scorer with the thresholds from `config`.
    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(
            config.edge_threshold(),
            config.min_line_length(),
            config.max_line_gap(),
            config.max_lines(),
        )
    }

    /// Scores an image: clean when fewer than `max_lines` segments are found.
    pub fn score(&self, image: &DynamicImage) -> Verdict {
        let count = self.count_lines(image);
        debug!(segments = count, max_lines = self.max_lines; "Image scored");
        Verdict::from_line_count(count, self.max_lines)
    }

    /// Returns the number of horizontal plus vertical segments.
    pub fn count_lines(&self, image: &DynamicImage) -> usize {
        let edges = EdgeMap::detect(&image.to_luma8(), self.edge_threshold);
        let horizontal = self.count_segments(edges.height, edges.width, |line, pos| {
            edges.is_edge(pos, line)
        });
        let vertical = self.count_segments(edges.width, edges.height, |line, pos| {
            edges.is_edge(line, pos)
        });
        trace!(horizontal, vertical; "Line segments detected");
        horizontal + vertical
    }

    /// Counts segments over `lines` parallel scan lines of `length` pixels.
    fn count_segments(
        &self,
        lines: u32,
        length: u32,
        is_edge: impl Fn(u32, u32) -> bool,
    ) -> usize {
        let mut active: Vec<Segment> = Vec::new();
        let mut count = 0;

        for line in 0..lines {
            active.retain(|segment| line - segment.last_line <= CONTINUATION_WINDOW);

            for run in self.runs(length, |pos| is_edge(line, pos)) {
                match active.iter_mut().find(|segment| segment.overlaps(run)) {
                    Some(segment) => segment.extend(run, line),
                    None => {
                        count += 1;
                        active.push(Segment {
                            start: run.0,
                            end: run.1,
                            last_line: line,
                        });
                    }
                }
            }
        }
        count
    }

    /// Returns the `(start, end)` runs of one scan line that are long enough.
    fn runs(&self, length: u32, is_edge: impl Fn(u32) -> bool) -> Vec<(u32, u32)> {
        let mut runs = Vec::new();
        let mut current: Option<(u32, u32)> = None;

        for pos in (0..length).filter(|&pos| is_edge(pos)) {
            current = match current {
                Some((start, end)) if pos - end - 1 <= self.max_line_gap => Some((start, pos)),
                Some(run) => {
                    self.keep_run(run, &mut runs);
                    Some((pos, pos))
                }
                None => Some((pos, pos)),
            };
        }
        if let Some(run) = current {
            self.keep_run(run, &mut runs);
        }
        runs
    }

    fn keep_run(&self, (start, end): (u32, u32), runs: &mut Vec<(u32, u32)>) {
        if end - start + 1 >= self.min_line_length {
            runs.push((start, end));
        }
    }
}

#[derive(Debug)]
struct Segment {
    start: u32,
    end: u32,
    last_line: u32,
}

impl Segment {
    fn overlaps(&self, (start, end): (u32, u32)) -> bool {
        start <= self.end && self.start <= end
    }

    fn extend(&mut self, (start, end): (u32, u32), line: u32) {
        self.start = self.start.min(start);
        self.end = self.end.max(end);
        self.last_line = line;
    }
}

/// Pixels whose Sobel gradient magnitude exceeds a threshold.
struct EdgeMap {
    width: u32,
    height: u32,
    edges: Vec<bool>,
}

impl EdgeMap {
    fn detect(gray: &GrayImage, threshold: u32) -> Self {
        let (width, height) = gray.dimensions();
        let mut edges = vec![false; width as usize * height as usize];
        let at = |x: u32, y: u32| i32::from(gray.get_pixel(x, y).0[0]);

        // Border pixels lack a full neighborhood and are never edges.
        for y in 1..height.saturating_sub(1) {
            for x in 1..width.saturating_sub(1) {
                let gx = (at(x + 1, y - 1) + 2 * at(x + 1, y) + at(x + 1, y + 1))
                    - (at(x - 1, y - 1) + 2 * at(x - 1, y) + at(x - 1, y + 1));
                let gy = (at(x - 1, y + 1) + 2 * at(x, y + 1) + at(x + 1, y + 1))
                    - (at(x - 1, y - 1) + 2 * at(x, y - 1) + at(x + 1, y - 1));
                if gx.unsigned_abs() + gy.unsigned_abs() > threshold {
                    edges[y as usize * width as usize + x as usize] = true;
                }
            }
        }

        Self {
            width,
            height,
            edges,
        }
    }

    fn is_edge(&self, x: u32, y: u32) -> bool {
        self.edges[y as usize * self.width as usize + x as usize]
    }
}
