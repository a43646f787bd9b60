//! Reading order for detected layout boxes.
//!
//! Recursive projection cutting: project the boxes of a region onto one axis,
//! cut at whitespace runs wide enough to count as column or block gutters, and
//! recurse into each piece. Horizontal text cuts X before Y (XY-cut), vertical
//! text cuts Y before X (YX-cut). A region that cannot be cut on either axis is
//! sorted row by row (or column by column).
//!
//! Pure and allocation-local; safe to call from many pages at once.

pub mod projection;
pub mod segments;

pub use projection::{projection, Axis};
pub use segments::{split_projection, Segment};

use crate::error::{check_threshold, ConfigError};
use crate::types::LayoutBox;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::trace;

/// Boxes at least this much wider than tall read as horizontal text.
const HORIZONTAL_ASPECT: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    /// Left to right, top to bottom.
    Horizontal,
    /// Top to bottom, right to left.
    Vertical,
    Auto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingOrderConfig {
    pub direction: TextDirection,
    /// Minimum gutter as a fraction of the page dimension being cut.
    pub min_gap_ratio: f32,
    /// Bins with coverage above this (floored) value count as occupied.
    pub min_value_ratio: f32,
    /// Boxes whose centers differ by less than this fraction of the smaller
    /// box extent share a row (horizontal) or column (vertical).
    pub row_tolerance: f32,
}

impl Default for ReadingOrderConfig {
    fn default() -> Self {
        Self {
            direction: TextDirection::Auto,
            min_gap_ratio: 0.05,
            min_value_ratio: 0.0,
            row_tolerance: 0.5,
        }
    }
}

impl ReadingOrderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("reading_order.min_gap_ratio", self.min_gap_ratio)?;
        check_threshold("reading_order.min_value_ratio", self.min_value_ratio)?;
        check_threshold("reading_order.row_tolerance", self.row_tolerance)?;
        Ok(())
    }
}

/// Majority vote over box aspect ratios. Boxes without positive width and
/// height are ignored; with nothing left to measure the answer is Horizontal.
pub fn detect_text_direction(boxes: &[LayoutBox]) -> TextDirection {
    let measurable = boxes.iter().filter(|b| !b.is_degenerate());
    let (mut wide, mut total) = (0usize, 0usize);
    for b in measurable {
        total += 1;
        if b.width() >= b.height() * HORIZONTAL_ASPECT {
            wide += 1;
        }
    }
    if total == 0 || wide as f32 / total as f32 >= 0.5 {
        TextDirection::Horizontal
    } else {
        TextDirection::Vertical
    }
}

/// Returns a permutation of `0..boxes.len()` in reading order.
///
/// Page dimensions must be positive and the config valid; callers check both
/// (see [`crate::error::check_page_size`], [`ReadingOrderConfig::validate`]).
pub fn order(boxes: &[LayoutBox], page_width: u32, page_height: u32, cfg: &ReadingOrderConfig) -> Vec<usize> {
    if boxes.is_empty() {
        return Vec::new();
    }

    let direction = match cfg.direction {
        TextDirection::Auto => detect_text_direction(boxes),
        d => d,
    };
    trace!(
        boxes = boxes.len(),
        page_width,
        page_height,
        ?direction,
        "reading order"
    );

    let cutter = Cutter {
        boxes,
        page_width: page_width.max(1) as usize,
        page_height: page_height.max(1) as usize,
        cfg,
        direction,
    };
    let mut out = Vec::with_capacity(boxes.len());
    cutter.cut((0..boxes.len()).collect(), &mut out);
    out
}

struct Cutter<'a> {
    boxes: &'a [LayoutBox],
    page_width: usize,
    page_height: usize,
    cfg: &'a ReadingOrderConfig,
    direction: TextDirection,
}

impl Cutter<'_> {
    fn first_axis(&self) -> Axis {
        match self.direction {
            TextDirection::Vertical => Axis::Y,
            _ => Axis::X,
        }
    }

    fn axis_len(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.page_width,
            Axis::Y => self.page_height,
        }
    }

    fn cut(&self, indices: Vec<usize>, out: &mut Vec<usize>) {
        if indices.len() <= 1 {
            out.extend(indices);
            return;
        }

        let first = self.first_axis();
        for axis in [first, first.other()] {
            if let Some(groups) = self.split(&indices, axis) {
                for group in groups {
                    self.cut(group, out);
                }
                return;
            }
        }

        out.extend(self.sort_block(indices));
    }

    /// Partitions `indices` by the segment each box center falls into, in
    /// segment order. `None` unless at least two non-empty groups result.
    fn split(&self, indices: &[usize], axis: Axis) -> Option<Vec<Vec<usize>>> {
        let len = self.axis_len(axis);
        let min_gap = ((len as f32 * self.cfg.min_gap_ratio) as usize).max(1);
        let min_value = self.cfg.min_value_ratio as u32;

        let hist = projection(indices.iter().map(|&i| &self.boxes[i]), axis, len);
        let segs = split_projection(&hist, min_value, min_gap);
        if segs.len() < 2 {
            return None;
        }

        let mut groups = vec![Vec::new(); segs.len()];
        for &i in indices {
            let c = axis.center(&self.boxes[i]);
            let slot = segs
                .iter()
                .position(|s| s.contains(c))
                .unwrap_or_else(|| nearest(&segs, c));
            groups[slot].push(i);
        }
        groups.retain(|g| !g.is_empty());

        if groups.len() < 2 {
            return None;
        }
        trace!(?axis, segments = segs.len(), groups = groups.len(), "cut");
        Some(groups)
    }

    /// Orders a block that no axis can cut further.
    ///
    /// The tolerance comparison is not transitive, so it must not go through
    /// `slice::sort_by`; a plain insertion keeps the result deterministic.
    fn sort_block(&self, indices: Vec<usize>) -> Vec<usize> {
        let mut sorted: Vec<usize> = Vec::with_capacity(indices.len());
        for i in indices {
            let pos = sorted
                .iter()
                .position(|&j| self.precedes(i, j) == Ordering::Less)
                .unwrap_or(sorted.len());
            sorted.insert(pos, i);
        }
        sorted
    }

    /// Same-row tolerance scales with the smaller box height in horizontal
    /// mode; same-column tolerance scales with the smaller width in vertical.
    fn precedes(&self, a: usize, b: usize) -> Ordering {
        let (a, b) = (&self.boxes[a], &self.boxes[b]);
        let (ax, ay) = a.center();
        let (bx, by) = b.center();
        match self.direction {
            TextDirection::Vertical => {
                let tol = a.width().min(b.width()) * self.cfg.row_tolerance;
                if (ax - bx).abs() < tol {
                    ay.total_cmp(&by)
                } else {
                    bx.total_cmp(&ax)
                }
            }
            _ => {
                let tol = a.height().min(b.height()) * self.cfg.row_tolerance;
                if (ay - by).abs() < tol {
                    ax.total_cmp(&bx)
                } else {
                    ay.total_cmp(&by)
                }
            }
        }
    }
}

fn nearest(segs: &[Segment], pos: f32) -> usize {
    let mut best = 0;
    for (i, s) in segs.iter().enumerate().skip(1) {
        if s.distance(pos) < segs[best].distance(pos) {
            best = i;
        }
    }
    best
}
