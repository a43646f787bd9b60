use crate::types::LayoutBox;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Along page width.
    X,
    /// Along page height.
    Y,
}

impl Axis {
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    pub(crate) fn span(self, b: &LayoutBox) -> (f32, f32) {
        match self {
            Axis::X => (b.x0, b.x1),
            Axis::Y => (b.y0, b.y1),
        }
    }

    pub(crate) fn center(self, b: &LayoutBox) -> f32 {
        let (lo, hi) = self.span(b);
        (lo + hi) / 2.0
    }
}

/// Coverage histogram of `boxes` along `axis`: bin `i` counts the boxes that
/// cover pixel `i`. Coordinates are truncated to whole pixels and clamped to
/// `[0, len)`; zero-area boxes contribute nothing.
pub fn projection<'a, I>(boxes: I, axis: Axis, len: usize) -> Vec<u32>
where
    I: IntoIterator<Item = &'a LayoutBox>,
{
    let mut bins = vec![0u32; len];
    for b in boxes {
        if b.is_degenerate() {
            continue;
        }
        let (lo, hi) = axis.span(b);
        let start = (lo.max(0.0) as usize).min(len);
        let end = (hi.max(0.0) as usize).min(len);
        for bin in &mut bins[start..end.max(start)] {
            *bin += 1;
        }
    }
    bins
}
