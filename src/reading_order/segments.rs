use serde::{Deserialize, Serialize};

/// Half-open run `[start, end)` of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, pos: f32) -> bool {
        pos >= self.start as f32 && pos < self.end as f32
    }

    pub(crate) fn distance(&self, pos: f32) -> f32 {
        if pos < self.start as f32 {
            self.start as f32 - pos
        } else if pos >= self.end as f32 {
            pos - self.end as f32
        } else {
            0.0
        }
    }
}

/// Splits a projection into occupied runs separated by at least `min_gap`
/// bins whose value is `<= min_value`. Gaps shorter than `min_gap` stay inside
/// the surrounding run. `min_gap` of 0 is treated as 1.
pub fn split_projection(values: &[u32], min_value: u32, min_gap: usize) -> Vec<Segment> {
    let min_gap = min_gap.max(1);
    let mut segments = Vec::new();
    let mut in_segment = false;
    let mut start = 0;
    let mut gap = 0;

    for (i, &v) in values.iter().enumerate() {
        if v > min_value {
            if !in_segment {
                start = i;
                in_segment = true;
            }
            gap = 0;
        } else if in_segment {
            gap += 1;
            if gap >= min_gap {
                segments.push(Segment::new(start, i + 1 - gap));
                in_segment = false;
                gap = 0;
            }
        }
    }

    if in_segment {
        segments.push(Segment::new(start, values.len()));
    }
    segments
}
