use pageflow::reading_order::{projection, split_projection, Axis, Segment};
use pageflow::types::{LayoutBox, LayoutCategory};

fn b(x0: f32, y0: f32, x1: f32, y1: f32) -> LayoutBox {
    LayoutBox::new(x0, y0, x1, y1, LayoutCategory::Text)
}

#[test]
fn projection_counts_coverage() {
    let boxes = [b(2.0, 0.0, 5.0, 1.0), b(4.0, 0.0, 7.0, 1.0)];
    let hist = projection(&boxes, Axis::X, 10);
    assert_eq!(hist, vec![0, 0, 1, 1, 2, 1, 1, 0, 0, 0]);
}

#[test]
fn projection_on_y_axis() {
    let boxes = [b(0.0, 1.0, 3.0, 3.0)];
    assert_eq!(projection(&boxes, Axis::Y, 5), vec![0, 1, 1, 0, 0]);
}

#[test]
fn projection_clamps_to_page() {
    let boxes = [b(-5.0, 0.0, 3.0, 1.0), b(8.0, 0.0, 20.0, 1.0)];
    let hist = projection(&boxes, Axis::X, 10);
    assert_eq!(hist, vec![1, 1, 1, 0, 0, 0, 0, 0, 1, 1]);
}

#[test]
fn degenerate_boxes_contribute_nothing() {
    // zero height: excluded from both axes
    let boxes = [b(1.0, 4.0, 6.0, 4.0), b(3.0, 0.0, 3.0, 9.0)];
    assert!(projection(&boxes, Axis::X, 10).iter().all(|&v| v == 0));
    assert!(projection(&boxes, Axis::Y, 10).iter().all(|&v| v == 0));
}

#[test]
fn box_entirely_off_page_is_ignored() {
    let boxes = [b(20.0, 0.0, 30.0, 1.0)];
    assert_eq!(projection(&boxes, Axis::X, 10), vec![0; 10]);
}

#[test]
fn segments_reference_example() {
    let hist = [0, 0, 3, 3, 3, 0, 0, 0, 4, 4, 0, 0];
    let segs = split_projection(&hist, 0, 2);
    assert_eq!(segs, vec![Segment::new(2, 5), Segment::new(8, 10)]);
}

#[test]
fn short_gaps_stay_inside_segment() {
    let hist = [1, 1, 0, 1, 1, 0, 0, 0, 1];
    let segs = split_projection(&hist, 0, 3);
    assert_eq!(segs, vec![Segment::new(0, 5), Segment::new(8, 9)]);
}

#[test]
fn trailing_segment_closes_at_length() {
    let hist = [0, 2, 2, 0];
    assert_eq!(split_projection(&hist, 0, 2), vec![Segment::new(1, 4)]);
}

#[test]
fn min_value_raises_occupancy_bar() {
    let hist = [1, 2, 2, 1, 1, 1, 2, 1];
    assert_eq!(
        split_projection(&hist, 1, 2),
        vec![Segment::new(1, 3), Segment::new(6, 8)]
    );
}

#[test]
fn zero_min_gap_behaves_like_one() {
    let hist = [1, 0, 1];
    assert_eq!(split_projection(&hist, 0, 0), split_projection(&hist, 0, 1));
    assert_eq!(
        split_projection(&hist, 0, 1),
        vec![Segment::new(0, 1), Segment::new(2, 3)]
    );
}

#[test]
fn empty_histogram_has_no_segments() {
    assert!(split_projection(&[], 0, 1).is_empty());
    assert!(split_projection(&[0, 0, 0], 0, 1).is_empty());
}
