use pageflow::reading_order::{detect_text_direction, order, ReadingOrderConfig, TextDirection};
use pageflow::types::{LayoutBox, LayoutCategory};
use proptest::prelude::*;

fn b(x0: f32, y0: f32, x1: f32, y1: f32) -> LayoutBox {
    LayoutBox::new(x0, y0, x1, y1, LayoutCategory::Text)
}

fn cfg(direction: TextDirection) -> ReadingOrderConfig {
    ReadingOrderConfig {
        direction,
        ..Default::default()
    }
}

fn horizontal() -> ReadingOrderConfig {
    cfg(TextDirection::Horizontal)
}

#[test]
fn empty_and_single() {
    assert!(order(&[], 1000, 1000, &horizontal()).is_empty());
    assert_eq!(order(&[b(5.0, 5.0, 50.0, 20.0)], 1000, 1000, &horizontal()), vec![0]);
}

#[test]
fn stacked_rows_read_top_first() {
    let boxes = [b(0.0, 0.0, 100.0, 20.0), b(0.0, 500.0, 100.0, 520.0)];
    assert_eq!(order(&boxes, 1000, 1000, &horizontal()), vec![0, 1]);

    let reversed = [boxes[1], boxes[0]];
    assert_eq!(order(&reversed, 1000, 1000, &horizontal()), vec![1, 0]);
}

#[test]
fn two_columns_read_left_first() {
    let left = b(0.0, 0.0, 400.0, 900.0);
    let right = b(600.0, 0.0, 1000.0, 900.0);
    assert_eq!(order(&[left, right], 1000, 1000, &horizontal()), vec![0, 1]);
    assert_eq!(order(&[right, left], 1000, 1000, &horizontal()), vec![1, 0]);
    assert_eq!(order(&[left, right], 1000, 1000, &ReadingOrderConfig::default()), vec![0, 1]);
}

#[test]
fn header_above_two_columns() {
    let header = b(0.0, 0.0, 1000.0, 50.0);
    let left_top = b(0.0, 100.0, 450.0, 300.0);
    let left_bottom = b(0.0, 320.0, 450.0, 500.0);
    let right = b(550.0, 100.0, 1000.0, 500.0);
    let boxes = [right, left_bottom, header, left_top];

    let got = order(&boxes, 1000, 1000, &horizontal());
    assert_eq!(got, vec![2, 3, 1, 0]);

    // feeding the result back in keeps it
    let rearranged: Vec<LayoutBox> = got.iter().map(|&i| boxes[i]).collect();
    assert_eq!(order(&rearranged, 1000, 1000, &horizontal()), vec![0, 1, 2, 3]);
}

#[test]
fn row_tolerance_boundary() {
    // centers 15px apart, both 40px tall
    let a = b(100.0, 0.0, 200.0, 40.0);
    let lower_left = b(0.0, 15.0, 120.0, 55.0);
    let boxes = [lower_left, a];

    let same_row = ReadingOrderConfig {
        row_tolerance: 0.5,
        ..horizontal()
    };
    assert_eq!(order(&boxes, 1000, 1000, &same_row), vec![0, 1]);

    let strict = ReadingOrderConfig {
        row_tolerance: 0.25,
        ..horizontal()
    };
    assert_eq!(order(&boxes, 1000, 1000, &strict), vec![1, 0]);

    // exactly at the threshold is a different row
    let boundary = ReadingOrderConfig {
        row_tolerance: 0.375,
        ..horizontal()
    };
    assert_eq!(order(&boxes, 1000, 1000, &boundary), vec![1, 0]);
}

#[test]
fn vertical_base_case_reads_right_to_left() {
    let left = b(100.0, 0.0, 140.0, 400.0);
    let right = b(160.0, 0.0, 200.0, 400.0);
    let vertical = cfg(TextDirection::Vertical);
    assert_eq!(order(&[left, right], 1000, 1000, &vertical), vec![1, 0]);
}

#[test]
fn vertical_same_column_reads_top_down() {
    let top = b(100.0, 0.0, 140.0, 100.0);
    let below = b(105.0, 120.0, 145.0, 300.0);
    let vertical = cfg(TextDirection::Vertical);
    assert_eq!(order(&[below, top], 1000, 1000, &vertical), vec![1, 0]);
}

#[test]
fn vertical_cuts_y_before_x() {
    // two bands separated by a wide horizontal gutter
    let upper = b(900.0, 0.0, 960.0, 300.0);
    let lower = b(0.0, 600.0, 60.0, 900.0);
    let vertical = cfg(TextDirection::Vertical);
    assert_eq!(order(&[lower, upper], 1000, 1000, &vertical), vec![1, 0]);
}

#[test]
fn vertical_falls_back_to_x_cut() {
    // no horizontal gutter, so the X axis splits; groups keep segment order
    let left = b(0.0, 0.0, 100.0, 900.0);
    let right = b(800.0, 0.0, 900.0, 900.0);
    let vertical = cfg(TextDirection::Vertical);
    assert_eq!(order(&[left, right], 1000, 1000, &vertical), vec![0, 1]);
    assert_eq!(order(&[right, left], 1000, 1000, &vertical), vec![1, 0]);
    assert_eq!(
        order(&[left, right], 1000, 1000, &cfg(TextDirection::Auto)),
        vec![0, 1]
    );
}

#[test]
fn auto_resolves_by_aspect() {
    let wide = [b(0.0, 0.0, 300.0, 20.0), b(0.0, 40.0, 300.0, 60.0)];
    let tall = [b(0.0, 0.0, 20.0, 300.0), b(40.0, 0.0, 60.0, 300.0)];
    assert_eq!(detect_text_direction(&wide), TextDirection::Horizontal);
    assert_eq!(detect_text_direction(&tall), TextDirection::Vertical);
    assert_eq!(detect_text_direction(&[]), TextDirection::Horizontal);

    // exactly half wide still counts as horizontal
    let mixed = [wide[0], tall[0]];
    assert_eq!(detect_text_direction(&mixed), TextDirection::Horizontal);
}

#[test]
fn auto_ignores_degenerate_boxes() {
    let boxes = [b(0.0, 0.0, 20.0, 300.0), b(0.0, 0.0, 500.0, 0.0), b(10.0, 10.0, 10.0, 10.0)];
    assert_eq!(detect_text_direction(&boxes), TextDirection::Vertical);
    let only_degenerate = [b(0.0, 0.0, 0.0, 0.0)];
    assert_eq!(detect_text_direction(&only_degenerate), TextDirection::Horizontal);
}

#[test]
fn overlapping_and_off_page_boxes_all_appear() {
    let boxes = [
        b(0.0, 0.0, 500.0, 500.0),
        b(100.0, 100.0, 400.0, 400.0),
        b(-50.0, 900.0, 20.0, 1200.0),
        b(2000.0, 2000.0, 2100.0, 2100.0),
        b(300.0, 300.0, 300.0, 300.0),
    ];
    let mut got = order(&boxes, 1000, 1000, &cfg(TextDirection::Auto));
    got.sort_unstable();
    assert_eq!(got, vec![0, 1, 2, 3, 4]);
}

#[test]
fn config_rejects_bad_thresholds() {
    let bad = ReadingOrderConfig {
        min_gap_ratio: -0.1,
        ..Default::default()
    };
    assert!(bad.validate().is_err());
    let nan = ReadingOrderConfig {
        row_tolerance: f32::NAN,
        ..Default::default()
    };
    assert!(nan.validate().is_err());
    assert!(ReadingOrderConfig::default().validate().is_ok());
}

fn arb_box() -> impl Strategy<Value = LayoutBox> {
    (-50.0f32..1050.0, -50.0f32..1050.0, 0.0f32..400.0, 0.0f32..400.0)
        .prop_map(|(x, y, w, h)| b(x, y, x + w, y + h))
}

fn arb_direction() -> impl Strategy<Value = TextDirection> {
    prop_oneof![
        Just(TextDirection::Horizontal),
        Just(TextDirection::Vertical),
        Just(TextDirection::Auto),
    ]
}

proptest! {
    #[test]
    fn order_is_a_permutation(
        boxes in prop::collection::vec(arb_box(), 0..40),
        direction in arb_direction(),
        width in 1u32..1200,
        height in 1u32..1200,
    ) {
        let mut got = order(&boxes, width, height, &cfg(direction));
        got.sort_unstable();
        prop_assert_eq!(got, (0..boxes.len()).collect::<Vec<_>>());
    }

    #[test]
    fn order_is_deterministic(boxes in prop::collection::vec(arb_box(), 0..30)) {
        let c = horizontal();
        prop_assert_eq!(order(&boxes, 1000, 1000, &c), order(&boxes, 1000, 1000, &c));
    }
}
