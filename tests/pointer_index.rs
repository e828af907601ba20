use explorer_chart_wasm::infrastructure::rendering::geometry::{
    nearest_slot, padded_range, plot_area, slot_x, value_to_y,
};

#[test]
fn pointer_lookup_inverts_slot_positioning() {
    // The hovered index must match the drawn point for every layout size
    let area = plot_area(800.0, 500.0);
    for visible_len in [1usize, 2, 5, 10, 50, 300] {
        for expected_index in 0..visible_len {
            let x = slot_x(expected_index, visible_len, &area);
            assert_eq!(
                nearest_slot(x, visible_len, &area),
                Some(expected_index),
                "len {} index {} x {:.4}",
                visible_len,
                expected_index,
                x
            );
        }
    }
}

#[test]
fn pointer_outside_the_plot_area_hits_nothing() {
    let area = plot_area(800.0, 500.0);
    assert_eq!(nearest_slot(area.left - 1.0, 10, &area), None);
    assert_eq!(nearest_slot(area.right() + 1.0, 10, &area), None);
    assert_eq!(nearest_slot(400.0, 0, &area), None);
}

#[test]
fn plot_edges_clamp_to_the_outer_slots() {
    let area = plot_area(800.0, 500.0);
    assert_eq!(nearest_slot(area.left, 5, &area), Some(0));
    assert_eq!(nearest_slot(area.right(), 5, &area), Some(4));
}

#[test]
fn value_mapping_spans_the_plot_height() {
    let area = plot_area(800.0, 500.0);
    let y_min = value_to_y(1.0, 1.0, 3.0, &area);
    let y_max = value_to_y(3.0, 1.0, 3.0, &area);
    assert!((y_min - area.bottom()).abs() < 1e-9);
    assert!((y_max - area.top).abs() < 1e-9);
}

#[test]
fn padded_range_keeps_extremes_off_the_edges() {
    let (min, max) = padded_range(&[10.0, 20.0]);
    assert!(min < 10.0 && max > 20.0);

    // A flat series still spans a drawable range
    let (flat_min, flat_max) = padded_range(&[5.0, 5.0]);
    assert!(flat_max > flat_min);

    assert_eq!(padded_range(&[]), (0.0, 1.0));
}
