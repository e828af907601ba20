use chrono::DateTime;

use explorer_chart_wasm::domain::chart::{ChartData, TemporalSource, TickLabeler};
use explorer_chart_wasm::infrastructure::rendering::canvas_chart::{x_axis_labels, y_axis_labels};

const BATCH_DATA: &str = r#"{
    "labels": ["2024-04-30T10:00:00Z", "2024-04-30T22:00:00Z", "2024-05-01T09:59:00Z"],
    "datasets": [{
        "data": [{"x": 1, "y": 10}, {"x": 2, "y": 30}, {"x": 3, "y": 20}],
        "age": ["1 day ago", "12 hours ago", "1 minute ago"]
    }]
}"#;

#[test]
fn sparse_extreme_y_labels_carry_the_suffix() {
    let labeler = TickLabeler::SparseExtremes { suffix: " proofs".to_string() };
    let series = [10.0, 30.0, 20.0];
    let ticks = [9.0, 15.0, 21.0, 27.0, 31.0];

    let labels = y_axis_labels(&labeler, &series, &ticks);
    assert_eq!(labels[0], "10 proofs");
    assert_eq!(labels[4], "30 proofs");
    assert!(labels[1].is_empty() && labels[2].is_empty() && labels[3].is_empty());
}

#[test]
fn hidden_labeler_renders_no_y_text() {
    let labels = y_axis_labels(&TickLabeler::Hidden, &[1.0, 2.0], &[1.0, 1.5, 2.0]);
    assert!(labels.iter().all(String::is_empty));
}

#[test]
fn temporal_x_labels_from_aux_column_pass_through() {
    let data = ChartData::parse(BATCH_DATA).unwrap();
    let labeler = TickLabeler::SparseTemporal { source: TemporalSource::Aux("age".to_string()) };
    let now = DateTime::from_timestamp(1_714_557_600, 0).unwrap();

    let labels = x_axis_labels(&labeler, &data, now);
    assert_eq!(labels, vec!["1 day ago".to_string(), "12 hours ago".to_string(), "1 minute ago".to_string()]);
}

#[test]
fn temporal_x_labels_from_shared_labels_render_ages() {
    let data = ChartData::parse(BATCH_DATA).unwrap();
    let labeler = TickLabeler::SparseTemporal { source: TemporalSource::Labels };
    // 2024-05-01T10:00:00Z
    let now = DateTime::from_timestamp(1_714_557_600, 0).unwrap();

    let labels = x_axis_labels(&labeler, &data, now);
    assert_eq!(labels[0], "1 day ago");
    assert_eq!(labels[1], "12 hours ago");
    assert_eq!(labels[2], "1 minute ago");
}

#[test]
fn missing_aux_column_renders_no_x_text() {
    let data = ChartData::parse(r#"{"datasets": [{"data": [1, 2, 3]}]}"#).unwrap();
    let labeler = TickLabeler::SparseTemporal { source: TemporalSource::Aux("age".to_string()) };
    let now = DateTime::from_timestamp(0, 0).unwrap();

    let labels = x_axis_labels(&labeler, &data, now);
    assert_eq!(labels, vec![String::new(), String::new(), String::new()]);
}
