use explorer_chart_wasm::domain::chart::{ChartData, ChartSpec, Coord};
use explorer_chart_wasm::domain::errors::ChartError;

#[test]
fn scalar_and_pair_points_both_parse() {
    let data = ChartData::parse(
        r#"{"labels": ["a", "b"], "datasets": [{"data": [1.5, {"x": "block 2", "y": 3}]}]}"#,
    )
    .unwrap();

    let points = &data.primary().unwrap().data;
    assert_eq!(points[0].x, None);
    assert_eq!(points[0].y, 1.5);
    assert_eq!(points[1].x, Some(Coord::Text("block 2".to_string())));
    assert_eq!(points[1].y, 3.0);
}

#[test]
fn aux_columns_must_align_with_the_primary_series() {
    let misaligned = ChartData::parse(
        r#"{"datasets": [{"data": [1, 2, 3], "age": ["1 hour ago", "just now"]}]}"#,
    );
    match misaligned {
        Err(ChartError::Deserialization(message)) => {
            assert!(message.contains("age"), "unexpected message: {}", message);
        }
        other => panic!("expected a deserialization error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn aligned_aux_columns_are_readable_by_index() {
    let data = ChartData::parse(
        r#"{"datasets": [{"data": [1, 2], "merkle_root": ["0xaa", "0xbb"], "fee_per_proof": [0.5, 1]}]}"#,
    )
    .unwrap();

    let primary = data.primary().unwrap();
    assert_eq!(primary.aux_value("merkle_root", 1).as_deref(), Some("0xbb"));
    assert_eq!(primary.aux_value("fee_per_proof", 0).as_deref(), Some("0.5"));
    assert_eq!(primary.aux_value("absent", 0), None);
}

#[test]
fn non_array_extras_are_styling_not_columns() {
    let data = ChartData::parse(
        r##"{"datasets": [{"data": [1, 2], "label": "Cost", "borderColor": "#18FF7F", "tension": 0.4}]}"##,
    )
    .unwrap();

    let primary = data.primary().unwrap();
    assert_eq!(primary.label.as_deref(), Some("Cost"));
    assert_eq!(primary.border_color.as_deref(), Some("#18FF7F"));
    assert!(primary.aux_column("tension").is_none());
}

#[test]
fn malformed_payloads_are_deserialization_errors() {
    assert!(matches!(ChartData::parse("{not json"), Err(ChartError::Deserialization(_))));
    assert!(matches!(
        ChartData::parse(r#"{"labels": []}"#),
        Err(ChartError::Deserialization(_))
    ));
}

#[test]
fn spec_rejects_unknown_kind_and_missing_id() {
    let data = r#"{"datasets": [{"data": [1]}]}"#;

    let unknown_kind = ChartSpec::from_attributes("chart_a", "scatter", data, "{}", None);
    assert!(matches!(unknown_kind, Err(ChartError::Deserialization(_))));

    let missing_id = ChartSpec::from_attributes("  ", "line", data, "{}", None);
    assert!(matches!(missing_id, Err(ChartError::Deserialization(_))));
}

#[test]
fn spec_parses_optional_tooltip_template() {
    let data = r#"{"datasets": [{"data": [1]}]}"#;
    let with_template = ChartSpec::from_attributes(
        "chart_a",
        "bar",
        data,
        "{}",
        Some(r#"{"title": "Batch size", "body": "{{value}} proofs"}"#),
    )
    .unwrap();
    let template = with_template.tooltip.unwrap();
    assert_eq!(template.title, "Batch size");

    let broken = ChartSpec::from_attributes("chart_a", "bar", data, "{}", Some("{broken"));
    assert!(matches!(broken, Err(ChartError::Deserialization(_))));
}
