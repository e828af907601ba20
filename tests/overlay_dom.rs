#![cfg(target_arch = "wasm32")]

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlCanvasElement};

use explorer_chart_wasm::domain::chart::{
    ActivePoint, OverlayAlign, OverlayItem, OverlaySpec, OverlayStyle, QueryFn, QueryValues,
    TooltipBinding, TooltipModel,
};
use explorer_chart_wasm::domain::errors::ChartError;
use explorer_chart_wasm::infrastructure::dom::dispatch_window_event;
use explorer_chart_wasm::infrastructure::overlay::{show, widget_dom_id, TooltipContext};
use explorer_chart_wasm::infrastructure::style::StylePalette;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn canvas() -> HtmlCanvasElement {
    let canvas: HtmlCanvasElement =
        document().create_element("canvas").unwrap().dyn_into().unwrap();
    canvas.set_width(400);
    canvas.set_height(240);
    document().body().unwrap().append_child(&canvas).unwrap();
    canvas
}

fn overlay_style() -> OverlayStyle {
    let palette = StylePalette::default();
    OverlayStyle {
        background: palette.card,
        border: palette.border,
        text: palette.foreground,
        muted: palette.muted_foreground,
        accent: palette.accent,
    }
}

fn binding(identity: &str, answers: Vec<(&'static str, &'static str)>) -> TooltipBinding {
    let spec = OverlaySpec {
        identity: identity.to_string(),
        title: "Batch size".to_string(),
        items: vec![OverlayItem::new("Fee per proof", "cost"), OverlayItem::new("Age", "age")],
        align: OverlayAlign::Above,
    };
    let on_query: QueryFn = Rc::new(move |_: &TooltipModel| {
        let mut values = QueryValues::new();
        for (id, value) in &answers {
            values.insert((*id).to_string(), (*value).to_string());
        }
        Ok(values)
    });
    TooltipBinding { spec, style: overlay_style(), on_query, on_activate: None }
}

fn visible_model() -> TooltipModel {
    TooltipModel {
        points: vec![ActivePoint { dataset: 0, index: 0 }],
        caret_x: 40.0,
        caret_y: 20.0,
        opacity: 1.0,
    }
}

fn slot_text(identity: &str, item_id: &str) -> String {
    document()
        .get_element_by_id(&widget_dom_id(identity))
        .unwrap()
        .query_selector(&format!("[data-item-id='{}']", item_id))
        .unwrap()
        .unwrap()
        .text_content()
        .unwrap()
}

#[wasm_bindgen_test]
fn query_values_land_in_their_slots() {
    let canvas = canvas();
    let binding = binding("slots", vec![("cost", "0.75 USD"), ("age", "2 hours ago")]);

    show(&TooltipContext { canvas: canvas.clone(), model: visible_model() }, &binding).unwrap();

    assert_eq!(slot_text("slots", "cost"), "0.75 USD");
    assert_eq!(slot_text("slots", "age"), "2 hours ago");
    canvas.remove();
}

#[wasm_bindgen_test]
fn hidden_model_never_builds_a_widget() {
    let canvas = canvas();
    let binding = binding("never_built", vec![("cost", "1 USD"), ("age", "just now")]);

    show(&TooltipContext { canvas: canvas.clone(), model: TooltipModel::hidden() }, &binding)
        .unwrap();

    assert!(document().get_element_by_id(&widget_dom_id("never_built")).is_none());
    canvas.remove();
}

#[wasm_bindgen_test]
fn missing_declared_item_is_a_loud_contract_violation() {
    let canvas = canvas();
    let binding = binding("incomplete", vec![("cost", "1 USD")]);

    let result = show(&TooltipContext { canvas: canvas.clone(), model: visible_model() }, &binding);
    assert_eq!(
        result,
        Err(ChartError::MissingTooltipItem {
            identity: "incomplete".to_string(),
            item: "age".to_string(),
        })
    );
    canvas.remove();
}

#[wasm_bindgen_test]
fn resize_tears_the_widget_down_until_the_next_show() {
    let canvas = canvas();
    let binding = binding("resizable", vec![("cost", "1 USD"), ("age", "just now")]);
    let ctx = TooltipContext { canvas: canvas.clone(), model: visible_model() };

    show(&ctx, &binding).unwrap();
    assert!(document().get_element_by_id(&widget_dom_id("resizable")).is_some());

    dispatch_window_event("resize").unwrap();
    assert!(
        document().get_element_by_id(&widget_dom_id("resizable")).is_none(),
        "resize must remove the widget immediately"
    );

    show(&ctx, &binding).unwrap();
    assert!(
        document().get_element_by_id(&widget_dom_id("resizable")).is_some(),
        "next visible model rebuilds the widget"
    );
    canvas.remove();
}

#[wasm_bindgen_test]
fn widgets_of_concurrent_charts_do_not_collide() {
    let canvas_a = canvas();
    let canvas_b = canvas();
    let binding_a = binding("chart_a", vec![("cost", "1 USD"), ("age", "just now")]);
    let binding_b = binding("chart_b", vec![("cost", "2 USD"), ("age", "1 minute ago")]);

    show(&TooltipContext { canvas: canvas_a.clone(), model: visible_model() }, &binding_a).unwrap();
    show(&TooltipContext { canvas: canvas_b.clone(), model: visible_model() }, &binding_b).unwrap();

    assert_eq!(slot_text("chart_a", "cost"), "1 USD");
    assert_eq!(slot_text("chart_b", "cost"), "2 USD");
    canvas_a.remove();
    canvas_b.remove();
}
