#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlCanvasElement, HtmlElement};

use explorer_chart_wasm::application::lifecycle::ChartLifecycleController;
use explorer_chart_wasm::domain::THEME_CHANGED_EVENT;
use explorer_chart_wasm::infrastructure::dom::dispatch_window_event;
use explorer_chart_wasm::infrastructure::rendering::live_chart_count;

wasm_bindgen_test_configure!(run_in_browser);

const DATA: &str = r#"{"labels":["a","b","c"],"datasets":[{"data":[1.0,2.0,3.0]}]}"#;

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn chart_element(id: &str, data: &str) -> HtmlElement {
    let canvas: HtmlCanvasElement =
        document().create_element("canvas").unwrap().dyn_into().unwrap();
    canvas.set_id(id);
    canvas.set_width(400);
    canvas.set_height(240);
    canvas.set_attribute("data-chart-type", "line").unwrap();
    canvas.set_attribute("data-chart-data", data).unwrap();
    canvas.set_attribute("data-chart-options", "{}").unwrap();
    document().body().unwrap().append_child(&canvas).unwrap();
    canvas.unchecked_into()
}

#[wasm_bindgen_test]
fn remount_never_leaves_two_instances() {
    let element = chart_element("remount_chart", DATA);
    let base = live_chart_count();

    let mut controller = ChartLifecycleController::new();
    controller.on_mount(element.clone()).unwrap();
    assert_eq!(live_chart_count(), base + 1);

    controller.on_unmount();
    assert_eq!(live_chart_count(), base);

    controller.on_mount(element.clone()).unwrap();
    assert_eq!(live_chart_count(), base + 1);

    // destroy-then-create on update keeps exactly one instance
    controller.on_data_updated().unwrap();
    assert_eq!(live_chart_count(), base + 1);

    controller.on_unmount();
    assert_eq!(live_chart_count(), base);
    element.remove();
}

#[wasm_bindgen_test]
fn malformed_data_fails_that_chart_only() {
    let broken = chart_element("broken_chart", "{not json");
    let healthy = chart_element("healthy_chart", DATA);
    let base = live_chart_count();

    let mut broken_controller = ChartLifecycleController::new();
    assert!(broken_controller.on_mount(broken.clone()).is_err());
    assert_eq!(live_chart_count(), base, "a failed parse must leave no instance");

    let mut healthy_controller = ChartLifecycleController::new();
    healthy_controller.on_mount(healthy.clone()).unwrap();
    assert_eq!(live_chart_count(), base + 1);

    healthy_controller.on_unmount();
    broken_controller.on_unmount();
    broken.remove();
    healthy.remove();
}

#[wasm_bindgen_test]
fn theme_change_rebuilds_mounted_charts_without_resurrecting_dead_ones() {
    let element = chart_element("theme_chart", DATA);
    let base = live_chart_count();

    let mut controller = ChartLifecycleController::new();
    controller.on_mount(element.clone()).unwrap();
    assert_eq!(live_chart_count(), base + 1);

    dispatch_window_event(THEME_CHANGED_EVENT).unwrap();
    assert_eq!(live_chart_count(), base + 1, "rebuild replaces, never stacks");

    controller.on_unmount();
    dispatch_window_event(THEME_CHANGED_EVENT).unwrap();
    assert_eq!(live_chart_count(), base, "a destroyed chart must stay dead");
    element.remove();
}

#[wasm_bindgen_test]
fn missing_required_attribute_is_rejected() {
    let canvas: HtmlCanvasElement =
        document().create_element("canvas").unwrap().dyn_into().unwrap();
    canvas.set_id("attrless_chart");
    document().body().unwrap().append_child(&canvas).unwrap();
    let element: HtmlElement = canvas.unchecked_into();

    let mut controller = ChartLifecycleController::new();
    assert!(controller.on_mount(element.clone()).is_err());

    controller.on_unmount();
    element.remove();
}
