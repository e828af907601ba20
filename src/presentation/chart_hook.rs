use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::application::lifecycle::ChartLifecycleController;
use crate::domain::logging::LogComponent;
use crate::log_debug;

/// Hook the host page instantiates per chart view element; a thin bridge
/// from the page's lifecycle callbacks to the application layer.
#[wasm_bindgen]
pub struct ChartHook {
    controller: ChartLifecycleController,
}

#[wasm_bindgen]
impl ChartHook {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ChartHook {
        ChartHook { controller: ChartLifecycleController::new() }
    }

    /// The host page mounted the view element.
    pub fn mounted(&mut self, element: HtmlElement) -> Result<(), JsValue> {
        log_debug!(LogComponent::Presentation("ChartHook"), "mounted `#{}`", element.id());
        self.controller.on_mount(element).map_err(JsValue::from)
    }

    /// The host page pushed fresh embedded data into the element.
    pub fn updated(&mut self) -> Result<(), JsValue> {
        self.controller.on_data_updated().map_err(JsValue::from)
    }

    /// The view element left the page.
    pub fn destroyed(&mut self) {
        self.controller.on_unmount();
    }
}

impl Default for ChartHook {
    fn default() -> Self {
        Self::new()
    }
}
