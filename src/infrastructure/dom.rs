use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, Document, Event, HtmlDocument, Window};

use crate::domain::errors::{ChartError, ChartResult};

pub fn window() -> ChartResult<Window> {
    web_sys::window().ok_or_else(|| ChartError::Dom("window not available".to_string()))
}

pub fn document() -> ChartResult<Document> {
    window()?.document().ok_or_else(|| ChartError::Dom("document not available".to_string()))
}

pub fn html_document() -> ChartResult<HtmlDocument> {
    document()?
        .dyn_into::<HtmlDocument>()
        .map_err(|_| ChartError::Dom("document is not an HTML document".to_string()))
}

pub fn js_error(context: &str, value: JsValue) -> ChartError {
    ChartError::Dom(format!("{}: {:?}", context, value))
}

/// Owned handle for a window event subscription. The subscription lives
/// exactly as long as the handle; `remove` tears it down, `forget` pins it
/// for the rest of the page's life.
pub struct WindowListener {
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl WindowListener {
    pub fn add(event: &'static str, handler: impl FnMut(Event) + 'static) -> ChartResult<Self> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        window()?
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|e| js_error("add window listener", e))?;
        Ok(Self { event, callback })
    }

    pub fn remove(self) {
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback(
                self.event,
                self.callback.as_ref().unchecked_ref(),
            );
        }
    }

    /// Keeps the subscription registered forever; for page-lifetime
    /// singletons only.
    pub fn forget(self) {
        self.callback.forget();
    }
}

/// Fires a named event on the window, e.g. the theme-changed notification.
pub fn dispatch_window_event(name: &str) -> ChartResult<()> {
    let event = CustomEvent::new(name).map_err(|e| js_error("create event", e))?;
    window()?.dispatch_event(&event).map_err(|e| js_error("dispatch event", e))?;
    Ok(())
}

/// Navigation side effect used by tooltip click-through.
pub fn navigate_to(url: &str) -> ChartResult<()> {
    window()?.location().set_href(url).map_err(|e| js_error("navigate", e))
}
