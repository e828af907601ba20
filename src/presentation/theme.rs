use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Event;

use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::LogComponent;
use crate::domain::THEME_CHANGED_EVENT;
use crate::infrastructure::dom::{self, dispatch_window_event, html_document};
use crate::{log_debug, log_warn};

const THEME_COOKIE_KEY: &str = "theme";
const DARK_CLASS: &str = "dark";

fn theme_cookie() -> Option<String> {
    let cookies = html_document().ok()?.cookie().ok()?;
    let prefix = format!("{}=", THEME_COOKIE_KEY);
    cookies
        .split("; ")
        .find_map(|row| row.strip_prefix(prefix.as_str()).map(str::to_string))
}

fn prefers_dark() -> bool {
    dom::window()
        .ok()
        .and_then(|window| window.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|media| media.matches())
        .unwrap_or(false)
}

/// Active theme; the persisted cookie wins over the system preference.
pub fn is_dark() -> bool {
    match theme_cookie() {
        Some(theme) => theme == "dark",
        None => prefers_dark(),
    }
}

fn set_theme_cookie(theme: &str) -> ChartResult<()> {
    // expires in a year
    html_document()?
        .set_cookie(&format!(
            "{}={}; path=/; max-age=31536000; SameSite=Strict;",
            THEME_COOKIE_KEY, theme
        ))
        .map_err(|e| dom::js_error("set theme cookie", e))
}

/// Flips the document theme class, persists the choice and fires the
/// theme-changed notification every mounted chart rebuilds on.
pub fn apply_theme(dark: bool) -> ChartResult<()> {
    let root = dom::document()?
        .document_element()
        .ok_or_else(|| ChartError::Dom("document has no root element".to_string()))?;
    let classes = root.class_list();
    let toggled = if dark { classes.add_1(DARK_CLASS) } else { classes.remove_1(DARK_CLASS) };
    toggled.map_err(|e| dom::js_error("toggle theme class", e))?;

    set_theme_cookie(if dark { "dark" } else { "light" })?;
    dispatch_window_event(THEME_CHANGED_EVENT)
}

/// Binds the page's theme toggle button. Pages without a toggle are a
/// no-op; the charts then simply never receive a theme change.
#[wasm_bindgen(js_name = setupThemeToggle)]
pub fn setup_theme_toggle() -> Result<(), JsValue> {
    let Some(toggle) = dom::document()?.get_element_by_id("theme-toggle") else {
        log_debug!(LogComponent::Presentation("ThemeToggle"), "no #theme-toggle on this page");
        return Ok(());
    };

    let closure = Closure::<dyn FnMut(Event)>::new(move |_| {
        let dark = !is_dark();
        if let Err(error) = apply_theme(dark) {
            log_warn!(LogComponent::Presentation("ThemeToggle"), "theme switch failed: {}", error);
        }
    });
    toggle
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        .map_err(|e| dom::js_error("bind theme toggle", e))?;
    closure.forget();
    Ok(())
}
