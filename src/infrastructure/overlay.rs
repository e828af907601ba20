use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlCanvasElement, HtmlElement, MouseEvent};

use crate::domain::chart::tooltip::{OverlayAlign, TooltipBinding, TooltipModel};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::LogComponent;
use crate::infrastructure::dom::{self, WindowListener};
use crate::{log_debug, log_error};

/// What the renderer hands the overlay engine on every pointer or draw
/// event: the canvas the caret coordinates are relative to, plus the model.
pub struct TooltipContext {
    pub canvas: HtmlCanvasElement,
    pub model: TooltipModel,
}

thread_local! {
    // One live widget per identity; widgets outlive chart re-renders.
    static WIDGETS: RefCell<HashMap<String, OverlayWidget>> = RefCell::new(HashMap::new());
    // Page-lifetime resize listener, installed on first use.
    static RESIZE_RESET: RefCell<Option<WindowListener>> = RefCell::new(None);
}

/// DOM id of the widget addressed by `identity`.
pub fn widget_dom_id(identity: &str) -> String {
    format!("chart-tooltip-{}", identity)
}

/// Displays and positions the overlay widget for `binding` according to
/// the tooltip model in `ctx`.
///
/// The widget is built lazily on the first non-hidden model, updated in
/// place afterwards, and survives chart re-renders. A widget whose node
/// was removed by the resize reset counts as absent and is rebuilt fresh.
pub fn show(ctx: &TooltipContext, binding: &TooltipBinding) -> ChartResult<()> {
    ensure_resize_reset()?;
    let identity = binding.spec.identity.as_str();

    let stale = WIDGETS
        .with(|w| w.borrow().get(identity).map(|widget| !widget.root.is_connected()).unwrap_or(false));
    if stale {
        if let Some(widget) = WIDGETS.with(|w| w.borrow_mut().remove(identity)) {
            widget.teardown();
        }
        log_debug!(
            LogComponent::Infrastructure("TooltipOverlay"),
            "stale `{}` widget dropped, rebuilding",
            identity
        );
    }

    let missing = WIDGETS.with(|w| !w.borrow().contains_key(identity));
    if missing {
        if ctx.model.is_hidden() {
            return Ok(());
        }
        let widget = OverlayWidget::build(binding)?;
        WIDGETS.with(|w| w.borrow_mut().insert(identity.to_string(), widget));
    }

    WIDGETS.with(|w| match w.borrow().get(identity) {
        Some(widget) => widget.update(ctx, binding),
        None => Ok(()),
    })
}

/// Tears down every live widget. Runs on page resize, where absolute
/// positions measured against the old layout would otherwise stick.
pub fn reset_widgets() {
    let drained: Vec<(String, OverlayWidget)> =
        WIDGETS.with(|w| w.borrow_mut().drain().collect());
    if !drained.is_empty() {
        log_debug!(
            LogComponent::Infrastructure("TooltipOverlay"),
            "resize reset tore down {} widget(s)",
            drained.len()
        );
    }
    for (_, widget) in drained {
        widget.teardown();
    }
}

fn ensure_resize_reset() -> ChartResult<()> {
    RESIZE_RESET.with(|slot| {
        if slot.borrow().is_some() {
            return Ok(());
        }
        let listener = WindowListener::add("resize", |_| reset_widgets())?;
        *slot.borrow_mut() = Some(listener);
        Ok(())
    })
}

struct WidgetState {
    hovered: bool,
    last_model: Option<TooltipModel>,
}

struct OverlayWidget {
    root: HtmlElement,
    slots: HashMap<String, HtmlElement>,
    state: Rc<RefCell<WidgetState>>,
    _hover_closures: Vec<Closure<dyn FnMut(Event)>>,
    _click_closure: Option<Closure<dyn FnMut(MouseEvent)>>,
}

impl OverlayWidget {
    fn build(binding: &TooltipBinding) -> ChartResult<Self> {
        let document = dom::document()?;
        let body = document
            .body()
            .ok_or_else(|| ChartError::Dom("document has no body".to_string()))?;
        let style = &binding.style;

        let root = create_element(&document, "div", "chart-tooltip")?;
        root.set_id(&widget_dom_id(&binding.spec.identity));
        set_style(
            &root,
            &format!(
                "position: absolute; left: 0px; top: 0px; opacity: 0; z-index: -1; \
                 transition: opacity 0.3s, left 0.1s; pointer-events: auto; \
                 background: {}; color: {}; border: 1px solid {}; \
                 border-radius: 8px; padding: 15px 20px;",
                style.background, style.text, style.border
            ),
        )?;

        let container = create_element(&document, "div", "chart-tooltip-container")?;

        let dot = create_element(&document, "div", "chart-tooltip-dot")?;
        let clickable = binding.on_activate.is_some();
        set_style(
            &dot,
            &format!(
                "width: 10px; height: 10px; border-radius: 9999px; margin: 0 auto 6px; \
                 background: {}; cursor: pointer; pointer-events: {};",
                style.accent,
                if clickable { "auto" } else { "none" }
            ),
        )?;

        let items_container = create_element(&document, "div", "chart-tooltip-items-container")?;

        let title = create_element(&document, "p", "chart-tooltip-title")?;
        title.set_text_content(Some(&binding.spec.title));
        set_style(&title, "margin: 0 0 10px; text-align: center; font-size: 12px;")?;

        let items = create_element(&document, "div", "chart-tooltip-items")?;
        let mut slots = HashMap::new();
        for item in &binding.spec.items {
            let item_el = create_element(&document, "div", "chart-tooltip-item")?;

            let item_title = create_element(&document, "p", "chart-tooltip-item-title")?;
            item_title.set_text_content(Some(&item.title));
            set_style(&item_title, &format!("margin: 0; font-size: 11px; color: {};", style.muted))?;

            let value = create_element(&document, "p", "chart-tooltip-item-value")?;
            value
                .set_attribute("data-item-id", &item.id)
                .map_err(|e| dom::js_error("tag value slot", e))?;
            set_style(&value, "margin: 0 0 5px; font-size: 12px;")?;

            append(&item_el, &item_title)?;
            append(&item_el, &value)?;
            append(&items, &item_el)?;
            slots.insert(item.id.clone(), value);
        }

        append(&items_container, &title)?;
        append(&items_container, &items)?;
        append(&container, &dot)?;
        append(&container, &items_container)?;
        append(&root, &container)?;
        append(&body, &root)?;

        let state = Rc::new(RefCell::new(WidgetState { hovered: false, last_model: None }));

        // Sticky hover: mousing into the widget keeps it visible even when
        // the renderer reports zero opacity, so click-through stays usable.
        let mut hover_closures = Vec::new();
        {
            let state = Rc::clone(&state);
            let enter = Closure::<dyn FnMut(Event)>::new(move |_| {
                state.borrow_mut().hovered = true;
            });
            root.add_event_listener_with_callback("mouseenter", enter.as_ref().unchecked_ref())
                .map_err(|e| dom::js_error("widget mouseenter", e))?;
            hover_closures.push(enter);
        }
        {
            let state = Rc::clone(&state);
            let leave_target = root.clone();
            let leave = Closure::<dyn FnMut(Event)>::new(move |_| {
                state.borrow_mut().hovered = false;
                hide_element(&leave_target);
            });
            root.add_event_listener_with_callback("mouseleave", leave.as_ref().unchecked_ref())
                .map_err(|e| dom::js_error("widget mouseleave", e))?;
            hover_closures.push(leave);
        }

        let mut click_closure = None;
        if let Some(activate) = &binding.on_activate {
            let activate = Rc::clone(activate);
            let state = Rc::clone(&state);
            let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |_| {
                let model = state.borrow().last_model.clone();
                if let Some(model) = model {
                    activate(&model);
                }
            });
            dot.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                .map_err(|e| dom::js_error("widget dot click", e))?;
            click_closure = Some(closure);
        }

        Ok(Self { root, slots, state, _hover_closures: hover_closures, _click_closure: click_closure })
    }

    fn update(&self, ctx: &TooltipContext, binding: &TooltipBinding) -> ChartResult<()> {
        let model = &ctx.model;
        if model.is_hidden() {
            // Sticky hover: a widget being pointed at stays visible, and
            // keeps its last content, through zero-opacity models.
            if !self.state.borrow().hovered {
                hide_element(&self.root);
            }
            return Ok(());
        }

        self.state.borrow_mut().last_model = Some(model.clone());

        let values = (binding.on_query)(model)?;
        for item in &binding.spec.items {
            let value = values.get(&item.id).ok_or_else(|| {
                let error = ChartError::MissingTooltipItem {
                    identity: binding.spec.identity.clone(),
                    item: item.id.clone(),
                };
                log_error!(LogComponent::Infrastructure("TooltipOverlay"), "{}", error);
                error
            })?;
            let slot = self
                .slots
                .get(&item.id)
                .ok_or_else(|| ChartError::Rendering(format!("no slot for item `{}`", item.id)))?;
            slot.set_text_content(Some(value));
        }

        let rect = ctx.canvas.get_bounding_client_rect();
        let window = dom::window()?;
        let scroll_x = window.scroll_x().map_err(|e| dom::js_error("scroll x", e))?;
        let scroll_y = window.scroll_y().map_err(|e| dom::js_error("scroll y", e))?;
        let width = f64::from(self.root.offset_width());
        let height = f64::from(self.root.offset_height());

        let left = rect.left() + scroll_x + model.caret_x - width / 2.0;
        let top = rect.top() + scroll_y + model.caret_y
            - match binding.spec.align {
                OverlayAlign::Above => height,
                OverlayAlign::Caret => 0.0,
            };

        let css = self.root.style();
        let _ = css.set_property("left", &format!("{}px", left));
        let _ = css.set_property("top", &format!("{}px", top));
        let _ = css.set_property("opacity", "1");
        let _ = css.set_property("z-index", "10");
        Ok(())
    }

    fn teardown(self) {
        self.root.remove();
    }
}

fn create_element(document: &Document, tag: &str, class: &str) -> ChartResult<HtmlElement> {
    let element = document
        .create_element(tag)
        .map_err(|e| dom::js_error("create element", e))?;
    element.set_class_name(class);
    element
        .dyn_into::<HtmlElement>()
        .map_err(|_| ChartError::Dom(format!("`{}` is not an html element", tag)))
}

fn set_style(element: &HtmlElement, style: &str) -> ChartResult<()> {
    element
        .set_attribute("style", style)
        .map_err(|e| dom::js_error("style element", e))
}

fn append(parent: &HtmlElement, child: &HtmlElement) -> ChartResult<()> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|e| dom::js_error("append element", e))
}

fn hide_element(element: &HtmlElement) {
    let css = element.style();
    let _ = css.set_property("opacity", "0");
    let _ = css.set_property("z-index", "-1");
}
