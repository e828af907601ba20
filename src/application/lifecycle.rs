use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement};

use crate::application::customization::resolve_options;
use crate::domain::chart::spec::{ChartId, ChartSpec};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::LogComponent;
use crate::domain::THEME_CHANGED_EVENT;
use crate::infrastructure::dom::WindowListener;
use crate::infrastructure::overlay::{self, TooltipContext};
use crate::infrastructure::rendering::{CanvasChart, RenderPlan, TooltipHandler};
use crate::infrastructure::style::StylePalette;
use crate::{log_debug, log_error, log_info};

pub const CHART_TYPE_ATTR: &str = "data-chart-type";
pub const CHART_DATA_ATTR: &str = "data-chart-data";
pub const CHART_OPTIONS_ATTR: &str = "data-chart-options";
pub const CHART_TOOLTIP_ATTR: &str = "data-chart-tooltip";

/// Owned handle over one live renderer. The controller must release it
/// through `destroy` before creating a successor for the same view
/// element.
pub struct ChartInstance {
    renderer: CanvasChart,
    chart_id: ChartId,
}

impl ChartInstance {
    fn create(element: &HtmlElement, spec: ChartSpec, palette: StylePalette) -> ChartResult<Self> {
        let canvas = element
            .clone()
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| ChartError::Dom("chart view element is not a canvas".to_string()))?;

        let resolved = resolve_options(&spec, &palette);
        let tooltip: Option<TooltipHandler> = resolved.tooltip.map(|binding| {
            let binding = Rc::new(binding);
            Rc::new(move |ctx: &TooltipContext| {
                if let Err(error) = overlay::show(ctx, &binding) {
                    log_error!(
                        LogComponent::Infrastructure("TooltipOverlay"),
                        "tooltip update failed: {}",
                        error
                    );
                }
            }) as TooltipHandler
        });

        let chart_id = spec.chart_id.clone();
        let renderer = CanvasChart::new(
            canvas,
            RenderPlan {
                kind: spec.kind,
                data: Rc::clone(&spec.data),
                options: resolved.options,
                palette,
                tooltip,
            },
        )?;

        Ok(Self { renderer, chart_id })
    }

    fn destroy(self) {
        log_debug!(
            LogComponent::Application("ChartLifecycle"),
            "destroying chart `{}`",
            self.chart_id.as_str()
        );
        drop(self.renderer);
    }
}

#[derive(Default)]
struct ControllerState {
    element: Option<HtmlElement>,
    instance: Option<ChartInstance>,
}

/// Owns at most one [`ChartInstance`] for its bound view element.
///
/// Mount, data update and theme change all funnel into the same rebuild:
/// the previous instance is destroyed before the next one is constructed,
/// and no caller can observe a half-torn-down chart in between. A failed
/// rebuild is fatal for this chart only; siblings and the host page keep
/// running.
pub struct ChartLifecycleController {
    state: Rc<RefCell<ControllerState>>,
    theme_listener: Option<WindowListener>,
}

impl ChartLifecycleController {
    pub fn new() -> Self {
        Self { state: Rc::new(RefCell::new(ControllerState::default())), theme_listener: None }
    }

    /// Binds the view element, subscribes to theme changes and builds the
    /// first instance.
    pub fn on_mount(&mut self, element: HtmlElement) -> ChartResult<()> {
        {
            let mut state = self.state.borrow_mut();
            if let Some(previous) = state.instance.take() {
                previous.destroy();
            }
            state.element = Some(element);
        }
        self.subscribe_theme_changes()?;
        Self::rebuild(&self.state)
    }

    /// The host page replaced the element's embedded data.
    pub fn on_data_updated(&mut self) -> ChartResult<()> {
        Self::rebuild(&self.state)
    }

    /// Tears down the instance and the theme subscription; a theme change
    /// arriving after this cannot resurrect the chart.
    pub fn on_unmount(&mut self) {
        if let Some(listener) = self.theme_listener.take() {
            listener.remove();
        }
        let mut state = self.state.borrow_mut();
        if let Some(instance) = state.instance.take() {
            instance.destroy();
        }
        state.element = None;
    }

    fn subscribe_theme_changes(&mut self) -> ChartResult<()> {
        if let Some(previous) = self.theme_listener.take() {
            previous.remove();
        }
        let weak: Weak<RefCell<ControllerState>> = Rc::downgrade(&self.state);
        let listener = WindowListener::add(THEME_CHANGED_EVENT, move |_| {
            let Some(state) = weak.upgrade() else { return };
            if let Err(error) = ChartLifecycleController::rebuild(&state) {
                log_error!(
                    LogComponent::Application("ChartLifecycle"),
                    "theme rebuild failed: {}",
                    error
                );
            }
        })?;
        self.theme_listener = Some(listener);
        Ok(())
    }

    /// Destroy-then-create for the bound element. The destroy completes
    /// before the new instance exists, and a failed parse leaves no
    /// instance behind.
    fn rebuild(state: &Rc<RefCell<ControllerState>>) -> ChartResult<()> {
        let element = {
            let mut state = state.borrow_mut();
            if let Some(previous) = state.instance.take() {
                previous.destroy();
            }
            match &state.element {
                Some(element) => element.clone(),
                None => return Ok(()),
            }
        };

        let spec = read_spec(&element).map_err(|error| {
            log_error!(
                LogComponent::Application("ChartLifecycle"),
                "chart on `#{}` skipped: {}",
                element.id(),
                error
            );
            error
        })?;
        let palette = StylePalette::resolve()?;
        let chart_id = spec.chart_id.clone();
        let instance = ChartInstance::create(&element, spec, palette)?;
        state.borrow_mut().instance = Some(instance);

        log_info!(
            LogComponent::Application("ChartLifecycle"),
            "✅ chart `{}` ready",
            chart_id.as_str()
        );
        Ok(())
    }
}

impl Default for ChartLifecycleController {
    fn default() -> Self {
        Self::new()
    }
}

fn read_spec(element: &HtmlElement) -> ChartResult<ChartSpec> {
    let kind = require_attr(element, CHART_TYPE_ATTR)?;
    let data = require_attr(element, CHART_DATA_ATTR)?;
    let options = require_attr(element, CHART_OPTIONS_ATTR)?;
    let tooltip = element.get_attribute(CHART_TOOLTIP_ATTR);
    ChartSpec::from_attributes(&element.id(), &kind, &data, &options, tooltip.as_deref())
}

fn require_attr(element: &HtmlElement, name: &str) -> ChartResult<String> {
    element
        .get_attribute(name)
        .ok_or_else(|| ChartError::Deserialization(format!("missing `{}` attribute", name)))
}
