use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use crate::domain::chart::data::ChartData;
use crate::domain::chart::options::{ChartOptions, TemporalSource, TickLabeler};
use crate::domain::chart::spec::ChartKind;
use crate::domain::chart::tooltip::{ActivePoint, TooltipModel};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::formatting::{
    format_value, relative_age_from_iso, sparse_extreme_labels, sparse_temporal_labels,
};
use crate::domain::logging::LogComponent;
use crate::infrastructure::dom::js_error;
use crate::infrastructure::overlay::TooltipContext;
use crate::infrastructure::rendering::geometry::{
    nearest_slot, padded_range, plot_area, slot_x, value_to_y, y_tick_values, BAR_SPACING_RATIO,
    Y_TICK_COUNT,
};
use crate::infrastructure::style::StylePalette;
use crate::{log_debug, log_warn};

const AXIS_FONT: &str = "11px sans-serif";
const LINE_WIDTH: f64 = 2.0;

/// Callback the renderer fires on pointer movement and after each draw;
/// the overlay engine sits on the other end.
pub type TooltipHandler = Rc<dyn Fn(&TooltipContext)>;

/// Everything one chart draw needs, assembled by the lifecycle controller.
pub struct RenderPlan {
    pub kind: ChartKind,
    pub data: Rc<ChartData>,
    pub options: ChartOptions,
    pub palette: StylePalette,
    pub tooltip: Option<TooltipHandler>,
}

thread_local! {
    static LIVE_CHARTS: Cell<usize> = Cell::new(0);
}

/// Number of renderer instances currently alive on the page.
pub fn live_chart_count() -> usize {
    LIVE_CHARTS.with(|count| count.get())
}

/// Canvas 2D chart bound to one canvas element. Construction draws and
/// wires pointer events; dropping the instance detaches everything and
/// clears the canvas. The renderer does not support mutating type, data
/// or options in place; a changed chart is a new instance.
pub struct CanvasChart {
    canvas: HtmlCanvasElement,
    listeners: Vec<(&'static str, Closure<dyn FnMut(MouseEvent)>)>,
}

impl CanvasChart {
    pub fn new(canvas: HtmlCanvasElement, plan: RenderPlan) -> ChartResult<Self> {
        let plan = Rc::new(plan);

        // Match the backing store to the CSS layout size when it is known.
        let css_width = canvas.client_width();
        let css_height = canvas.client_height();
        if css_width > 0 {
            canvas.set_width(css_width as u32);
        }
        if css_height > 0 {
            canvas.set_height(css_height as u32);
        }

        draw(&canvas, &plan)?;

        let mut chart = Self { canvas: canvas.clone(), listeners: Vec::new() };
        if plan.tooltip.is_some() {
            chart.attach_pointer_listeners(&plan)?;
        }

        LIVE_CHARTS.with(|count| count.set(count.get() + 1));
        log_debug!(
            LogComponent::Infrastructure("CanvasChart"),
            "📊 {} chart drawn, {} live instance(s)",
            plan.kind,
            live_chart_count()
        );

        // A fresh draw settles any overlay left over from the previous
        // instance of this chart.
        if let Some(handler) = &plan.tooltip {
            handler(&TooltipContext { canvas, model: TooltipModel::hidden() });
        }

        Ok(chart)
    }

    fn attach_pointer_listeners(&mut self, plan: &Rc<RenderPlan>) -> ChartResult<()> {
        {
            let plan = Rc::clone(plan);
            let canvas = self.canvas.clone();
            let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                let model = model_for_pointer(&canvas, &plan, event.offset_x() as f64);
                if let Some(handler) = &plan.tooltip {
                    handler(&TooltipContext { canvas: canvas.clone(), model });
                }
            });
            self.canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())
                .map_err(|e| js_error("canvas mousemove", e))?;
            self.listeners.push(("mousemove", closure));
        }
        {
            let plan = Rc::clone(plan);
            let canvas = self.canvas.clone();
            let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |_| {
                if let Some(handler) = &plan.tooltip {
                    handler(&TooltipContext { canvas: canvas.clone(), model: TooltipModel::hidden() });
                }
            });
            self.canvas
                .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())
                .map_err(|e| js_error("canvas mouseleave", e))?;
            self.listeners.push(("mouseleave", closure));
        }
        Ok(())
    }
}

impl Drop for CanvasChart {
    fn drop(&mut self) {
        for (event, closure) in &self.listeners {
            let _ = self
                .canvas
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
        if let Ok(context) = context_2d(&self.canvas) {
            context.clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
        }
        LIVE_CHARTS.with(|count| count.set(count.get().saturating_sub(1)));
    }
}

fn model_for_pointer(canvas: &HtmlCanvasElement, plan: &RenderPlan, x: f64) -> TooltipModel {
    let len = plan.data.point_count();
    let area = plot_area(canvas.width() as f64, canvas.height() as f64);
    let Some(index) = nearest_slot(x, len, &area) else {
        return TooltipModel::hidden();
    };
    let Some(primary) = plan.data.primary() else {
        return TooltipModel::hidden();
    };

    let ys = primary.ys();
    let (min, max) = padded_range(&ys);
    TooltipModel {
        points: vec![ActivePoint { dataset: 0, index }],
        caret_x: slot_x(index, len, &area),
        caret_y: value_to_y(ys[index], min, max, &area),
        opacity: 1.0,
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> ChartResult<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|e| js_error("canvas 2d context", e))?
        .ok_or_else(|| ChartError::Rendering("2d context unavailable".to_string()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| ChartError::Rendering("failed to cast 2d context".to_string()))
}

fn draw(canvas: &HtmlCanvasElement, plan: &RenderPlan) -> ChartResult<()> {
    let context = context_2d(canvas)?;
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    context.clear_rect(0.0, 0.0, width, height);

    let Some(primary) = plan.data.primary() else {
        log_warn!(LogComponent::Infrastructure("CanvasChart"), "chart data has no datasets");
        return Ok(());
    };
    let ys = primary.ys();
    if ys.is_empty() {
        return Ok(());
    }

    let area = plot_area(width, height);
    let (min, max) = padded_range(&ys);
    let len = ys.len();

    context.set_font(AXIS_FONT);

    if plan.options.scales.y.ticks.display {
        let ticks = y_tick_values(min, max, Y_TICK_COUNT);
        let labels = y_axis_labels(&plan.options.scales.y.ticks.labeler, &ys, &ticks);

        context.set_stroke_style(&JsValue::from_str(&plan.palette.border));
        context.set_line_width(1.0);
        for tick in &ticks {
            let y = value_to_y(*tick, min, max, &area);
            context.begin_path();
            context.move_to(area.left, y);
            context.line_to(area.right(), y);
            context.stroke();
        }

        context.set_fill_style(&JsValue::from_str(&plan.palette.muted_foreground));
        context.set_text_align("right");
        context.set_text_baseline("middle");
        for (tick, label) in ticks.iter().zip(&labels) {
            if !label.is_empty() {
                let y = value_to_y(*tick, min, max, &area);
                context
                    .fill_text(label, area.left - 8.0, y)
                    .map_err(|e| js_error("y tick label", e))?;
            }
        }
    }

    if plan.options.scales.x.ticks.display {
        let labels = x_axis_labels(&plan.options.scales.x.ticks.labeler, &plan.data, browser_now());
        context.set_fill_style(&JsValue::from_str(&plan.palette.muted_foreground));
        context.set_text_align("center");
        context.set_text_baseline("alphabetic");
        for (index, label) in labels.iter().enumerate() {
            if !label.is_empty() {
                context
                    .fill_text(label, slot_x(index, len, &area), height - 8.0)
                    .map_err(|e| js_error("x tick label", e))?;
            }
        }
    }

    for dataset in &plan.data.datasets {
        let series: Vec<f64> = dataset.data.iter().map(|point| point.y).collect();
        match plan.kind {
            ChartKind::Line => {
                let stroke =
                    dataset.border_color.clone().unwrap_or_else(|| plan.palette.accent.clone());
                context.set_stroke_style(&JsValue::from_str(&stroke));
                context.set_line_width(LINE_WIDTH);
                context.begin_path();
                for (index, value) in series.iter().enumerate() {
                    let x = slot_x(index, series.len(), &area);
                    let y = value_to_y(*value, min, max, &area);
                    if index == 0 {
                        context.move_to(x, y);
                    } else {
                        context.line_to(x, y);
                    }
                }
                context.stroke();
            }
            ChartKind::Bar => {
                let fill = dataset
                    .background_color
                    .clone()
                    .unwrap_or_else(|| plan.palette.accent.clone());
                context.set_fill_style(&JsValue::from_str(&fill));
                let step = area.width / series.len().max(1) as f64;
                let bar_width = (step * (1.0 - BAR_SPACING_RATIO)).max(1.0);
                for (index, value) in series.iter().enumerate() {
                    let x = slot_x(index, series.len(), &area) - bar_width / 2.0;
                    let y = value_to_y(*value, min, max, &area);
                    context.fill_rect(x, y, bar_width, area.bottom() - y);
                }
            }
        }
    }

    Ok(())
}

fn browser_now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// Y axis label per candidate tick, dispatched on the labeler variant.
pub fn y_axis_labels(labeler: &TickLabeler, series: &[f64], ticks: &[f64]) -> Vec<String> {
    match labeler {
        TickLabeler::All => ticks.iter().map(|tick| format_value(*tick)).collect(),
        TickLabeler::Hidden => vec![String::new(); ticks.len()],
        TickLabeler::SparseExtremes { suffix } => {
            sparse_extreme_labels(series, ticks, |value| format!("{}{}", format_value(value), suffix))
        }
        // Temporal labeling has no meaning on a value axis.
        TickLabeler::SparseTemporal { .. } => vec![String::new(); ticks.len()],
    }
}

/// X axis label per point slot, dispatched on the labeler variant.
pub fn x_axis_labels(labeler: &TickLabeler, data: &ChartData, now: DateTime<Utc>) -> Vec<String> {
    let len = data.point_count();
    match labeler {
        TickLabeler::All => {
            let mut labels = data.labels.clone();
            labels.resize(len, String::new());
            labels
        }
        TickLabeler::Hidden | TickLabeler::SparseExtremes { .. } => vec![String::new(); len],
        TickLabeler::SparseTemporal { source } => match source {
            TemporalSource::Labels => {
                let mut labels = data.labels.clone();
                labels.resize(len, String::new());
                sparse_temporal_labels(&labels, |iso| {
                    relative_age_from_iso(iso, now).unwrap_or_else(|_| iso.to_string())
                })
            }
            TemporalSource::Aux(key) => {
                let Some(primary) = data.primary() else {
                    return vec![String::new(); len];
                };
                let Some(column) = primary.aux_column(key) else {
                    log_warn!(
                        LogComponent::Infrastructure("CanvasChart"),
                        "aux column `{}` missing, x labels skipped",
                        key
                    );
                    return vec![String::new(); len];
                };
                let rendered: Vec<String> = column
                    .iter()
                    .map(|value| value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string()))
                    .collect();
                sparse_temporal_labels(&rendered, |s| s.to_string())
            }
        },
    }
}
