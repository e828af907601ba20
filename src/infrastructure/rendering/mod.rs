pub mod canvas_chart;
pub mod geometry;

pub use canvas_chart::{live_chart_count, CanvasChart, RenderPlan, TooltipHandler};
