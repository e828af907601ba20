use std::collections::HashMap;
use std::rc::Rc;

use crate::domain::errors::ChartResult;

/// One labeled value slot of an overlay widget. `id` is the key the query
/// callback must answer for; a missing key is a contract violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayItem {
    pub title: String,
    pub id: String,
}

impl OverlayItem {
    pub fn new(title: &str, id: &str) -> Self {
        Self { title: title.to_string(), id: id.to_string() }
    }
}

/// Vertical anchoring of the widget relative to the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayAlign {
    /// Bottom edge sits on the caret.
    #[default]
    Above,
    /// Top edge sits on the caret.
    Caret,
}

/// Declarative description of one overlay widget. `identity` discriminates
/// widgets when several charts are visible at once; charts sharing an
/// identity would fight over one DOM node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySpec {
    pub identity: String,
    pub title: String,
    pub items: Vec<OverlayItem>,
    pub align: OverlayAlign,
}

/// Style token snapshot applied to a widget at construction time, already
/// formatted as renderer-consumable color strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayStyle {
    pub background: String,
    pub border: String,
    pub text: String,
    pub muted: String,
    pub accent: String,
}

/// The renderer's description of one pointer interaction: which points are
/// active and where the caret sits in canvas pixel coordinates. Opacity 0
/// is the hidden signal.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipModel {
    pub points: Vec<ActivePoint>,
    pub caret_x: f64,
    pub caret_y: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePoint {
    pub dataset: usize,
    pub index: usize,
}

impl TooltipModel {
    pub fn hidden() -> Self {
        Self { points: Vec::new(), caret_x: 0.0, caret_y: 0.0, opacity: 0.0 }
    }

    pub fn is_hidden(&self) -> bool {
        self.opacity == 0.0
    }

    /// Index of the hovered point in the primary dataset.
    pub fn primary_index(&self) -> Option<usize> {
        self.points.first().map(|point| point.index)
    }
}

/// Map from item id to display value, as produced by a query callback.
pub type QueryValues = HashMap<String, String>;

pub type QueryFn = Rc<dyn Fn(&TooltipModel) -> ChartResult<QueryValues>>;
pub type ActivateFn = Rc<dyn Fn(&TooltipModel)>;

/// Everything the overlay engine needs to serve one chart: the widget
/// description, the value query, and the optional click-through action.
#[derive(Clone)]
pub struct TooltipBinding {
    pub spec: OverlaySpec,
    pub style: OverlayStyle,
    pub on_query: QueryFn,
    pub on_activate: Option<ActivateFn>,
}
