use std::collections::HashMap;
use std::rc::Rc;

use once_cell::sync::Lazy;

use crate::domain::chart::data::{ChartData, SeriesPoint};
use crate::domain::chart::options::{ResolvedOptions, TemporalSource, TickLabeler};
use crate::domain::chart::spec::{ChartId, ChartSpec, TooltipTemplate};
use crate::domain::chart::tooltip::{
    ActivateFn, OverlayAlign, OverlayItem, OverlaySpec, OverlayStyle, QueryFn, QueryValues,
    TooltipBinding,
};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::formatting::{format_value, render_body_template, shorten_hash};
use crate::domain::logging::LogComponent;
use crate::infrastructure::dom;
use crate::infrastructure::style::StylePalette;
use crate::log_error;

/// Item id used by template tooltips for their single body slot.
pub const BODY_ITEM_ID: &str = "body";

/// Inputs a customizer may read: the identifier, the parsed data and the
/// resolved theme tokens of the current rebuild.
pub struct CustomizeCtx<'a> {
    pub chart_id: &'a ChartId,
    pub data: &'a Rc<ChartData>,
    pub palette: &'a StylePalette,
}

/// A per-identifier configuration mutation. Customizers are pure apart
/// from the closures they install on the resolved options.
pub type CustomizeFn = fn(&CustomizeCtx<'_>, &mut ResolvedOptions);

/// Lookup table from chart identifier to customization function.
///
/// Adding a chart kind means adding a table entry; the lifecycle
/// controller never learns concrete chart types. Unknown identifiers
/// resolve as a pass-through, never an error.
pub struct ChartCustomizationRegistry {
    entries: HashMap<&'static str, CustomizeFn>,
}

impl ChartCustomizationRegistry {
    pub fn empty() -> Self {
        Self { entries: HashMap::new() }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register("cost_per_proof_chart", cost_per_proof);
        registry.register("batch_size_chart", batch_size);
        registry
    }

    pub fn register(&mut self, chart_id: &'static str, customize: CustomizeFn) {
        self.entries.insert(chart_id, customize);
    }

    pub fn resolve(&self, ctx: &CustomizeCtx<'_>, resolved: &mut ResolvedOptions) {
        if let Some(customize) = self.entries.get(ctx.chart_id.as_str()) {
            customize(ctx, resolved);
        }
    }
}

static REGISTRY: Lazy<ChartCustomizationRegistry> =
    Lazy::new(ChartCustomizationRegistry::with_defaults);

pub fn registry() -> &'static ChartCustomizationRegistry {
    &REGISTRY
}

/// Builds the resolved options for one rebuild: the declarative tooltip
/// template first, then the per-identifier customization on top.
pub fn resolve_options(spec: &ChartSpec, palette: &StylePalette) -> ResolvedOptions {
    let mut resolved = ResolvedOptions::new(spec.options.clone());
    if let Some(template) = &spec.tooltip {
        resolved.tooltip = Some(template_binding(&spec.chart_id, template, &spec.data, palette));
    }

    let ctx = CustomizeCtx { chart_id: &spec.chart_id, data: &spec.data, palette };
    registry().resolve(&ctx, &mut resolved);
    resolved
}

fn overlay_style(palette: &StylePalette) -> OverlayStyle {
    OverlayStyle {
        background: palette.card.clone(),
        border: palette.border.clone(),
        text: palette.foreground.clone(),
        muted: palette.muted_foreground.clone(),
        accent: palette.accent.clone(),
    }
}

fn active_point(data: &ChartData, index: usize) -> ChartResult<&SeriesPoint> {
    data.primary()
        .and_then(|primary| primary.data.get(index))
        .ok_or_else(|| ChartError::Rendering(format!("active point {} out of range", index)))
}

/// Overlay binding for the declarative `{title, body}` tooltip carried by
/// the view element; one body slot fed by template substitution.
pub fn template_binding(
    chart_id: &ChartId,
    template: &TooltipTemplate,
    data: &Rc<ChartData>,
    palette: &StylePalette,
) -> TooltipBinding {
    let spec = OverlaySpec {
        identity: chart_id.as_str().to_string(),
        title: template.title.clone(),
        items: vec![OverlayItem::new("", BODY_ITEM_ID)],
        align: OverlayAlign::Above,
    };

    let query_data = Rc::clone(data);
    let body = template.body.clone();
    let on_query: QueryFn = Rc::new(move |model| {
        let index = model
            .primary_index()
            .ok_or_else(|| ChartError::Rendering("tooltip model has no active point".to_string()))?;
        let point = active_point(&query_data, index)?;
        let label = query_data
            .labels
            .get(index)
            .cloned()
            .or_else(|| point.x.as_ref().map(ToString::to_string))
            .unwrap_or_default();

        let mut values = QueryValues::new();
        values.insert(
            BODY_ITEM_ID.to_string(),
            render_body_template(&body, &format_value(point.y), &label),
        );
        Ok(values)
    });

    TooltipBinding { spec, style: overlay_style(palette), on_query, on_activate: None }
}

/// Cost-per-proof chart: USD extremes on the y axis, coarse ages across
/// the time axis. The declarative template tooltip stays in place.
fn cost_per_proof(_ctx: &CustomizeCtx<'_>, resolved: &mut ResolvedOptions) {
    let y = &mut resolved.options.scales.y.ticks;
    y.display = true;
    y.labeler = TickLabeler::SparseExtremes { suffix: " USD".to_string() };

    let x = &mut resolved.options.scales.x.ticks;
    x.display = true;
    x.labeler = TickLabeler::SparseTemporal { source: TemporalSource::Labels };
}

/// Batch-size chart: proof-count extremes on the y axis, precomputed age
/// strings across the time axis, and a clickable overlay tooltip that
/// routes to the hovered batch's detail page.
fn batch_size(ctx: &CustomizeCtx<'_>, resolved: &mut ResolvedOptions) {
    let y = &mut resolved.options.scales.y.ticks;
    y.display = true;
    y.labeler = TickLabeler::SparseExtremes { suffix: " proofs".to_string() };

    let x = &mut resolved.options.scales.x.ticks;
    x.display = true;
    x.labeler = TickLabeler::SparseTemporal { source: TemporalSource::Aux("age".to_string()) };

    resolved.tooltip = Some(batch_size_tooltip(ctx));
}

fn batch_size_tooltip(ctx: &CustomizeCtx<'_>) -> TooltipBinding {
    let spec = OverlaySpec {
        identity: ctx.chart_id.as_str().to_string(),
        title: "Batch size".to_string(),
        items: vec![
            OverlayItem::new("Fee per proof", "cost"),
            OverlayItem::new("Age", "age"),
            OverlayItem::new("Merkle root", "merkle_root"),
            OverlayItem::new("Block number", "block_number"),
            OverlayItem::new("Amount of proofs", "amount_of_proofs"),
        ],
        align: OverlayAlign::Above,
    };

    let query_data = Rc::clone(ctx.data);
    let on_query: QueryFn = Rc::new(move |model| {
        let index = model
            .primary_index()
            .ok_or_else(|| ChartError::Rendering("tooltip model has no active point".to_string()))?;
        let primary = query_data
            .primary()
            .ok_or_else(|| ChartError::Rendering("chart data has no datasets".to_string()))?;
        let point = primary
            .data
            .get(index)
            .ok_or_else(|| ChartError::Rendering(format!("active point {} out of range", index)))?;

        let mut values = QueryValues::new();
        values.insert("amount_of_proofs".to_string(), format_value(point.y));
        values.insert(
            "block_number".to_string(),
            point.x.as_ref().map(ToString::to_string).unwrap_or_else(|| index.to_string()),
        );
        values.insert(
            "cost".to_string(),
            format!("{} USD", primary.aux_value("fee_per_proof", index).unwrap_or_default()),
        );
        values.insert("age".to_string(), primary.aux_value("age", index).unwrap_or_default());
        values.insert(
            "merkle_root".to_string(),
            shorten_hash(&primary.aux_value("merkle_root", index).unwrap_or_default()),
        );
        Ok(values)
    });

    let nav_data = Rc::clone(ctx.data);
    let on_activate: ActivateFn = Rc::new(move |model| {
        let Some(index) = model.primary_index() else { return };
        let Some(primary) = nav_data.primary() else { return };
        let Some(merkle_root) = primary.aux_value("merkle_root", index) else { return };
        if let Err(error) = dom::navigate_to(&format!("/batches/{}", merkle_root)) {
            log_error!(LogComponent::Application("BatchSizeChart"), "navigation failed: {}", error);
        }
    });

    TooltipBinding {
        spec,
        style: overlay_style(ctx.palette),
        on_query,
        on_activate: Some(on_activate),
    }
}
