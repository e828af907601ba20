use serde::Deserialize;

use crate::domain::chart::tooltip::TooltipBinding;

/// Where a sparse temporal axis takes its label text from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemporalSource {
    /// The shared `labels` array, rendered as relative ages.
    Labels,
    /// A preformatted auxiliary column of the primary dataset.
    Aux(String),
}

/// Tick labeling strategy, selected per axis by the customization step
/// and interpreted by the renderer. A tagged variant instead of a
/// callback keeps deserialized option trees comparable.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TickLabeler {
    /// Render every candidate tick value.
    #[default]
    All,
    /// Render nothing even when ticks are displayed.
    Hidden,
    /// Label only the ticks nearest the series extremes.
    SparseExtremes { suffix: String },
    /// Label only the first, middle and last slot.
    SparseTemporal { source: TemporalSource },
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickOptions {
    #[serde(default)]
    pub display: bool,
    /// Runtime-only; customizers install it after deserialization.
    #[serde(skip)]
    pub labeler: TickLabeler,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisOptions {
    #[serde(default)]
    pub ticks: TickOptions,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Scales {
    #[serde(default)]
    pub x: AxisOptions,
    #[serde(default)]
    pub y: AxisOptions,
}

/// Deserialized `data-chart-options` tree. Unknown keys from the embedded
/// payload are ignored rather than rejected.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    #[serde(default)]
    pub scales: Scales,
}

/// Output of the customization step: the mutated option tree plus the
/// overlay tooltip wiring, if this chart has any.
#[derive(Clone, Default)]
pub struct ResolvedOptions {
    pub options: ChartOptions,
    pub tooltip: Option<TooltipBinding>,
}

impl ResolvedOptions {
    pub fn new(options: ChartOptions) -> Self {
        Self { options, tooltip: None }
    }
}
