pub mod data;
pub mod options;
pub mod spec;
pub mod tooltip;

pub use data::{ChartData, Coord, Dataset, SeriesPoint};
pub use options::{
    AxisOptions, ChartOptions, ResolvedOptions, Scales, TemporalSource, TickLabeler, TickOptions,
};
pub use spec::{ChartId, ChartKind, ChartSpec, TooltipTemplate};
pub use tooltip::{
    ActivateFn, ActivePoint, OverlayAlign, OverlayItem, OverlaySpec, OverlayStyle, QueryFn,
    QueryValues, TooltipBinding, TooltipModel,
};
