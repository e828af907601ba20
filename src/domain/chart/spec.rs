use std::rc::Rc;
use std::str::FromStr;

use derive_more::Display;
use serde::Deserialize;
use strum::{AsRefStr, EnumString};

use crate::domain::chart::data::ChartData;
use crate::domain::chart::options::ChartOptions;
use crate::domain::errors::{ChartError, ChartResult};

/// Value Object - stable chart identifier.
///
/// Doubles as the registry lookup key and the default DOM identity of the
/// chart's tooltip overlay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display(fmt = "ChartId({})", _0)]
pub struct ChartId(String);

impl ChartId {
    pub fn new(id: &str) -> ChartResult<Self> {
        if id.trim().is_empty() {
            return Err(ChartError::Deserialization("view element has no id".to_string()));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Value Object - chart kind understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
pub enum ChartKind {
    #[display(fmt = "Line")]
    #[strum(serialize = "line")]
    Line,
    #[display(fmt = "Bar")]
    #[strum(serialize = "bar")]
    Bar,
}

/// Optional declarative tooltip carried by the view element; the body is a
/// template with `{{value}}` and `{{label}}` placeholders.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TooltipTemplate {
    pub title: String,
    pub body: String,
}

/// Everything a chart needs for one render cycle, deserialized from the
/// view element's declarative attributes. Immutable once built; a data
/// update produces a fresh spec instead of mutating this one.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub chart_id: ChartId,
    pub kind: ChartKind,
    pub data: Rc<ChartData>,
    pub options: ChartOptions,
    pub tooltip: Option<TooltipTemplate>,
}

impl ChartSpec {
    /// Builds a spec from the raw attribute payloads. `data` and `options`
    /// are required JSON; `tooltip` is optional JSON.
    pub fn from_attributes(
        id: &str,
        kind: &str,
        data_json: &str,
        options_json: &str,
        tooltip_json: Option<&str>,
    ) -> ChartResult<Self> {
        let chart_id = ChartId::new(id)?;
        let kind = ChartKind::from_str(kind).map_err(|_| {
            ChartError::Deserialization(format!("unknown chart type `{}`", kind))
        })?;
        let data = ChartData::parse(data_json)?;
        let options: ChartOptions = serde_json::from_str(options_json)
            .map_err(|e| ChartError::Deserialization(format!("chart options: {}", e)))?;
        let tooltip = match tooltip_json {
            Some(json) => Some(
                serde_json::from_str(json)
                    .map_err(|e| ChartError::Deserialization(format!("tooltip spec: {}", e)))?,
            ),
            None => None,
        };

        Ok(Self { chart_id, kind, data: Rc::new(data), options, tooltip })
    }
}
