use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::formatting::format_value;

/// X coordinate of a data point; the wire format carries either numbers
/// (block heights, timestamps) or preformatted text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Coord {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Coord::Number(n) => write!(f, "{}", format_value(*n)),
            Coord::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One point of a series. Bare numbers deserialize with no x coordinate;
/// `{x, y}` objects keep it.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub x: Option<Coord>,
    pub y: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPoint {
    Scalar(f64),
    Pair { x: Coord, y: f64 },
}

impl<'de> Deserialize<'de> for SeriesPoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match RawPoint::deserialize(deserializer)? {
            RawPoint::Scalar(y) => SeriesPoint { x: None, y },
            RawPoint::Pair { x, y } => SeriesPoint { x: Some(x), y },
        })
    }
}

/// One dataset of the embedded payload. Styling fields are optional; any
/// other key is an auxiliary per-point column (age strings, merkle roots,
/// fees) that tooltips and tick labels read by index.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub label: Option<String>,
    pub data: Vec<SeriesPoint>,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(flatten)]
    pub aux: BTreeMap<String, Value>,
}

impl Dataset {
    /// Primary y values in point order.
    pub fn ys(&self) -> Vec<f64> {
        self.data.iter().map(|point| point.y).collect()
    }

    /// Auxiliary column by attribute name, if the payload carried one.
    pub fn aux_column(&self, key: &str) -> Option<&Vec<Value>> {
        match self.aux.get(key) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        }
    }

    /// Display text of one auxiliary cell.
    pub fn aux_value(&self, key: &str, index: usize) -> Option<String> {
        self.aux_column(key).and_then(|column| column.get(index)).map(json_display)
    }
}

/// Deserialized `data-chart-data` payload: shared labels plus datasets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    /// Parses and validates an embedded payload. Auxiliary columns must be
    /// index-aligned with the primary data array; a mismatch is rejected
    /// here so formatters never observe a misaligned column.
    pub fn parse(json: &str) -> ChartResult<Self> {
        let data: ChartData = serde_json::from_str(json)
            .map_err(|e| ChartError::Deserialization(format!("chart data: {}", e)))?;
        data.validate_alignment()?;
        Ok(data)
    }

    fn validate_alignment(&self) -> ChartResult<()> {
        for (dataset_index, dataset) in self.datasets.iter().enumerate() {
            for (key, value) in &dataset.aux {
                if let Value::Array(column) = value {
                    if column.len() != dataset.data.len() {
                        return Err(ChartError::Deserialization(format!(
                            "aux column `{}` of dataset {} has {} entries for {} points",
                            key,
                            dataset_index,
                            column.len(),
                            dataset.data.len()
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// The dataset tick and tooltip formatters read from.
    pub fn primary(&self) -> Option<&Dataset> {
        self.datasets.first()
    }

    /// Number of points in the primary dataset.
    pub fn point_count(&self) -> usize {
        self.primary().map(|dataset| dataset.data.len()).unwrap_or(0)
    }
}

fn json_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
