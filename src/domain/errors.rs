use wasm_bindgen::JsValue;

/// Error taxonomy for the chart subsystem. One chart failing must never
/// take down a sibling chart or the host page, so everything is surfaced
/// as a value and handled at the lifecycle boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    /// Malformed or missing embedded attribute payload.
    Deserialization(String),
    /// A tooltip query returned no value for a declared item id.
    MissingTooltipItem { identity: String, item: String },
    /// A browser API was unavailable or rejected a call.
    Dom(String),
    Rendering(String),
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartError::Deserialization(msg) => write!(f, "Deserialization Error: {}", msg),
            ChartError::MissingTooltipItem { identity, item } => {
                write!(
                    f,
                    "Tooltip Contract Violation: `{}` has no value for item `{}`",
                    identity, item
                )
            }
            ChartError::Dom(msg) => write!(f, "DOM Error: {}", msg),
            ChartError::Rendering(msg) => write!(f, "Rendering Error: {}", msg),
        }
    }
}

impl std::error::Error for ChartError {}

pub type ChartResult<T> = Result<T, ChartError>;

impl From<ChartError> for JsValue {
    fn from(error: ChartError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}
