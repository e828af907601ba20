pub mod chart;
pub mod errors;
pub mod formatting;
pub mod logging;

/// Window event the host page fires when the active theme flips; every
/// mounted chart rebuilds on it so color tokens are re-resolved.
pub const THEME_CHANGED_EVENT: &str = "theme-changed";
