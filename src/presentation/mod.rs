pub mod chart_hook;
pub mod theme;
