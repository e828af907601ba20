use wasm_bindgen::JsValue;

use crate::domain::logging::{get_time_provider, LogEntry, LogLevel, Logger, TimeProvider};

/// Logger implementation writing through the browser console.
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    /// Development configuration: everything down to debug.
    pub fn new_development() -> Self {
        Self::new(LogLevel::Debug)
    }

    /// Production configuration: warnings and errors only.
    pub fn new_production() -> Self {
        Self::new(LogLevel::Warn)
    }

    fn format(entry: &LogEntry) -> String {
        format!(
            "[{}] {} {}: {}",
            get_time_provider().format_timestamp(entry.timestamp),
            entry.level,
            entry.component,
            entry.message
        )
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        let line = JsValue::from_str(&Self::format(&entry));
        match entry.level {
            LogLevel::Debug | LogLevel::Info => web_sys::console::log_1(&line),
            LogLevel::Warn => web_sys::console::warn_1(&line),
            LogLevel::Error => web_sys::console::error_1(&line),
        }
    }
}

/// Time provider backed by the browser clock.
pub struct BrowserTimeProvider;

impl BrowserTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BrowserTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for BrowserTimeProvider {
    fn current_timestamp(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        let date = js_sys::Date::new(&JsValue::from_f64(timestamp as f64));
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            date.get_utc_hours(),
            date.get_utc_minutes(),
            date.get_utc_seconds(),
            date.get_utc_milliseconds(),
        )
    }
}
