use wasm_bindgen::prelude::*;

use crate::domain::logging::{get_logger, LogComponent};

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

/// Root bootstrap: wires the ambient services before any hook runs.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    domain::logging::init_logger(Box::new(
        infrastructure::services::ConsoleLogger::new_development(),
    ));
    domain::logging::init_time_provider(Box::new(
        infrastructure::services::BrowserTimeProvider::new(),
    ));

    get_logger().info(
        LogComponent::Presentation("Bootstrap"),
        "🚀 explorer chart runtime initialized",
    );
}
