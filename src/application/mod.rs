pub mod customization;
pub mod lifecycle;
