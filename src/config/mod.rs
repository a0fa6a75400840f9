//! Configuration loaded once at process start.

pub mod settings;

pub use settings::Settings;
