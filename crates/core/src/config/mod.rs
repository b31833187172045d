//! Configuration loading and management.
//!
//! This module loads the YAML agent/task documents, `crew.toml`, and the
//! process environment.

pub mod error;
pub mod loader;
pub mod models;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use models::CrewConfig;
pub use settings::Settings;
