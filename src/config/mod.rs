//! Configuration module
//!
//! Editor settings persisted as TOML in the user's config directory.

pub mod config;

pub use config::{BehaviorConfig, Config, DisplayConfig};
