//! Configuration module for the comic-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{Config, DownloadOptions, HttpOptions};
pub use validation::validate_config;
