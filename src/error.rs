//! Error types for the comic-downloader engine.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Catalog errors
    #[error("Failed to parse catalog data: {0}")]
    Parse(String),

    #[error("Invalid volume range: {0}")]
    InvalidRange(String),

    // Network errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    // File system errors
    #[error("Invalid path segment: {0}")]
    InvalidFilename(String),

    // Archive errors
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Whether this error came from the network rather than the local disk.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::HttpStatus { .. } | Error::Http(_)
        )
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const SOME_IMAGES_FAILED: i32 = 6;
    pub const SOME_SOURCES_FAILED: i32 = 7;
}
