//! Comic Downloader - concurrent, resumable comic volume downloads.
//!
//! This library turns an already-resolved comic catalog (Entry → Book →
//! Volume) into local, zip-archived directories of images.
//!
//! # Features
//!
//! - Bounded-concurrency image fetching with per-worker throttling
//! - Deterministic image naming (`0001.jpg`, `0002.jpg`, ...)
//! - Skipping of volumes whose archive already exists
//! - Per-image and per-volume failure isolation
//! - Zip packaging next to the unpacked staging directory
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use comic_downloader::{CatalogSource, Config, HttpTransport, ManifestSource, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let source = Arc::new(ManifestSource::new());
//!     let transport = Arc::new(HttpTransport::new(&config.http)?);
//!
//!     let entry = source.resolve_catalog("catalog.json").await?;
//!     let orchestrator = Orchestrator::new(&config, source, transport);
//!     let stats = orchestrator.download_full(&entry).await?;
//!     println!("{} images downloaded", stats.images_downloaded);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;

// Re-exports for convenience
pub use catalog::{Book, CatalogSource, Entry, ManifestSource, Volume, VolumeRange};
pub use config::Config;
pub use download::{
    Archiver, CatalogReport, ConcurrentFetcher, FetchReport, HttpTransport, ImageTransport,
    Orchestrator, RateLimiter, ResumabilityGuard, RunStats,
};
pub use error::{Error, Result};
pub use fs::sanitize;
