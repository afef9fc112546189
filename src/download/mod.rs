//! Download module.
//!
//! This module provides:
//! - Skip decisions for volumes already archived
//! - Per-worker request throttling
//! - Bounded-concurrency image fetching
//! - Zip packaging of staging directories
//! - Catalog orchestration and run statistics

pub mod archive;
pub mod fetcher;
pub mod guard;
pub mod orchestrator;
pub mod state;
pub mod throttle;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use archive::{ArchiveResult, Archiver};
pub use fetcher::{resolve_image_url, ConcurrentFetcher, FailedImage, FetchReport, ImageTask};
pub use guard::ResumabilityGuard;
pub use orchestrator::Orchestrator;
pub use state::{CatalogReport, RunStats, VolumeOutcome};
pub use throttle::RateLimiter;
pub use transport::{FetchResponse, HttpTransport, ImageTransport};
