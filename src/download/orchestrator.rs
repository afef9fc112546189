//! Catalog walking and per-volume download orchestration.

use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::{CatalogSource, Entry, Volume, VolumeRange};
use crate::config::Config;
use crate::download::archive::{ArchiveResult, Archiver};
use crate::download::fetcher::ConcurrentFetcher;
use crate::download::guard::ResumabilityGuard;
use crate::download::state::{CatalogReport, RunStats, VolumeOutcome};
use crate::download::throttle::RateLimiter;
use crate::download::transport::ImageTransport;
use crate::error::Result;
use crate::fs::{ensure_dir, staging_dir, volume_output_dir};

/// Drives skip check, image listing, fetching and archiving for each volume
/// of a catalog, one volume at a time.
pub struct Orchestrator {
    root: PathBuf,
    overwrite: bool,
    send_referer: bool,
    source: Arc<dyn CatalogSource>,
    fetcher: ConcurrentFetcher,
    guard: ResumabilityGuard,
    archiver: Archiver,
}

impl Orchestrator {
    /// Build an orchestrator from the configuration and its collaborators.
    pub fn new(
        config: &Config,
        source: Arc<dyn CatalogSource>,
        transport: Arc<dyn ImageTransport>,
    ) -> Self {
        let options = &config.download;
        let limiter =
            RateLimiter::new(config.throttle_interval()).with_jitter(config.throttle_jitter());
        let fetcher = ConcurrentFetcher::new(transport)
            .with_limiter(limiter)
            .with_concurrency(options.concurrency)
            .with_timeout(config.request_timeout())
            .with_base_image_url(options.base_image_url.clone())
            .with_image_extension(options.image_extension.clone())
            .with_progress(options.show_progress);

        Self {
            root: config.output_dir(),
            overwrite: options.overwrite,
            send_referer: config.http.send_referer,
            source,
            fetcher,
            guard: ResumabilityGuard::new(options.archive_extension.clone()),
            archiver: Archiver::new(options.archive_extension.clone()),
        }
    }

    /// Download every volume of every book of `entry`, in list order.
    ///
    /// Per-volume failures are logged and counted; only a failure to create
    /// the output root is returned.
    pub async fn download_full(&self, entry: &Entry) -> Result<RunStats> {
        ensure_dir(&self.root).await?;

        tracing::info!(
            "Downloading '{}' ({} book(s), {} volume(s))",
            entry.name,
            entry.books.len(),
            entry.volume_count()
        );

        let mut stats = RunStats::default();
        for book in &entry.books {
            self.run_volumes(&entry.name, &book.name, &book.vols, &mut stats)
                .await;
        }

        tracing::info!(
            "Finished '{}': {} downloaded, {} skipped, {} incomplete",
            entry.name,
            stats.volumes_downloaded,
            stats.volumes_skipped,
            stats.incomplete_volumes.len()
        );
        Ok(stats)
    }

    /// Resolve each query through the catalog source and download it.
    ///
    /// With a `selection`, only that book's range is downloaded. A query that
    /// cannot be resolved, or whose selection is out of bounds, is logged and
    /// recorded in the report; the remaining queries still run.
    pub async fn download_catalogs(
        &self,
        queries: &[String],
        selection: Option<(usize, VolumeRange)>,
    ) -> Result<CatalogReport> {
        let mut report = CatalogReport::default();

        for query in queries {
            tracing::debug!("Resolving '{}' via {}", query, self.source.name());
            let entry = match self.source.resolve_catalog(query).await {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Failed to resolve '{}': {}", query, e);
                    report.failed_queries.push(query.clone());
                    continue;
                }
            };

            let stats = match selection {
                Some((book_index, range)) => match entry.select(book_index, range) {
                    Ok((book, vols)) => {
                        self.download_range(&entry.name, &book.name, vols).await?
                    }
                    Err(e) => {
                        tracing::warn!("'{}': {}", entry.name, e);
                        report.failed_queries.push(query.clone());
                        continue;
                    }
                },
                None => self.download_full(&entry).await?,
            };
            report.record_entry(&entry.name, stats);
        }

        Ok(report)
    }

    /// Download a caller-selected, ordered subset of one book's volumes.
    pub async fn download_range(
        &self,
        entry_name: &str,
        book_name: &str,
        volumes: &[Volume],
    ) -> Result<RunStats> {
        ensure_dir(&self.root).await?;

        tracing::info!(
            "Downloading {} volume(s) of '{}' / '{}'",
            volumes.len(),
            entry_name,
            book_name
        );

        let mut stats = RunStats::default();
        self.run_volumes(entry_name, book_name, volumes, &mut stats)
            .await;
        Ok(stats)
    }

    async fn run_volumes(
        &self,
        entry_name: &str,
        book_name: &str,
        volumes: &[Volume],
        stats: &mut RunStats,
    ) {
        for volume in volumes {
            let label = format!("{}/{}/{}", entry_name, book_name, volume.name);
            let outcome = self.process_volume(entry_name, book_name, volume).await;
            log_outcome(&label, &outcome);
            stats.record(&label, &outcome);
        }
    }

    /// Process one volume. Never fails; every error ends up in the outcome.
    pub async fn process_volume(
        &self,
        entry_name: &str,
        book_name: &str,
        volume: &Volume,
    ) -> VolumeOutcome {
        let output_dir = match volume_output_dir(&self.root, entry_name, book_name) {
            Ok(dir) => dir,
            Err(e) => return VolumeOutcome::Failed(e),
        };
        if let Err(e) = ensure_dir(&output_dir).await {
            return VolumeOutcome::Failed(e);
        }

        if self.guard.should_skip(&output_dir, &volume.name, self.overwrite) {
            return VolumeOutcome::Skipped;
        }

        let images = match self.source.list_images(&volume.url).await {
            Ok(images) if images.is_empty() => return VolumeOutcome::NoImages,
            Ok(images) => images,
            Err(e) => return VolumeOutcome::Failed(e),
        };
        tracing::debug!("{} image(s) listed for {}", images.len(), volume.url);

        let staging = match staging_dir(&output_dir, &volume.name) {
            Ok(dir) => dir,
            Err(e) => return VolumeOutcome::Failed(e),
        };

        let referer = self.send_referer.then_some(volume.url.as_str());
        let report = match self.fetcher.fetch_all(&images, &staging, referer).await {
            Ok(report) => report,
            Err(e) => return VolumeOutcome::Failed(e),
        };

        let archive = self.archiver.pack(&staging).await;
        VolumeOutcome::Downloaded { report, archive }
    }
}

fn log_outcome(label: &str, outcome: &VolumeOutcome) {
    match outcome {
        VolumeOutcome::Skipped => {
            tracing::info!("Skipping {}: already archived", label);
        }
        VolumeOutcome::NoImages => {
            tracing::warn!("No images found for {}, skipped", label);
        }
        VolumeOutcome::Failed(e) => {
            tracing::warn!("Volume {} failed: {}", label, e);
        }
        VolumeOutcome::Downloaded { report, archive } => {
            tracing::info!(
                "{}: {}/{} image(s) downloaded",
                label,
                report.succeeded,
                report.total()
            );
            for failed in &report.failed {
                tracing::warn!("  #{} {} - {}", failed.index, failed.url, failed.error);
            }
            match archive {
                Ok(ArchiveResult::Packed { path, files }) => {
                    tracing::info!("Packed {} file(s) into {}", files, path.display());
                }
                Ok(ArchiveResult::NothingToArchive) => {
                    tracing::warn!("{}: nothing to archive", label);
                }
                Err(e) => {
                    tracing::warn!("{}: archiving failed, images kept: {}", label, e);
                }
            }
        }
    }
}
