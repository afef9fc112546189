//! Per-volume outcomes and run-level statistics.

use crate::download::archive::ArchiveResult;
use crate::download::fetcher::FetchReport;
use crate::error::Error;

/// What happened to one volume.
#[derive(Debug)]
pub enum VolumeOutcome {
    /// An archive already existed.
    Skipped,

    /// The image lister returned nothing.
    NoImages,

    /// Images were fetched; `archive` is the packaging outcome, or the error
    /// that prevented it.
    Downloaded {
        report: FetchReport,
        archive: std::result::Result<ArchiveResult, Error>,
    },

    /// The volume was abandoned before any image was written.
    Failed(Error),
}

/// Aggregate counters for one run of the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub volumes_downloaded: u64,
    pub volumes_skipped: u64,
    pub volumes_empty: u64,
    pub volumes_failed: u64,
    pub images_downloaded: u64,
    pub images_failed: u64,
    pub archives_written: u64,
    pub archives_failed: u64,

    /// `entry/book/volume` labels of volumes that did not finish cleanly.
    pub incomplete_volumes: Vec<String>,
}

impl RunStats {
    /// Fold one volume outcome into the counters.
    pub fn record(&mut self, label: &str, outcome: &VolumeOutcome) {
        match outcome {
            VolumeOutcome::Skipped => self.volumes_skipped += 1,
            VolumeOutcome::NoImages => {
                self.volumes_empty += 1;
                self.incomplete_volumes.push(label.to_string());
            }
            VolumeOutcome::Failed(_) => {
                self.volumes_failed += 1;
                self.incomplete_volumes.push(label.to_string());
            }
            VolumeOutcome::Downloaded { report, archive } => {
                self.volumes_downloaded += 1;
                self.images_downloaded += report.succeeded as u64;
                self.images_failed += report.failed.len() as u64;
                match archive {
                    Ok(ArchiveResult::Packed { .. }) => self.archives_written += 1,
                    Ok(ArchiveResult::NothingToArchive) => {}
                    Err(_) => self.archives_failed += 1,
                }
                if !report.is_complete() || archive.is_err() {
                    self.incomplete_volumes.push(label.to_string());
                }
            }
        }
    }

    /// Merge the counters of another run.
    pub fn merge(&mut self, other: RunStats) {
        self.volumes_downloaded += other.volumes_downloaded;
        self.volumes_skipped += other.volumes_skipped;
        self.volumes_empty += other.volumes_empty;
        self.volumes_failed += other.volumes_failed;
        self.images_downloaded += other.images_downloaded;
        self.images_failed += other.images_failed;
        self.archives_written += other.archives_written;
        self.archives_failed += other.archives_failed;
        self.incomplete_volumes.extend(other.incomplete_volumes);
    }

    /// Total volumes seen.
    pub fn total_volumes(&self) -> u64 {
        self.volumes_downloaded + self.volumes_skipped + self.volumes_empty + self.volumes_failed
    }

    /// Whether anything failed: an image, a volume or an archive.
    pub fn has_failures(&self) -> bool {
        self.images_failed > 0
            || self.volumes_failed > 0
            || self.volumes_empty > 0
            || self.archives_failed > 0
    }
}

/// Results of downloading several catalogs in one run.
#[derive(Debug, Default)]
pub struct CatalogReport {
    /// Combined counters of every downloaded entry.
    pub totals: RunStats,

    /// Per-entry counters, in query order.
    pub entries: Vec<(String, RunStats)>,

    /// Queries that could not be resolved, or whose selection was invalid.
    pub failed_queries: Vec<String>,
}

impl CatalogReport {
    pub fn record_entry(&mut self, name: &str, stats: RunStats) {
        self.totals.merge(stats.clone());
        self.entries.push((name.to_string(), stats));
    }

    pub fn sources_failed(&self) -> u64 {
        self.failed_queries.len() as u64
    }
}
