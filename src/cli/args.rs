//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::catalog::VolumeRange;
use crate::config::Config;

/// Comic volume downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "comic-downloader",
    version,
    about = "Download comic volumes as zip archives",
    long_about = "Resolve one or more catalogs and download their volumes concurrently.\n\n\
                  Volumes whose archive already exists are skipped, so an interrupted run\n\
                  can simply be started again."
)]
pub struct Args {
    /// Catalog queries (manifest file paths).
    #[arg(required = true, num_args = 1..)]
    pub catalogs: Vec<String>,

    /// Root directory for downloads.
    #[arg(short = 'd', long = "directory", env = "COMIC_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Re-download volumes that already have an archive.
    #[arg(long)]
    pub overwrite: bool,

    /// Number of concurrent image downloads per volume.
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Milliseconds each worker waits before a request.
    #[arg(long = "throttle-ms")]
    pub throttle_ms: Option<u64>,

    /// Base URL for relative image URLs.
    #[arg(long)]
    pub base_image_url: Option<String>,

    /// Only download volumes of the book at this index.
    #[arg(short, long)]
    pub book: Option<usize>,

    /// Volume range within --book: `a..b`, `..b`, `a..` or `a` (inclusive, zero-based).
    #[arg(short, long, requires = "book")]
    pub range: Option<VolumeRange>,

    /// Print the catalogs and exit without downloading.
    #[arg(long)]
    pub list: bool,

    /// Hide progress bars.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(dir) = &self.output_dir {
            config.download.output_dir = Some(dir.clone());
        }

        if self.overwrite {
            config.download.overwrite = true;
        }

        if let Some(concurrency) = self.concurrency {
            config.download.concurrency = concurrency;
        }

        if let Some(ms) = self.throttle_ms {
            config.download.throttle_interval_ms = ms;
        }

        if let Some(base) = &self.base_image_url {
            config.download.base_image_url = Some(base.clone());
        }

        if self.quiet {
            config.download.show_progress = false;
        }
    }

    /// Range to download, if a book was selected.
    pub fn selection(&self) -> Option<(usize, VolumeRange)> {
        self.book
            .map(|book| (book, self.range.unwrap_or_else(VolumeRange::all)))
    }
}
