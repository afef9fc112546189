//! Bounded-concurrency image fetching for one volume.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;

use crate::download::throttle::RateLimiter;
use crate::download::transport::{request_headers, ImageTransport};
use crate::error::{Error, Result};
use crate::fs::naming::{image_file_name, image_index};
use crate::output::progress::create_volume_bar;

/// Default number of concurrent fetches.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// One image of a volume: its 1-based position and source URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTask {
    pub index: usize,
    pub url: String,
}

impl ImageTask {
    /// Number the images of a volume in list order, starting at 1.
    pub fn from_urls(urls: &[String]) -> Vec<ImageTask> {
        urls.iter()
            .enumerate()
            .map(|(i, url)| ImageTask {
                index: i + 1,
                url: url.clone(),
            })
            .collect()
    }
}

/// An image that could not be downloaded.
#[derive(Debug)]
pub struct FailedImage {
    pub index: usize,
    pub url: String,
    pub error: Error,
}

/// Outcome of fetching one volume's images.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub succeeded: usize,

    /// Failures, ordered by image index.
    pub failed: Vec<FailedImage>,
}

impl FetchReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Downloads a volume's images with a fixed number of concurrent workers.
pub struct ConcurrentFetcher {
    transport: Arc<dyn ImageTransport>,
    limiter: RateLimiter,
    concurrency: usize,
    timeout: Duration,
    base_image_url: Option<String>,
    image_extension: String,
    show_progress: bool,
}

impl ConcurrentFetcher {
    pub fn new(transport: Arc<dyn ImageTransport>) -> Self {
        Self {
            transport,
            limiter: RateLimiter::disabled(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(30),
            base_image_url: None,
            image_extension: "jpg".to_string(),
            show_progress: false,
        }
    }

    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_image_url(mut self, base: Option<String>) -> Self {
        self.base_image_url = base.filter(|b| !b.trim().is_empty());
        self
    }

    pub fn with_image_extension(mut self, extension: impl Into<String>) -> Self {
        self.image_extension = extension.into();
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Download every image into `target_dir`, creating it if needed.
    ///
    /// File names follow list order (`0001.jpg`, `0002.jpg`, ...) whatever
    /// order the requests complete in. A failed image is recorded and does
    /// not abort the others. Afterwards `target_dir` holds no image file from
    /// an earlier run that this run did not write. Only a failure to prepare
    /// `target_dir` is returned as an error.
    pub async fn fetch_all(
        &self,
        images: &[String],
        target_dir: &Path,
        referer: Option<&str>,
    ) -> Result<FetchReport> {
        tokio::fs::create_dir_all(target_dir).await?;
        self.remove_images_beyond(target_dir, images.len()).await?;

        let tasks = ImageTask::from_urls(images);
        let progress = if self.show_progress {
            let label = target_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            create_volume_bar(tasks.len() as u64, &label)
        } else {
            ProgressBar::hidden()
        };

        let results: Vec<(ImageTask, Result<PathBuf>)> = stream::iter(tasks)
            .map(|task| {
                let progress = &progress;
                async move {
                    let result = self.fetch_one(&task, target_dir, referer).await;
                    progress.inc(1);
                    (task, result)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        progress.finish_and_clear();

        let mut report = FetchReport::default();
        for (task, result) in results {
            match result {
                Ok(path) => {
                    tracing::debug!("Saved image {} to {}", task.index, path.display());
                    report.succeeded += 1;
                }
                Err(error) => {
                    if error.is_network() {
                        tracing::warn!("Image {} ({}) failed: {}", task.index, task.url, error);
                    } else {
                        tracing::warn!("Image {} could not be saved: {}", task.index, error);
                    }
                    let name = image_file_name(task.index, &self.image_extension);
                    remove_if_present(&target_dir.join(name)).await?;
                    report.failed.push(FailedImage {
                        index: task.index,
                        url: task.url,
                        error,
                    });
                }
            }
        }
        report.failed.sort_by_key(|f| f.index);

        Ok(report)
    }

    /// Delete image files left by an earlier run whose index is outside
    /// `1..=count`.
    async fn remove_images_beyond(&self, target_dir: &Path, count: usize) -> Result<()> {
        let mut entries = tokio::fs::read_dir(target_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(index) = image_index(&name.to_string_lossy(), &self.image_extension) else {
                continue;
            };
            if index == 0 || index > count {
                tracing::debug!("Removing stale image {}", entry.path().display());
                remove_if_present(&entry.path()).await?;
            }
        }
        Ok(())
    }

    /// Fetch a single image and write it under its index-derived name.
    async fn fetch_one(
        &self,
        task: &ImageTask,
        target_dir: &Path,
        referer: Option<&str>,
    ) -> Result<PathBuf> {
        self.limiter.wait().await;

        let url = resolve_image_url(&task.url, self.base_image_url.as_deref());
        let response = self
            .transport
            .get(&url, self.timeout, request_headers(referer))
            .await?;

        if !response.is_success() {
            return Err(Error::HttpStatus {
                status: response.status,
                url,
            });
        }

        let path = target_dir.join(image_file_name(task.index, &self.image_extension));
        tokio::fs::write(&path, &response.body).await?;

        Ok(path)
    }
}

async fn remove_if_present(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

/// Resolve an image URL fragment against an optional base URL.
///
/// Absolute URLs are kept. Protocol-relative URLs (`//host/a.jpg`) take the
/// base's scheme, or https. Other fragments are appended to the base when one
/// is configured and used as-is otherwise.
pub fn resolve_image_url(fragment: &str, base: Option<&str>) -> String {
    let fragment = fragment.trim();

    if url::Url::parse(fragment).is_ok() {
        return fragment.to_string();
    }

    if let Some(rest) = fragment.strip_prefix("//") {
        let scheme = base
            .and_then(|b| url::Url::parse(b).ok())
            .map(|u| u.scheme().to_string())
            .unwrap_or_else(|| "https".to_string());
        return format!("{}://{}", scheme, rest);
    }

    match base {
        Some(base) => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            fragment.trim_start_matches('/')
        ),
        None => fragment.to_string(),
    }
}
